use anyhow::{bail, Result};
use boyboy_core::config::KEYS;

use crate::config_file;
use crate::options::{ConfigCommand, ConfigKeyOptions, ConfigListOptions, ConfigOptions, ConfigSetOptions};

pub fn run(opts: ConfigOptions) -> Result<()> {
    let (mut config, path) = config_file::load(opts.config.as_deref())?;

    match opts.command {
        Some(ConfigCommand::Get(get_opts)) => get(&config, get_opts),
        Some(ConfigCommand::Set(set_opts)) => {
            set(&mut config, set_opts)?;
            config_file::save(&config, &path)
        }
        Some(ConfigCommand::List(list_opts)) => list(&config, list_opts),
        Some(ConfigCommand::Reset(reset_opts)) => {
            config.reset(reset_opts.key.as_deref());
            config_file::save(&config, &path)
        }
        None => bail!("expected one of: get, set, list, reset"),
    }
}

fn get(config: &boyboy_core::config::Config, opts: ConfigKeyOptions) -> Result<()> {
    let key = opts.key.as_deref().ok_or_else(|| anyhow::anyhow!("expected a key"))?;
    match config.get(key) {
        Some(value) => println!("{}", value),
        None => bail!("unrecognized key `{}`", key),
    }
    Ok(())
}

fn set(config: &mut boyboy_core::config::Config, opts: ConfigSetOptions) -> Result<()> {
    config.set(&opts.key, &opts.value)?;
    Ok(())
}

fn list(config: &boyboy_core::config::Config, _opts: ConfigListOptions) -> Result<()> {
    for (key, _) in KEYS {
        println!("{} = {}", key, config.get(key).unwrap_or_default());
    }
    Ok(())
}
