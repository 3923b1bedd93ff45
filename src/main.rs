mod commands;
mod config_file;
mod logging;
mod options;

use anyhow::Result;
use gumdrop::Options;
use options::{AppOptions, Command};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let opts = AppOptions::parse_args_default_or_exit();

    let (verbose, quiet, config_override) = match &opts.command {
        Some(Command::Run(run_opts)) => (run_opts.verbose, run_opts.quiet, run_opts.config.as_deref()),
        Some(Command::Config(config_opts)) => (0, 0, config_opts.config.as_deref()),
        _ => (0, 0, None),
    };
    let (config, _) = config_file::load(config_override)?;
    logging::init(&config.debug.log_level, verbose, quiet)?;

    match opts.command {
        Some(Command::Run(run_opts)) => commands::run::run(run_opts),
        Some(Command::Info(info_opts)) => commands::info::run(info_opts),
        Some(Command::Config(config_opts)) => commands::config_cmd::run(config_opts),
        None => {
            eprintln!("{}", AppOptions::usage());
            Ok(())
        }
    }
}
