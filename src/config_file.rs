use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use boyboy_core::config::Config;
use directories::ProjectDirs;

pub fn default_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "boyboy").context("could not resolve a config directory for this platform")?;
    Ok(dirs.config_dir().join("config.toml"))
}

pub fn load(override_path: Option<&str>) -> Result<(Config, PathBuf)> {
    let path = match override_path {
        Some(p) => PathBuf::from(p),
        None => default_path()?,
    };

    let mut config = if path.exists() {
        let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        Config::parse(&text)?
    } else {
        Config::default()
    };

    config.validate(true)?;
    Ok((config, path))
}

pub fn save(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, config.to_toml()).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
