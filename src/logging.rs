use anyhow::Result;
use log::LevelFilter;
use simplelog::{CombinedLogger, Config as LogConfig, TermLogger, TerminalMode, WriteLogger};

fn level_from_str(level: &str) -> LevelFilter {
    match level {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" | "critical" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// Installs a combined colored-terminal + plain-file logger at the
/// given base level, shifted up or down by `verbose`/`quiet` notches.
pub fn init(configured_level: &str, verbose: u32, quiet: u32) -> Result<()> {
    let mut level = level_from_str(configured_level) as i32;
    level += verbose as i32;
    level -= quiet as i32;
    let level = level.clamp(LevelFilter::Off as i32, LevelFilter::Trace as i32);
    let level = LEVELS[level as usize];

    CombinedLogger::init(vec![
        TermLogger::new(level, LogConfig::default(), TerminalMode::Mixed),
        WriteLogger::new(level, LogConfig::default(), log_file()?),
    ])?;
    Ok(())
}

const LEVELS: [LevelFilter; 6] =
    [LevelFilter::Off, LevelFilter::Error, LevelFilter::Warn, LevelFilter::Info, LevelFilter::Debug, LevelFilter::Trace];

fn log_file() -> Result<std::fs::File> {
    let dirs = directories::ProjectDirs::from("", "", "boyboy");
    let path = match &dirs {
        Some(dirs) => dirs.data_dir().join("boyboy.log"),
        None => std::path::PathBuf::from("boyboy.log"),
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(std::fs::OpenOptions::new().create(true).append(true).open(path)?)
}
