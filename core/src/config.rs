//! On-disk configuration: a `serde`/`toml` struct mirroring the
//! `[emulator]`/`[video]`/`[saves]`/`[debug]` tables, plus the
//! tagged-variant key metadata the `config` CLI subcommand needs to
//! resolve a dotted key like `emulator.speed` to a typed field.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_speed() -> u32 {
    1
}
fn default_tick_mode() -> String {
    "normal".to_string()
}
fn default_cpu_overlap() -> bool {
    false
}
fn default_scale() -> u32 {
    2
}
fn default_vsync() -> bool {
    true
}
fn default_autosave() -> bool {
    true
}
fn default_save_interval() -> u32 {
    5000
}
fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmulatorConfig {
    #[serde(default = "default_speed")]
    pub speed: u32,
    #[serde(default = "default_tick_mode")]
    pub tick_mode: String,
    #[serde(default = "default_cpu_overlap")]
    pub cpu_overlap: bool,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            speed: default_speed(),
            tick_mode: default_tick_mode(),
            cpu_overlap: default_cpu_overlap(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VideoConfig {
    #[serde(default = "default_scale")]
    pub scale: u32,
    #[serde(default = "default_vsync")]
    pub vsync: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        VideoConfig { scale: default_scale(), vsync: default_vsync() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SavesConfig {
    #[serde(default = "default_autosave")]
    pub autosave: bool,
    #[serde(default = "default_save_interval")]
    pub save_interval: u32,
}

impl Default for SavesConfig {
    fn default() -> Self {
        SavesConfig { autosave: default_autosave(), save_interval: default_save_interval() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        DebugConfig { log_level: default_log_level() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub emulator: EmulatorConfig,
    pub video: VideoConfig,
    pub saves: SavesConfig,
    pub debug: DebugConfig,
}

/// The expected shape of a dotted config key, used by the `config`
/// subcommand to reject a type-mismatched `set` before it ever touches
/// the struct.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyKind {
    Int,
    Bool,
    String,
}

/// `(dotted key, kind)` pairs for every recognized configuration key.
pub const KEYS: &[(&str, KeyKind)] = &[
    ("emulator.speed", KeyKind::Int),
    ("emulator.tick_mode", KeyKind::String),
    ("emulator.cpu_overlap", KeyKind::Bool),
    ("video.scale", KeyKind::Int),
    ("video.vsync", KeyKind::Bool),
    ("saves.autosave", KeyKind::Bool),
    ("saves.save_interval", KeyKind::Int),
    ("debug.log_level", KeyKind::String),
];

pub fn key_kind(key: &str) -> Option<KeyKind> {
    KEYS.iter().find(|(k, _)| *k == key).map(|(_, kind)| *kind)
}

const TICK_MODES: &[&str] = &["fast", "normal", "precision"];
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "critical", "off"];

impl Config {
    pub fn parse(toml_text: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_text).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).expect("Config always serializes")
    }

    /// Checks every field against its documented range/enum. In
    /// normalizing mode the offending field is reset to its default and
    /// a warning logged instead of returning an error.
    pub fn validate(&mut self, normalize: bool) -> Result<(), ConfigError> {
        macro_rules! check {
            ($cond:expr, $key:expr, $detail:expr, $reset:expr) => {
                if !$cond {
                    if normalize {
                        log::warn!("config: {} is invalid ({}), resetting to default", $key, $detail);
                        $reset;
                    } else {
                        return Err(ConfigError::ValidationError {
                            key: $key.to_string(),
                            detail: $detail.to_string(),
                        });
                    }
                }
            };
        }

        check!(
            self.emulator.speed <= 10,
            "emulator.speed",
            "must be 0..=10",
            self.emulator.speed = default_speed()
        );
        check!(
            TICK_MODES.contains(&self.emulator.tick_mode.as_str()),
            "emulator.tick_mode",
            "must be one of fast|normal|precision",
            self.emulator.tick_mode = default_tick_mode()
        );
        check!(
            (1..=10).contains(&self.video.scale),
            "video.scale",
            "must be 1..=10",
            self.video.scale = default_scale()
        );
        check!(
            self.saves.save_interval <= 3_600_000,
            "saves.save_interval",
            "must be 0..=3_600_000",
            self.saves.save_interval = default_save_interval()
        );
        check!(
            LOG_LEVELS.contains(&self.debug.log_level.as_str()),
            "debug.log_level",
            "must be one of trace|debug|info|warn|error|critical|off",
            self.debug.log_level = default_log_level()
        );

        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "emulator.speed" => Some(self.emulator.speed.to_string()),
            "emulator.tick_mode" => Some(self.emulator.tick_mode.clone()),
            "emulator.cpu_overlap" => Some(self.emulator.cpu_overlap.to_string()),
            "video.scale" => Some(self.video.scale.to_string()),
            "video.vsync" => Some(self.video.vsync.to_string()),
            "saves.autosave" => Some(self.saves.autosave.to_string()),
            "saves.save_interval" => Some(self.saves.save_interval.to_string()),
            "debug.log_level" => Some(self.debug.log_level.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let kind = key_kind(key).ok_or_else(|| ConfigError::ValidationError {
            key: key.to_string(),
            detail: "unrecognized key".to_string(),
        })?;

        let parse_int = |v: &str| -> Result<u32, ConfigError> {
            v.parse::<u32>().map_err(|_| ConfigError::ValidationError {
                key: key.to_string(),
                detail: format!("`{}` is not a valid integer", v),
            })
        };
        let parse_bool = |v: &str| -> Result<bool, ConfigError> {
            v.parse::<bool>().map_err(|_| ConfigError::ValidationError {
                key: key.to_string(),
                detail: format!("`{}` is not a valid boolean", v),
            })
        };

        match (key, kind) {
            ("emulator.speed", KeyKind::Int) => self.emulator.speed = parse_int(value)?,
            ("emulator.tick_mode", KeyKind::String) => self.emulator.tick_mode = value.to_string(),
            ("emulator.cpu_overlap", KeyKind::Bool) => self.emulator.cpu_overlap = parse_bool(value)?,
            ("video.scale", KeyKind::Int) => self.video.scale = parse_int(value)?,
            ("video.vsync", KeyKind::Bool) => self.video.vsync = parse_bool(value)?,
            ("saves.autosave", KeyKind::Bool) => self.saves.autosave = parse_bool(value)?,
            ("saves.save_interval", KeyKind::Int) => self.saves.save_interval = parse_int(value)?,
            ("debug.log_level", KeyKind::String) => self.debug.log_level = value.to_string(),
            _ => unreachable!("key_kind and the match above must stay in sync"),
        }

        self.validate(false)
    }

    pub fn reset(&mut self, key: Option<&str>) {
        match key {
            None => *self = Config::default(),
            Some("emulator.speed") => self.emulator.speed = default_speed(),
            Some("emulator.tick_mode") => self.emulator.tick_mode = default_tick_mode(),
            Some("emulator.cpu_overlap") => self.emulator.cpu_overlap = default_cpu_overlap(),
            Some("video.scale") => self.video.scale = default_scale(),
            Some("video.vsync") => self.video.vsync = default_vsync(),
            Some("saves.autosave") => self.saves.autosave = default_autosave(),
            Some("saves.save_interval") => self.saves.save_interval = default_save_interval(),
            Some("debug.log_level") => self.debug.log_level = default_log_level(),
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let config = Config::parse("[emulator]\nspeed = 4\n").unwrap();
        assert_eq!(config.emulator.speed, 4);
        assert_eq!(config.emulator.tick_mode, "normal");
        assert_eq!(config.video.scale, 2);
    }

    #[test]
    fn validate_normalizes_out_of_range_speed() {
        let mut config = Config::default();
        config.emulator.speed = 99;
        config.validate(true).unwrap();
        assert_eq!(config.emulator.speed, 1);
    }

    #[test]
    fn validate_rejects_out_of_range_without_normalize() {
        let mut config = Config::default();
        config.video.scale = 0;
        assert!(matches!(config.validate(false), Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn set_rejects_unrecognized_key() {
        let mut config = Config::default();
        assert!(config.set("emulator.nonexistent", "1").is_err());
    }

    #[test]
    fn set_and_get_round_trip() {
        let mut config = Config::default();
        config.set("emulator.speed", "3").unwrap();
        assert_eq!(config.get("emulator.speed"), Some("3".to_string()));
    }

    #[test]
    fn reset_single_key_restores_default() {
        let mut config = Config::default();
        config.video.scale = 7;
        config.reset(Some("video.scale"));
        assert_eq!(config.video.scale, 2);
    }
}
