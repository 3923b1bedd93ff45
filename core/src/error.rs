//! Typed error taxonomy for the emulator core.
//!
//! Every fallible core operation returns one of these enums (or the
//! umbrella [`BoyboyError`]) rather than panicking. The only panics left
//! in the core are truly unreachable match arms.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("expected a file but found a directory: {0}")]
    IsDirectory(String),
    #[error("bad file mode for {0}")]
    BadMode(String),
    #[error("error reading {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("error writing {path}: {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum RomError {
    #[error("header checksum mismatch: expected {expected:#04x}, computed {computed:#04x}")]
    HeaderChecksum { expected: u8, computed: u8 },
    #[error("global checksum mismatch: expected {expected:#06x}, computed {computed:#06x}")]
    GlobalChecksum { expected: u16, computed: u16 },
    #[error("unsupported cartridge type byte: {0:#04x}")]
    UnsupportedCartridgeType(u8),
    #[error("rom is too small to contain a header ({0} bytes)")]
    TooSmall(usize),
}

#[derive(Debug, Error)]
pub enum CpuError {
    #[error("illegal opcode {0:#04x} encountered at pc={1:#06x}")]
    IllegalOpcode(u8, u16),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    ParseError(String),
    #[error("invalid value for `{key}`: {detail}")]
    ValidationError { key: String, detail: String },
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("battery save checksum mismatch, refusing to load")]
    ChecksumMismatch,
}

#[derive(Debug, Error)]
pub enum BoyboyError {
    #[error(transparent)]
    File(#[from] FileError),
    #[error(transparent)]
    Rom(#[from] RomError),
    #[error(transparent)]
    Cpu(#[from] CpuError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Save(#[from] SaveError),
}

pub type Result<T> = std::result::Result<T, BoyboyError>;
