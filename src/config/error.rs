use std::net::AddrParseError;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse port value {value:?}")]
    PortParseError {
        value: String,
        source: ParseIntError,
    },

    #[error("invalid port: {value:?} (must be 1-65535)")]
    InvalidPort { value: String },

    #[error("invalid bind address {value:?}")]
    InvalidBindAddr {
        value: String,
        source: AddrParseError,
    },

    #[error("path not found: {path}")]
    PathNotFound { path: PathBuf },

    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
