//! Error types for the tutorial host.
//!
//! Drawing never fails: missing frame data is skipped.  Errors only come
//! from the edges (window, configuration, device).

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TutorialError>;

#[derive(Error, Debug)]
pub enum TutorialError {
    #[error("window error: {0}")]
    Window(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path:   PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("device error: {0}")]
    Device(String),
}
