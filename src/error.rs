//! Error types for the recovery menu

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the recovery core
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// A directory or file could not be opened or read
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A command ran but exited unsuccessfully
    #[error("`{command}` exited with status {}", describe_code(.code))]
    Exec { command: String, code: Option<i32> },

    /// A command could not be started at all
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is present but invalid
    #[error("invalid configuration {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl RecoveryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, RecoveryError>;
