use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create config directory: {0}")]
    CreateDir(std::io::Error),
}

/// Errors establishing a transport connection.
///
/// Any of these leaves the session unusable; callers must not issue
/// further operations on a session whose connect failed.
#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("Connection failed to {host}:{port}: {reason}")]
    ConnectionFailed {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Timeout connecting to {0}")]
    Timeout(String),

    #[error("Protocol negotiation failed: {0}")]
    Negotiation(String),
}

/// Errors changing the remote working directory
#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Not connected")]
    NotConnected,

    #[error("Cannot access {path}: {reason}")]
    Inaccessible { path: String, reason: String },

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Timed out changing directory to {0}")]
    Timeout(String),
}

/// Errors reading a directory listing
#[derive(Error, Debug)]
pub enum ListingError {
    #[error("Not connected")]
    NotConnected,

    #[error("Failed to list {path}: {reason}")]
    ReadDir { path: String, reason: String },

    #[error("Timed out listing {0}")]
    Timeout(String),
}
