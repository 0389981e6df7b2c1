//! Spyglass remote directory browser
//!
//! A uniform browse contract over FTP and SFTP endpoints: pick a configured
//! endpoint, connect, list a directory with normalized metadata, navigate
//! up or into subdirectories. This library is consumed by the operator CLI
//! and by host applications embedding the browse flow.

pub mod browse;
pub mod config;
pub mod error;
pub mod listing;
pub mod logging;
pub mod transport;
