//! Transport abstraction over FTP and SFTP directory access
//!
//! One [`Transport`] is one connection lifecycle against a configured
//! endpoint: connect, change directory, list, disconnect. The two protocol
//! implementations differ only in wire behavior and in the [`RawEntry`]
//! shape their listings produce.

pub mod ftp;
mod handler;
pub mod sftp;

pub use ftp::FtpTransport;
pub use sftp::SftpTransport;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{Endpoint, TransportDefaults};
use crate::error::{ConnectError, ListingError, NavigationError};

/// Transfer protocol spoken by an endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolKind {
    Ftp,
    #[default]
    Sftp,
}

impl ProtocolKind {
    /// Upper-cased label used in the browse response and log context
    pub fn label(&self) -> &'static str {
        match self {
            ProtocolKind::Ftp => "FTP",
            ProtocolKind::Sftp => "SFTP",
        }
    }
}

/// Protocol-native, unnormalized directory-listing record.
///
/// SFTP produces structured attribute records; FTP produces either a
/// parsed partial record or a bare name, depending on what the server's
/// LIST output gives us. The variant carries the protocol dispatch, so
/// normalization never has to sniff shapes at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEntry {
    /// SFTP filename plus attribute record
    Attributes {
        name: String,
        size: Option<u64>,
        /// Unix epoch seconds
        mtime: Option<u64>,
        /// Unix permission mode bits
        mode: Option<u32>,
    },
    /// Partial record parsed from an FTP LIST line
    Partial {
        name: String,
        size: u64,
        is_dir: bool,
    },
    /// Bare name with no metadata
    Name(String),
}

/// One connection lifecycle against a configured endpoint.
///
/// A session is either connected or unusable: a failed [`connect`] leaves
/// it in a state where every further operation returns `NotConnected`.
/// Sessions are created per browse request and never pooled or shared.
///
/// [`connect`]: Transport::connect
#[async_trait]
pub trait Transport: Send {
    /// Establish the protocol connection using the endpoint's credentials
    async fn connect(&mut self) -> Result<(), ConnectError>;

    /// Change the current remote path; `None` returns to root.
    ///
    /// On failure the current path is unspecified; the caller decides
    /// whether and how to recover.
    async fn change_directory(&mut self, path: Option<&str>) -> Result<(), NavigationError>;

    /// Raw, unnormalized, unsorted contents of the current path
    async fn list_files(&mut self) -> Result<Vec<RawEntry>, ListingError>;

    /// Release the connection; idempotent and best-effort
    async fn disconnect(&mut self);

    fn protocol(&self) -> ProtocolKind;

    /// The path this session currently reports as its working directory
    fn current_path(&self) -> &str;
}

/// Build the concrete transport for an endpoint's protocol kind.
///
/// The returned session is not yet connected.
pub fn for_endpoint(endpoint: &Endpoint, defaults: &TransportDefaults) -> Box<dyn Transport> {
    match endpoint.protocol {
        ProtocolKind::Ftp => Box::new(FtpTransport::new(endpoint, defaults)),
        ProtocolKind::Sftp => Box::new(SftpTransport::new(endpoint, defaults)),
    }
}
