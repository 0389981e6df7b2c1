//! FTP transport session
//!
//! suppaftp's `FtpStream` is blocking, so the stream is moved into
//! `spawn_blocking` for each operation and handed back afterwards. If an
//! operation times out the stream stays with the abandoned task and the
//! session degrades to the unusable state.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use suppaftp::FtpStream;
use suppaftp::list;
use tokio::task;
use tokio::time::timeout;

use crate::config::{Endpoint, TransportDefaults};
use crate::error::{ConnectError, ListingError, NavigationError};

use super::{ProtocolKind, RawEntry, Transport};

/// One FTP session against a configured endpoint
pub struct FtpTransport {
    endpoint_name: String,
    host: String,
    port: u16,
    username: String,
    password: Option<SecretString>,
    connect_timeout: Duration,
    operation_timeout: Duration,
    stream: Option<FtpStream>,
    current_path: String,
}

impl FtpTransport {
    pub fn new(endpoint: &Endpoint, defaults: &TransportDefaults) -> Self {
        Self {
            endpoint_name: endpoint.name.clone(),
            host: endpoint.host.clone(),
            port: endpoint.port(),
            username: endpoint.username.clone(),
            password: endpoint.password.clone(),
            connect_timeout: defaults.connect_timeout(),
            operation_timeout: defaults.operation_timeout(),
            stream: None,
            current_path: "/".to_string(),
        }
    }

    /// Login credentials, falling back to anonymous when none are configured
    fn credentials(&self) -> (String, String) {
        if self.username.is_empty() {
            return ("anonymous".to_string(), "anonymous".to_string());
        }
        let password = self
            .password
            .as_ref()
            .map(|p| p.expose_secret().to_string())
            .unwrap_or_default();
        (self.username.clone(), password)
    }

    async fn try_connect(&mut self) -> Result<(), ConnectError> {
        let addr = format!("{}:{}", self.host, self.port);
        let addr_label = addr.clone();
        let host = self.host.clone();
        let port = self.port;
        let (username, password) = self.credentials();
        let socket_timeout = self.operation_timeout;

        let connect = task::spawn_blocking(move || -> Result<FtpStream, ConnectError> {
            let mut ftp =
                FtpStream::connect(&addr).map_err(|e| ConnectError::ConnectionFailed {
                    host,
                    port,
                    reason: e.to_string(),
                })?;

            // Socket timeouts guard the reads/writes of later operations
            ftp.get_ref().set_read_timeout(Some(socket_timeout)).ok();
            ftp.get_ref().set_write_timeout(Some(socket_timeout)).ok();

            ftp.login(&username, &password)
                .map_err(|e| ConnectError::AuthenticationFailed(e.to_string()))?;

            Ok(ftp)
        });

        let stream = timeout(self.connect_timeout, connect)
            .await
            .map_err(|_| ConnectError::Timeout(addr_label))?
            .map_err(|e| ConnectError::Negotiation(format!("connect task failed: {}", e)))??;

        self.stream = Some(stream);
        self.current_path = "/".to_string();
        Ok(())
    }
}

#[async_trait::async_trait]
impl Transport for FtpTransport {
    async fn connect(&mut self) -> Result<(), ConnectError> {
        match self.try_connect().await {
            Ok(()) => {
                tracing::info!(
                    "Connected to {} ({}:{}) over FTP",
                    self.endpoint_name,
                    self.host,
                    self.port
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    "FTP connection to {} ({}:{}) failed: {}",
                    self.endpoint_name,
                    self.host,
                    self.port,
                    e
                );
                Err(e)
            }
        }
    }

    async fn change_directory(&mut self, path: Option<&str>) -> Result<(), NavigationError> {
        let mut ftp = self.stream.take().ok_or(NavigationError::NotConnected)?;
        let target = path.unwrap_or("/").to_string();
        let target_label = target.clone();

        let cwd = task::spawn_blocking(move || {
            let result = ftp.cwd(&target);
            (ftp, result)
        });

        let (ftp, result) = timeout(self.operation_timeout, cwd)
            .await
            .map_err(|_| NavigationError::Timeout(target_label.clone()))?
            .map_err(|e| NavigationError::Inaccessible {
                path: target_label.clone(),
                reason: format!("cwd task failed: {}", e),
            })?;

        self.stream = Some(ftp);

        result.map_err(|e| NavigationError::Inaccessible {
            path: target_label.clone(),
            reason: e.to_string(),
        })?;

        self.current_path = target_label;
        Ok(())
    }

    async fn list_files(&mut self) -> Result<Vec<RawEntry>, ListingError> {
        let mut ftp = self.stream.take().ok_or(ListingError::NotConnected)?;
        let path = self.current_path.clone();

        let listing = task::spawn_blocking(move || {
            let outcome: Result<Vec<RawEntry>, suppaftp::FtpError> = match ftp.list(None) {
                Ok(lines) => Ok(lines.iter().map(|line| parse_list_line(line)).collect()),
                // Some servers only speak NLST; fall back to the bare name stream
                Err(list_err) => match ftp.nlst(None) {
                    Ok(names) => Ok(names.into_iter().map(RawEntry::Name).collect()),
                    Err(_) => Err(list_err),
                },
            };
            (ftp, outcome)
        });

        let (ftp, outcome) = timeout(self.operation_timeout, listing)
            .await
            .map_err(|_| ListingError::Timeout(path.clone()))?
            .map_err(|e| ListingError::ReadDir {
                path: path.clone(),
                reason: format!("list task failed: {}", e),
            })?;

        self.stream = Some(ftp);

        outcome.map_err(|e| ListingError::ReadDir {
            path,
            reason: e.to_string(),
        })
    }

    async fn disconnect(&mut self) {
        if let Some(mut ftp) = self.stream.take() {
            let _ = task::spawn_blocking(move || ftp.quit()).await;
            tracing::debug!("Disconnected from {}", self.endpoint_name);
        }
    }

    fn protocol(&self) -> ProtocolKind {
        ProtocolKind::Ftp
    }

    fn current_path(&self) -> &str {
        &self.current_path
    }
}

/// Parse one LIST response line.
///
/// Lines in a format suppaftp understands become partial records; anything
/// else is treated as a bare name, which is how servers answering LIST with
/// plain name streams end up represented.
fn parse_list_line(line: &str) -> RawEntry {
    match line.parse::<list::File>() {
        Ok(file) => RawEntry::Partial {
            name: file.name().to_string(),
            size: file.size() as u64,
            is_dir: file.is_directory(),
        },
        Err(_) => RawEntry::Name(line.trim().to_string()),
    }
}
