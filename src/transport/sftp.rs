//! SFTP transport session

use std::sync::Arc;
use std::time::Duration;

use russh::Disconnect;
use russh::client::{self, Config};
use russh_sftp::client::SftpSession;
use secrecy::{ExposeSecret, SecretString};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::{Endpoint, TransportDefaults};
use crate::error::{ConnectError, ListingError, NavigationError};

use super::handler::ClientHandler;
use super::{ProtocolKind, RawEntry, Transport};

/// Live SSH connection state; both halves exist or neither does
struct Connection {
    handle: client::Handle<ClientHandler>,
    sftp: SftpSession,
}

/// One SFTP session against a configured endpoint
pub struct SftpTransport {
    endpoint_name: String,
    host: String,
    port: u16,
    username: String,
    password: Option<SecretString>,
    connect_timeout: Duration,
    operation_timeout: Duration,
    config: Arc<Config>,
    connection: Option<Connection>,
    current_path: String,
}

impl SftpTransport {
    pub fn new(endpoint: &Endpoint, defaults: &TransportDefaults) -> Self {
        let config = Config {
            inactivity_timeout: Some(Duration::from_secs(3600)),
            keepalive_interval: Some(Duration::from_secs(60)),
            keepalive_max: 3,
            ..Default::default()
        };

        Self {
            endpoint_name: endpoint.name.clone(),
            host: endpoint.host.clone(),
            port: endpoint.port(),
            username: endpoint.username.clone(),
            password: endpoint.password.clone(),
            connect_timeout: defaults.connect_timeout(),
            operation_timeout: defaults.operation_timeout(),
            config: Arc::new(config),
            connection: None,
            current_path: "/".to_string(),
        }
    }

    async fn try_connect(&mut self) -> Result<(), ConnectError> {
        let addr = format!("{}:{}", self.host, self.port);

        let stream = timeout(self.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| ConnectError::Timeout(addr.clone()))?
            .map_err(|e| ConnectError::ConnectionFailed {
                host: self.host.clone(),
                port: self.port,
                reason: e.to_string(),
            })?;

        // Handshake, auth and subsystem setup share the connect timeout
        let connection = timeout(self.connect_timeout, self.establish(stream))
            .await
            .map_err(|_| ConnectError::Timeout(addr))??;

        self.connection = Some(connection);
        self.current_path = "/".to_string();
        Ok(())
    }

    async fn establish(&self, stream: TcpStream) -> Result<Connection, ConnectError> {
        let handler = ClientHandler::new(self.host.clone(), self.port);

        let mut handle = client::connect_stream(self.config.clone(), stream, handler)
            .await
            .map_err(|e| ConnectError::Negotiation(format!("SSH handshake failed: {}", e)))?;

        let password = self
            .password
            .as_ref()
            .map(|p| p.expose_secret().to_string())
            .unwrap_or_default();

        let auth_result = handle
            .authenticate_password(self.username.as_str(), password.as_str())
            .await
            .map_err(|e| ConnectError::AuthenticationFailed(e.to_string()))?;

        if !auth_result.success() {
            return Err(ConnectError::AuthenticationFailed(
                "rejected by server".to_string(),
            ));
        }

        let channel = handle
            .channel_open_session()
            .await
            .map_err(|e| ConnectError::Negotiation(format!("Failed to open channel: {}", e)))?;

        channel.request_subsystem(false, "sftp").await.map_err(|e| {
            ConnectError::Negotiation(format!("Failed to request SFTP subsystem: {}", e))
        })?;

        let sftp = SftpSession::new(channel.into_stream()).await.map_err(|e| {
            ConnectError::Negotiation(format!("Failed to initialize SFTP session: {}", e))
        })?;

        Ok(Connection { handle, sftp })
    }
}

#[async_trait::async_trait]
impl Transport for SftpTransport {
    async fn connect(&mut self) -> Result<(), ConnectError> {
        match self.try_connect().await {
            Ok(()) => {
                tracing::info!(
                    "Connected to {} ({}:{}) over SFTP",
                    self.endpoint_name,
                    self.host,
                    self.port
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    "SFTP connection to {} ({}:{}) failed: {}",
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
        let Some(connection) = self.connection.as_ref() else {
            return Err(NavigationError::NotConnected);
        };

        let target = path.unwrap_or("/");

        let attrs = timeout(
            self.operation_timeout,
            connection.sftp.metadata(target.to_string()),
        )
        .await
        .map_err(|_| NavigationError::Timeout(target.to_string()))?
        .map_err(|e| NavigationError::Inaccessible {
            path: target.to_string(),
            reason: e.to_string(),
        })?;

        if !attrs.is_dir() {
            return Err(NavigationError::NotADirectory(target.to_string()));
        }

        self.current_path = target.to_string();
        Ok(())
    }

    async fn list_files(&mut self) -> Result<Vec<RawEntry>, ListingError> {
        let Some(connection) = self.connection.as_ref() else {
            return Err(ListingError::NotConnected);
        };

        let read_dir = timeout(
            self.operation_timeout,
            connection.sftp.read_dir(self.current_path.clone()),
        )
        .await
        .map_err(|_| ListingError::Timeout(self.current_path.clone()))?
        .map_err(|e| ListingError::ReadDir {
            path: self.current_path.clone(),
            reason: e.to_string(),
        })?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let metadata = entry.metadata();
            entries.push(RawEntry::Attributes {
                name: entry.file_name(),
                size: metadata.size,
                mtime: metadata.mtime.map(u64::from),
                mode: metadata.permissions,
            });
        }

        Ok(entries)
    }

    async fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            let _ = connection
                .handle
                .disconnect(Disconnect::ByApplication, "session closed", "en")
                .await;
            tracing::debug!("Disconnected from {}", self.endpoint_name);
        }
    }

    fn protocol(&self) -> ProtocolKind {
        ProtocolKind::Sftp
    }

    fn current_path(&self) -> &str {
        &self.current_path
    }
}
