use secrecy::SecretString;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::transport::ProtocolKind;

/// Single remote transfer endpoint configuration.
///
/// Records are consumed read-only: the browse core resolves an endpoint by
/// identifier and hands host/credential fields straight to the transport
/// layer without inspecting them further.
#[derive(Debug, Clone, Deserialize)]
pub struct Endpoint {
    pub id: String,
    pub name: String,
    pub protocol: ProtocolKind,
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub username: String,
    /// Never serialized, never logged; Debug prints it redacted.
    #[serde(default)]
    pub password: Option<SecretString>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Endpoint {
    /// Resolved port: the configured value or the protocol default
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(match self.protocol {
            ProtocolKind::Ftp => 21,
            ProtocolKind::Sftp => 22,
        })
    }

    /// `host:port` form used for socket connects and log context
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port())
    }
}

/// Root configuration for endpoints.toml
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EndpointsConfig {
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

impl EndpointsConfig {
    /// Find an endpoint by identifier
    pub fn find(&self, id: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.id == id)
    }

    /// All configured endpoints, in file order
    pub fn list_all(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Load from file, returning an empty store if the file does not exist
    pub fn load() -> Result<Self, ConfigError> {
        let path = super::paths::endpoints_file().ok_or_else(|| ConfigError::ReadFile {
            path: std::path::PathBuf::from("endpoints.toml"),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine endpoints file path",
            ),
        })?;

        tracing::debug!("Loading endpoints from: {:?}", path);

        if !path.exists() {
            tracing::warn!("Endpoints file does not exist: {:?}", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadFile {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(ConfigError::Parse)
    }
}
