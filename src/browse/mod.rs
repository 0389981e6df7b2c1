//! Browse controller: one request in, one structured response out
//!
//! The controller runs a fixed sequence per request (resolve endpoint,
//! connect, navigate, list, normalize, sort) and converts every failure
//! into a field of the returned response. Nothing escapes this module as
//! an error; the presentation layer always gets exactly one of the two
//! response views.

pub mod path;

use serde::{Deserialize, Serialize};

use crate::config::{Endpoint, EndpointsConfig, TransportDefaults};
use crate::listing::{FileEntry, normalize, sort_entries};
use crate::transport::{self, Transport};

/// A single browse request from the presentation layer.
///
/// An absent `endpoint_id` selects the "list all endpoints" view, which is
/// rendering-only and handled by the caller, not here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseRequest {
    pub endpoint_id: Option<String>,
    pub path: Option<String>,
}

/// Successful browse payload
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryListing {
    pub endpoint_id: String,
    pub endpoint_name: String,
    pub protocol_kind: String,
    pub current_path: String,
    pub parent_path: Option<String>,
    pub entries: Vec<FileEntry>,
    /// Set when the connection succeeded but the listing itself failed;
    /// `entries` is empty in that case and the navigation context stands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_error: Option<String>,
    pub entry_count: usize,
}

/// Terminal browse failure
#[derive(Debug, Clone, Serialize)]
pub struct BrowseError {
    pub error: String,
    pub endpoint_id: Option<String>,
    pub endpoint_name: Option<String>,
}

/// Response contract for the presentation layer: exactly one view
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BrowseResponse {
    Listing(DirectoryListing),
    Error(BrowseError),
}

/// Orchestrates a single browse request against the endpoint store
pub struct BrowseController<'a> {
    endpoints: &'a EndpointsConfig,
    defaults: &'a TransportDefaults,
}

impl<'a> BrowseController<'a> {
    pub fn new(endpoints: &'a EndpointsConfig, defaults: &'a TransportDefaults) -> Self {
        Self {
            endpoints,
            defaults,
        }
    }

    /// Run one browse request with the real protocol transports
    pub async fn browse(&self, request: &BrowseRequest) -> BrowseResponse {
        self.browse_with(request, transport::for_endpoint).await
    }

    /// Run one browse request with a caller-supplied transport factory.
    ///
    /// The factory seam exists so tests can script a session; production
    /// callers use [`browse`](Self::browse).
    pub async fn browse_with<F>(&self, request: &BrowseRequest, factory: F) -> BrowseResponse
    where
        F: FnOnce(&Endpoint, &TransportDefaults) -> Box<dyn Transport>,
    {
        let requested_id = request.endpoint_id.as_deref().unwrap_or_default();
        let Some(endpoint) = self.endpoints.find(requested_id) else {
            tracing::error!("Browse request for unknown endpoint '{}'", requested_id);
            return BrowseResponse::Error(BrowseError {
                error: format!("Unknown endpoint: {}", requested_id),
                endpoint_id: request.endpoint_id.clone(),
                endpoint_name: None,
            });
        };

        let mut session = factory(endpoint, self.defaults);

        if let Err(e) = session.connect().await {
            tracing::error!("Connection to {} failed: {}", endpoint.name, e);
            return BrowseResponse::Error(BrowseError {
                error: format!("Could not connect to {}: {}", endpoint.name, e),
                endpoint_id: Some(endpoint.id.clone()),
                endpoint_name: Some(endpoint.name.clone()),
            });
        }

        // Navigation failures are never terminal: fall back to root once,
        // and if even that fails keep whatever path the session reports.
        if let Some(target) = request.path.as_deref().and_then(path::normalize) {
            if let Err(e) = session.change_directory(Some(&target)).await {
                tracing::warn!(
                    "Could not change to {} on {}: {}",
                    target,
                    endpoint.name,
                    e
                );
                if let Err(e) = session.change_directory(None).await {
                    tracing::warn!("Fallback to root failed on {}: {}", endpoint.name, e);
                }
            }
        }

        let (raw_entries, listing_error) = match session.list_files().await {
            Ok(raw) => (raw, None),
            Err(e) => {
                tracing::warn!(
                    "Listing {} on {} failed: {}",
                    session.current_path(),
                    endpoint.name,
                    e
                );
                (Vec::new(), Some(e.to_string()))
            }
        };

        let mut entries: Vec<FileEntry> = raw_entries.into_iter().filter_map(normalize).collect();
        sort_entries(&mut entries);

        let current_path = session.current_path().to_string();
        let parent_path = path::parent_of(&current_path);

        session.disconnect().await;

        BrowseResponse::Listing(DirectoryListing {
            endpoint_id: endpoint.id.clone(),
            endpoint_name: endpoint.name.clone(),
            protocol_kind: endpoint.protocol.label().to_string(),
            current_path,
            parent_path,
            entry_count: entries.len(),
            entries,
            listing_error,
        })
    }
}
