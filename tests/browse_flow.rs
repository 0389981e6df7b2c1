//! End-to-end browse controller scenarios using scripted transports

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use spyglass::browse::{BrowseController, BrowseRequest, BrowseResponse, DirectoryListing};
use spyglass::config::{EndpointsConfig, TransportDefaults};
use spyglass::error::{ConnectError, ListingError, NavigationError};
use spyglass::listing::format_size;
use spyglass::transport::{ProtocolKind, RawEntry, Transport};

fn store() -> EndpointsConfig {
    toml::from_str(
        r#"
            [[endpoints]]
            id = "42"
            name = "build-archive"
            protocol = "sftp"
            host = "archive.internal"
            username = "builds"
            password = "hunter2"

            [[endpoints]]
            id = "7"
            name = "firmware-drop"
            protocol = "ftp"
            host = "192.168.7.2"
        "#,
    )
    .unwrap()
}

/// Scripted transport: connect/cwd/list outcomes are fixed up front
struct FakeTransport {
    protocol: ProtocolKind,
    connect_error: Option<String>,
    cwd_failures: Vec<String>,
    fail_root_reset: bool,
    listing: Option<Vec<RawEntry>>,
    current_path: String,
    disconnected: Arc<AtomicBool>,
}

impl FakeTransport {
    fn new(protocol: ProtocolKind, listing: Vec<RawEntry>) -> Self {
        Self {
            protocol,
            connect_error: None,
            cwd_failures: Vec::new(),
            fail_root_reset: false,
            listing: Some(listing),
            current_path: "/".to_string(),
            disconnected: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn connect(&mut self) -> Result<(), ConnectError> {
        match &self.connect_error {
            Some(reason) => Err(ConnectError::ConnectionFailed {
                host: "fake".to_string(),
                port: 21,
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn change_directory(&mut self, path: Option<&str>) -> Result<(), NavigationError> {
        match path {
            Some(p) if self.cwd_failures.iter().any(|f| f == p) => {
                Err(NavigationError::Inaccessible {
                    path: p.to_string(),
                    reason: "no such directory".to_string(),
                })
            }
            Some(p) => {
                self.current_path = p.to_string();
                Ok(())
            }
            None if self.fail_root_reset => Err(NavigationError::Inaccessible {
                path: "/".to_string(),
                reason: "connection dropped".to_string(),
            }),
            None => {
                self.current_path = "/".to_string();
                Ok(())
            }
        }
    }

    async fn list_files(&mut self) -> Result<Vec<RawEntry>, ListingError> {
        match &self.listing {
            Some(raw) => Ok(raw.clone()),
            None => Err(ListingError::ReadDir {
                path: self.current_path.clone(),
                reason: "permission denied".to_string(),
            }),
        }
    }

    async fn disconnect(&mut self) {
        self.disconnected.store(true, Ordering::SeqCst);
    }

    fn protocol(&self) -> ProtocolKind {
        self.protocol
    }

    fn current_path(&self) -> &str {
        &self.current_path
    }
}

fn sftp_root_listing() -> Vec<RawEntry> {
    vec![
        RawEntry::Attributes {
            name: ".".to_string(),
            size: Some(0),
            mtime: Some(0),
            mode: Some(0o40755),
        },
        RawEntry::Attributes {
            name: "a.txt".to_string(),
            size: Some(2048),
            mtime: Some(1_700_000_000),
            mode: Some(0o100644),
        },
        RawEntry::Attributes {
            name: "docs".to_string(),
            size: Some(0),
            mtime: Some(0),
            mode: Some(0o40755),
        },
    ]
}

fn expect_listing(response: BrowseResponse) -> DirectoryListing {
    match response {
        BrowseResponse::Listing(listing) => listing,
        BrowseResponse::Error(error) => panic!("expected listing, got error: {}", error.error),
    }
}

#[tokio::test]
async fn sftp_listing_is_normalized_sorted_and_classified() {
    let store = store();
    let defaults = TransportDefaults::default();
    let controller = BrowseController::new(&store, &defaults);
    let fake = FakeTransport::new(ProtocolKind::Sftp, sftp_root_listing());

    let request = BrowseRequest {
        endpoint_id: Some("42".to_string()),
        path: None,
    };
    let response = controller
        .browse_with(&request, move |_, _| Box::new(fake))
        .await;
    let listing = expect_listing(response);

    assert_eq!(listing.endpoint_id, "42");
    assert_eq!(listing.endpoint_name, "build-archive");
    assert_eq!(listing.protocol_kind, "SFTP");
    assert_eq!(listing.current_path, "/");
    assert_eq!(listing.parent_path, None);
    assert!(listing.listing_error.is_none());

    // "." is dropped; directories come first
    assert_eq!(listing.entry_count, 2);
    assert_eq!(listing.entries[0].name, "docs");
    assert!(listing.entries[0].is_directory);
    assert_eq!(listing.entries[0].permissions, "drwxr-xr-x");
    assert_eq!(listing.entries[0].modified_at, "");

    assert_eq!(listing.entries[1].name, "a.txt");
    assert!(!listing.entries[1].is_directory);
    assert_eq!(listing.entries[1].permissions, "-rw-r--r--");
    assert_eq!(listing.entries[1].size, 2048);
    assert_eq!(format_size(listing.entries[1].size), "2.0 KB");
    assert!(!listing.entries[1].modified_at.is_empty());
}

#[tokio::test]
async fn navigation_into_subdirectory_reports_parent() {
    let store = store();
    let defaults = TransportDefaults::default();
    let controller = BrowseController::new(&store, &defaults);
    let fake = FakeTransport::new(ProtocolKind::Sftp, sftp_root_listing());

    // Relative input is normalized to an absolute remote path
    let request = BrowseRequest {
        endpoint_id: Some("42".to_string()),
        path: Some("docs".to_string()),
    };
    let response = controller
        .browse_with(&request, move |_, _| Box::new(fake))
        .await;
    let listing = expect_listing(response);

    assert_eq!(listing.current_path, "/docs");
    assert_eq!(listing.parent_path.as_deref(), Some("/"));
}

#[tokio::test]
async fn connect_failure_renders_error_view() {
    let store = store();
    let defaults = TransportDefaults::default();
    let controller = BrowseController::new(&store, &defaults);
    let mut fake = FakeTransport::new(ProtocolKind::Ftp, vec![]);
    fake.connect_error = Some("connection refused".to_string());

    let request = BrowseRequest {
        endpoint_id: Some("7".to_string()),
        path: None,
    };
    let response = controller
        .browse_with(&request, move |_, _| Box::new(fake))
        .await;

    let BrowseResponse::Error(error) = response else {
        panic!("expected error view");
    };
    assert!(error.error.contains("firmware-drop"));
    assert!(error.error.contains("connection refused"));
    assert_eq!(error.endpoint_id.as_deref(), Some("7"));
    assert_eq!(error.endpoint_name.as_deref(), Some("firmware-drop"));
}

#[tokio::test]
async fn failed_navigation_falls_back_to_root() {
    let store = store();
    let defaults = TransportDefaults::default();
    let controller = BrowseController::new(&store, &defaults);
    let mut fake = FakeTransport::new(ProtocolKind::Sftp, sftp_root_listing());
    fake.cwd_failures = vec!["/missing".to_string()];

    let request = BrowseRequest {
        endpoint_id: Some("42".to_string()),
        path: Some("/missing".to_string()),
    };
    let response = controller
        .browse_with(&request, move |_, _| Box::new(fake))
        .await;
    let listing = expect_listing(response);

    // No hard error; root listing is returned instead
    assert_eq!(listing.current_path, "/");
    assert_eq!(listing.parent_path, None);
    assert_eq!(listing.entry_count, 2);
    assert!(listing.listing_error.is_none());
}

#[tokio::test]
async fn failed_recovery_is_swallowed() {
    let store = store();
    let defaults = TransportDefaults::default();
    let controller = BrowseController::new(&store, &defaults);
    let mut fake = FakeTransport::new(ProtocolKind::Sftp, sftp_root_listing());
    fake.cwd_failures = vec!["/missing".to_string()];
    fake.fail_root_reset = true;

    let request = BrowseRequest {
        endpoint_id: Some("42".to_string()),
        path: Some("/missing".to_string()),
    };
    let response = controller
        .browse_with(&request, move |_, _| Box::new(fake))
        .await;

    // Still the browse view, with whatever path the session reports
    let listing = expect_listing(response);
    assert_eq!(listing.current_path, "/");
}

#[tokio::test]
async fn listing_failure_is_soft_and_keeps_navigation_context() {
    let store = store();
    let defaults = TransportDefaults::default();
    let controller = BrowseController::new(&store, &defaults);
    let mut fake = FakeTransport::new(ProtocolKind::Sftp, vec![]);
    fake.listing = None;

    let request = BrowseRequest {
        endpoint_id: Some("42".to_string()),
        path: Some("/srv".to_string()),
    };
    let response = controller
        .browse_with(&request, move |_, _| Box::new(fake))
        .await;
    let listing = expect_listing(response);

    assert_eq!(listing.endpoint_name, "build-archive");
    assert_eq!(listing.current_path, "/srv");
    assert_eq!(listing.parent_path.as_deref(), Some("/"));
    assert!(listing.entries.is_empty());
    assert_eq!(listing.entry_count, 0);
    let message = listing.listing_error.unwrap();
    assert!(message.contains("permission denied"));
}

#[tokio::test]
async fn unknown_endpoint_renders_error_view() {
    let store = store();
    let defaults = TransportDefaults::default();
    let controller = BrowseController::new(&store, &defaults);

    let request = BrowseRequest {
        endpoint_id: Some("999".to_string()),
        path: None,
    };
    let response = controller
        .browse_with(&request, |_, _| unreachable!("no endpoint, no transport"))
        .await;

    let BrowseResponse::Error(error) = response else {
        panic!("expected error view");
    };
    assert!(error.error.contains("999"));
    assert!(error.endpoint_name.is_none());
}

#[tokio::test]
async fn missing_endpoint_id_renders_error_view() {
    let store = store();
    let defaults = TransportDefaults::default();
    let controller = BrowseController::new(&store, &defaults);

    let response = controller
        .browse_with(&BrowseRequest::default(), |_, _| {
            unreachable!("no endpoint, no transport")
        })
        .await;

    assert!(matches!(response, BrowseResponse::Error(_)));
}

#[tokio::test]
async fn ftp_bare_names_and_partial_records_mix() {
    let store = store();
    let defaults = TransportDefaults::default();
    let controller = BrowseController::new(&store, &defaults);
    let fake = FakeTransport::new(
        ProtocolKind::Ftp,
        vec![
            RawEntry::Name(".".to_string()),
            RawEntry::Name("..".to_string()),
            RawEntry::Name("firmware.bin".to_string()),
            RawEntry::Partial {
                name: "pub".to_string(),
                size: 4096,
                is_dir: true,
            },
        ],
    );

    let request = BrowseRequest {
        endpoint_id: Some("7".to_string()),
        path: None,
    };
    let response = controller
        .browse_with(&request, move |_, _| Box::new(fake))
        .await;
    let listing = expect_listing(response);

    assert_eq!(listing.protocol_kind, "FTP");
    assert_eq!(listing.entry_count, 2);
    assert_eq!(listing.entries[0].name, "pub");
    assert!(listing.entries[0].is_directory);
    // FTP metadata asymmetry is preserved: bare names keep defaults
    assert_eq!(listing.entries[1].name, "firmware.bin");
    assert_eq!(listing.entries[1].size, 0);
    assert_eq!(listing.entries[1].permissions, "");
}

#[tokio::test]
async fn session_is_disconnected_after_a_successful_browse() {
    let store = store();
    let defaults = TransportDefaults::default();
    let controller = BrowseController::new(&store, &defaults);
    let fake = FakeTransport::new(ProtocolKind::Sftp, sftp_root_listing());
    let disconnected = fake.disconnected.clone();

    let request = BrowseRequest {
        endpoint_id: Some("42".to_string()),
        path: None,
    };
    let _ = controller
        .browse_with(&request, move |_, _| Box::new(fake))
        .await;

    assert!(disconnected.load(Ordering::SeqCst));
}
