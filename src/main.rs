use anyhow::Context;

use spyglass::browse::{BrowseController, BrowseRequest, BrowseResponse, DirectoryListing};
use spyglass::config::{AppConfig, EndpointsConfig};
use spyglass::listing::format_size;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with file output.
    let log_dir = spyglass::config::paths::ensure_log_dir().ok();
    let _guard = spyglass::logging::init_logging(log_dir);

    tracing::info!("Starting Spyglass");

    let endpoints = EndpointsConfig::load().context("loading endpoints.toml")?;
    let settings = AppConfig::load().context("loading settings.toml")?;

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let json = match args.iter().position(|a| a == "--json") {
        Some(pos) => {
            args.remove(pos);
            true
        }
        None => false,
    };

    // No endpoint selected: render the endpoint overview
    let Some(endpoint_id) = args.first().cloned() else {
        print_endpoints(&endpoints);
        return Ok(());
    };

    let request = BrowseRequest {
        endpoint_id: Some(endpoint_id),
        path: args.get(1).cloned(),
    };

    let controller = BrowseController::new(&endpoints, &settings.transport);
    let response = controller.browse(&request).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    match response {
        BrowseResponse::Listing(listing) => print_listing(&listing),
        BrowseResponse::Error(error) => {
            eprintln!("error: {}", error.error);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_endpoints(endpoints: &EndpointsConfig) {
    if endpoints.list_all().is_empty() {
        println!("No endpoints configured.");
        if let Some(path) = spyglass::config::paths::endpoints_file() {
            println!("Add [[endpoints]] entries to {}", path.display());
        }
        return;
    }

    println!("{:<12} {:<6} {:<24} HOST", "ID", "PROTO", "NAME");
    for endpoint in endpoints.list_all() {
        println!(
            "{:<12} {:<6} {:<24} {}",
            endpoint.id,
            endpoint.protocol.label(),
            endpoint.name,
            endpoint.addr()
        );
    }
}

fn print_listing(listing: &DirectoryListing) {
    println!(
        "{} ({}) {}",
        listing.endpoint_name, listing.protocol_kind, listing.current_path
    );
    if let Some(parent) = &listing.parent_path {
        println!("up: {}", parent);
    }
    if let Some(error) = &listing.listing_error {
        println!("listing failed: {}", error);
    }

    for entry in &listing.entries {
        let suffix = if entry.is_directory { "/" } else { "" };
        println!(
            "{:<10} {:>9} {:<16} {}{}",
            entry.permissions,
            format_size(entry.size),
            entry.modified_at,
            entry.name,
            suffix
        );
    }

    println!("{} entries", listing.entry_count);
}
