use std::process;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use modelgate::cli::{format_dry_run, Args};
use modelgate::cluster::route;
use modelgate::config::{default_endpoint_specs, load_manifest_file};
use modelgate::models::builtin_binder;
use modelgate::server::{create_router, AppState};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    // Load and validate the endpoint manifest
    let specs = match args.manifest_file {
        Some(ref path) => match load_manifest_file(path) {
            Ok(manifest) => manifest.endpoints,
            Err(e) => {
                error!("Failed to load manifest {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => default_endpoint_specs(),
    };

    let binder = builtin_binder();

    // Dry-run mode: print the endpoint plan and exit
    if args.dry_run {
        let output = format_dry_run(&specs, &binder, &args);
        println!("{}", output);
        return;
    }

    // Create application state and publish the endpoints. Publishing binds
    // every model before the listener opens, so a served route never points
    // at a half-loaded pipeline.
    let state = AppState::new(binder);

    let deployed = if args.update {
        state.registry.replace(&specs).await
    } else {
        state.registry.publish(&specs).await
    };
    if let Err(e) = deployed {
        error!("Failed to publish endpoints: {}", e);
        process::exit(1);
    }

    let bind_addr = args.bind_addr.as_deref().unwrap_or("0.0.0.0");
    let port = args.port.unwrap_or(8000);
    let addr = format!("{}:{}", bind_addr, port);

    info!("Starting modelgate on {}", addr);

    // Create and run the server
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            process::exit(1);
        }
    };

    info!("Server listening on {}", addr);
    info!("Endpoints:");
    info!("  GET  /health       - Health check");
    info!("  GET  /status       - Gateway status");
    info!("  *    /v1/endpoints - Endpoint admin API");
    for spec in &specs {
        for method in &spec.methods {
            info!("  {:<4} {}", method.as_str(), route(&spec.identity()));
        }
    }

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        process::exit(1);
    }
}
