use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use sha2::{Digest, Sha256};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use updater_core::{
    load_config, validate_config, Config, GithubRegistry, HttpFetcher, SystemctlManager,
    UpdateCoordinator,
};
use updater_server::{api::create_router, cli::Cli, progress::spawn_download_bar, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Buffer size for download progress updates
const PROGRESS_BUFFER_SIZE: usize = 64;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        eprintln!("Update failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    info!("Loading configuration from {:?}", cli.config);
    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    cli.apply_overrides(&mut config);

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        version = VERSION,
        config_hash = &config_hash[..16],
        artifact = %config.registry.artifact_name,
        application = %config.application.path.display(),
        service_enabled = config.service.enabled,
        "Configuration loaded"
    );

    let token = cli.read_token()?;
    let coordinator = Arc::new(build_coordinator(config.clone(), &token)?);

    if cli.server {
        serve(config, coordinator).await
    } else {
        update_once(&coordinator).await
    }
}

/// Wires the production collaborators into a coordinator.
fn build_coordinator(config: Config, token: &str) -> Result<UpdateCoordinator> {
    let registry = Arc::new(
        GithubRegistry::new(&config.registry, token).context("Failed to create registry client")?,
    );
    let timeout = config.registry.timeout_secs.map(Duration::from_secs);
    let fetcher =
        Arc::new(HttpFetcher::new(registry.clone(), timeout).context("Failed to create fetcher")?);
    let service = Arc::new(SystemctlManager::new(&config.service.manager_path));

    Ok(UpdateCoordinator::new(config, registry, fetcher, service))
}

/// Runs a single attempt with a download bar.
async fn update_once(coordinator: &UpdateCoordinator) -> Result<()> {
    let (tx, rx) = mpsc::channel(PROGRESS_BUFFER_SIZE);
    let bar = spawn_download_bar(rx);

    let result = coordinator.run_with_progress(tx).await;
    if let Err(e) = bar.await {
        warn!(error = %e, "Progress display task failed");
    }

    let report = result?;
    if let Some(status) = &report.status_output {
        println!("{}", status.trim_end());
    }
    println!("Application successfully updated!");
    Ok(())
}

/// Listens for update triggers until Ctrl+C / SIGTERM.
async fn serve(config: Config, coordinator: Arc<UpdateCoordinator>) -> Result<()> {
    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, coordinator));
    let app = create_router(state);

    info!("Starting trigger listener on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
