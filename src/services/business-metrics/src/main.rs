//! Main binary for the Business Metrics Service
//!
//! Serves the ROI calculation engine over HTTP, optionally running the
//! periodic refresh scheduler, or performs a single refresh and writes the
//! export document when started with `--export`.

use business_metrics_service::{routes::create_router, MetricsConfig, MetricsService};

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let matches = create_cli().get_matches();

    init_tracing(matches.get_flag("json-logs"));

    // Load and validate configuration
    let config = load_config(&matches)?;
    config.validate().map_err(|e| {
        error!("Configuration validation failed: {}", e);
        e
    })?;

    let service = Arc::new(MetricsService::from_config(&config).map_err(|e| {
        error!("Failed to initialize business metrics service: {}", e);
        e
    })?);

    // One-shot export mode
    if let Some(path) = matches.get_one::<String>("export") {
        let snapshot = service.refresh().await?;
        service.engine().export_to_path(path).await?;
        info!(
            "Exported snapshot {} ({} origin) to {}",
            snapshot.id, snapshot.origin, path
        );
        return Ok(());
    }

    info!("Starting Business Metrics Service");
    info!(
        "Configuration: Server {}:{}, remote source {} ({}), refresh every {}ms",
        config.server.host,
        config.server.port,
        config.remote.base_url,
        if config.remote.enabled { "enabled" } else { "disabled" },
        config.scheduler.interval_ms
    );

    if config.scheduler.auto_start {
        service.scheduler().start().await?;
    }

    let app = create_router(
        service.clone(),
        Duration::from_secs(config.server.timeout_seconds),
    );

    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .with_context(|| format!("Invalid host address: {}", config.server.host))?,
        config.server.port,
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", addr))?;

    info!("Business metrics service started successfully on {}", addr);
    info!("Health check: http://{}/health", addr);
    info!("Metrics: http://{}/metrics", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown signal received, stopping refresh scheduler");
    if let Err(e) = service.shutdown().await {
        warn!("Failed to stop scheduler gracefully: {}", e);
    }

    info!("Business Metrics Service stopped gracefully");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "business_metrics_service=info,business_metrics_server=info,tower_http=info,axum=info"
            .into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

/// Create CLI argument parser
fn create_cli() -> Command {
    Command::new("business-metrics-server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Business impact and ROI calculation engine")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Server host address"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .arg(
            Arg::new("export")
                .long("export")
                .value_name("FILE")
                .help("Run one refresh cycle, write the export document to FILE and exit"),
        )
}

/// Load configuration from file and environment
fn load_config(matches: &clap::ArgMatches) -> anyhow::Result<MetricsConfig> {
    let mut config = if let Some(config_file) = matches.get_one::<String>("config") {
        info!("Loading configuration from file: {}", config_file);
        MetricsConfig::from_file(config_file)
            .with_context(|| format!("Failed to load configuration from {}", config_file))?
    } else {
        MetricsConfig::from_env().unwrap_or_else(|e| {
            warn!(
                "Failed to load configuration from environment: {}, using defaults",
                e
            );
            MetricsConfig::default()
        })
    };

    // Override with CLI arguments
    if let Some(host) = matches.get_one::<String>("host") {
        config.server.host = host.clone();
    }

    if let Some(port_str) = matches.get_one::<String>("port") {
        config.server.port = port_str
            .parse()
            .with_context(|| format!("Invalid port number '{}'", port_str))?;
    }

    Ok(config)
}

/// Wait for shutdown signals
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
