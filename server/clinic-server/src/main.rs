use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use clinic_server::{create_app, ClinicConfig, ClinicServer};
use logger_redacted::{LogFormat, LoggerConfig};

/// Clinic Engine server
#[derive(Parser, Debug)]
#[command(name = "clinic-server")]
#[command(about = "Patients, doctors, appointments and prescriptions over HTTP and gRPC")]
struct Args {
    /// Configuration file path (defaults to ./clinic-server.toml when present)
    #[arg(short, long, env = "CLINIC_CONFIG")]
    config: Option<String>,

    /// Server bind address
    #[arg(long)]
    host: Option<String>,

    /// HTTP port
    #[arg(short, long)]
    port: Option<u16>,

    /// gRPC server port
    #[arg(long)]
    grpc_port: Option<u16>,

    /// Enable gRPC server
    #[arg(long)]
    enable_grpc: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Keep all data in process memory instead of PostgreSQL
    #[arg(long)]
    in_memory: bool,
}

impl Args {
    fn apply(&self, config: &mut ClinicConfig) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(port) = self.grpc_port {
            config.grpc.port = port;
        }
        if self.enable_grpc {
            config.grpc.enabled = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let mut config = ClinicConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    args.apply(&mut config);

    init_tracing(&config.logging, args.verbose);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Clinic Engine server");

    let server = if args.in_memory {
        ClinicServer::in_memory(config.clone())
    } else {
        ClinicServer::new(config.clone()).await?
    };

    let grpc_handle = spawn_grpc(&server)?;

    let app = create_app(server);

    let addr = config.http_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!("Clinic server running on http://{}", addr);
    info!("Health check available at: http://{}/health", addr);
    info!("API v1 available at: http://{}/api/v1", addr);

    let http_result = axum::serve(listener, app).await.context("HTTP server error");

    if let Some(handle) = grpc_handle {
        handle.abort();
    }

    http_result
}

#[cfg(feature = "grpc")]
fn spawn_grpc(server: &ClinicServer) -> Result<Option<tokio::task::JoinHandle<()>>> {
    if !server.config.grpc.enabled {
        return Ok(None);
    }

    let addr: std::net::SocketAddr = server
        .config
        .grpc_addr()
        .parse()
        .context("invalid gRPC bind address")?;
    info!("gRPC server available on grpc://{}", addr);

    let server = server.clone();
    Ok(Some(tokio::spawn(async move {
        if let Err(e) = clinic_server::grpc::serve(server, addr).await {
            tracing::error!(error = %e, "gRPC server stopped");
        }
    })))
}

#[cfg(not(feature = "grpc"))]
fn spawn_grpc(server: &ClinicServer) -> Result<Option<tokio::task::JoinHandle<()>>> {
    if server.config.grpc.enabled {
        tracing::warn!("gRPC was requested but this binary was built without the `grpc` feature");
    }
    Ok(None)
}

fn init_tracing(logging: &LoggerConfig, verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else {
        logging.level.parse().unwrap_or(Level::INFO)
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("clinic_server={level},database_layer={level},tower_http=info,sqlx=warn").into()
    });

    match logging.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_level(true),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_ansi(false)
                        .json(),
                )
                .init();
        }
    }
}
