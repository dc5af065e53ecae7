mod app;
mod config;
mod handlers;
#[cfg(feature = "lambda")]
mod lambda;
mod state;
mod storage;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{app::create_app, config::Config, state::AppState};

/// Carenotes - Patient records and clinical notes
#[derive(Parser, Debug)]
#[command(name = "carenotes")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST", global = true)]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT", global = true)]
    port: u16,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", env = "LOG_FORMAT", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Serve the HTTP gateway adapter (default)
    Serve,
    /// Run under the AWS Lambda runtime
    #[cfg(feature = "lambda")]
    Lambda,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// One JSON object per line
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_format);

    let config = Config::from_env();
    tracing::info!(
        table = %config.table_name,
        region = %config.aws_region,
        endpoint = ?config.aws_endpoint_url,
        timeout_secs = config.request_timeout_seconds,
        "Loaded configuration"
    );

    let state = AppState::new(&config).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&cli, &config, state).await,
        #[cfg(feature = "lambda")]
        Command::Lambda => lambda::run(state).await.map_err(|e| anyhow::anyhow!(e)),
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "carenotes=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn serve(cli: &Cli, config: &Config, state: AppState) -> Result<()> {
    let app = create_app(state, config.request_timeout());

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
