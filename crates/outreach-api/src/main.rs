//! Outreach REST API entry point.
//!
//! Binary name: `outreachd`
//!
//! Parses CLI arguments, loads configuration, wires the engines, then
//! starts the REST API server.

mod http;
mod state;

use std::path::PathBuf;

use clap::Parser;

use state::AppState;

/// Templated bulk-message composition and send service.
#[derive(Debug, Parser)]
#[command(name = "outreachd", version, about)]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8085, env = "OUTREACH_PORT")]
    port: u16,

    /// Directory containing `outreach.toml`.
    #[arg(long, default_value = ".", env = "OUTREACH_CONFIG_DIR")]
    config_dir: PathBuf,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long)]
    otel: bool,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info",
        1 => "info,outreach=debug",
        _ => "trace",
    };
    outreach_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let config = outreach_infra::config::load_config(&cli.config_dir).await;
    let state = AppState::from_config(&config)?;
    let shutdown = state.shutdown.clone();

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, model = %config.provider.model, "outreachd listening");

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    outreach_observe::tracing_setup::shutdown_tracing();
    tracing::info!("server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM, then cancel in-flight work.
///
/// Cancelling the state token lets a running batch stop between
/// submissions and record the remaining recipients as failures.
async fn shutdown_signal(shutdown: tokio_util::sync::CancellationToken) {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => {
                tracing::error!("failed to install SIGTERM handler");
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

    shutdown.cancel();
}
