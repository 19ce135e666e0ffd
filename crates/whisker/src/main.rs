//! Whisker service binary.
//!
//! Loads `.env`, parses configuration, wires the predictor, feedback store
//! and monitoring sinks, then serves HTTP until interrupted.

use clap::Parser;
use tokio::net::TcpListener;
use whisker::observability::{ObservabilityConfig, init_observability};
use whisker::{Args, announce_startup, build_state};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Missing .env is fine
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_observability(ObservabilityConfig::default().with_json_logs(args.json_logs))?;

    let state = build_state(&args).await?;
    announce_startup(&state).await;

    let listener = TcpListener::bind(args.bind_address()).await?;
    whisker_server::serve(listener, state).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
