use clap::Parser;
use tracing_subscriber::EnvFilter;

use rover_zenoh_bridge::config::BridgeConfig;

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let config = BridgeConfig::parse();

    if let Err(e) = rover_zenoh_bridge::runtime::run(config).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
