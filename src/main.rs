use std::sync::Arc;

use wander_ai::backend::HttpBackend;
use wander_ai::cli::CliFrontend;
use wander_ai::config::{API_URL_ENV, ApiConfig};
use wander_ai::trip::TripPlanner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Resolve the API location before anything can touch the network
    let config = ApiConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export {API_URL_ENV}=https://your-api.example.com/prod");
        std::process::exit(1);
    });

    eprintln!("🧭 WanderAI v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: {}", config.base_url);
    eprintln!("   Where do you want to go? (e.g., Weekend trip to Kyoto). /quit to exit.\n");

    let backend = Arc::new(HttpBackend::new(config)?);
    let planner = Arc::new(TripPlanner::new(backend));

    let mut cli = CliFrontend::new(planner);
    cli.run().await?;

    Ok(())
}
