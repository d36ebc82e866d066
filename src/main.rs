/**
 * Relay Server Entry Point
 *
 * Loads environment configuration, initializes tracing, and serves the
 * relay until the process is stopped. All relay state is in-memory and
 * rebuilt from zero on restart.
 */

use chat_relay::server::{create_app, RelayConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = RelayConfig::from_env();
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let client_url = config.client_url.clone();

    let app = create_app(config);

    tracing::info!("Relay server listening on {}", addr);
    tracing::info!("CORS origin allowed: {}", client_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
