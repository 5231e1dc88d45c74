use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use backend::store::JsonStore;
use backend::{app, logging, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::setup();
    dotenvy::from_path(".env").ok();

    let data_dir = std::env::var("WHEEL_DATA_DIR").unwrap_or_else(|_| ".".to_string());
    let port: u16 = std::env::var("WHEEL_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(shared::constants::DEFAULT_PORT);

    std::fs::create_dir_all(&data_dir)?;
    let state = AppState::new(JsonStore::new(&data_dir));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("🚀 API server running on http://{}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
