use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::store::JsonStore;

pub mod error;
pub mod handlers;
pub mod logging;
pub mod store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonStore>,
}

impl AppState {
    pub fn new(store: JsonStore) -> Self {
        Self { store: Arc::new(store) }
    }
}

/// Builds the gateway router. Both surfaces are served from browser
/// contexts on the operator's machine, so CORS is wide open.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            shared::constants::SYNC_ENDPOINT,
            get(handlers::get_sync).post(handlers::post_sync),
        )
        .route(
            shared::constants::SPIN_ENDPOINT,
            get(handlers::poll_spin).post(handlers::trigger_spin),
        )
        .route(shared::constants::HEALTH_ENDPOINT, get(handlers::health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
