use axum::debug_handler;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use shared::wheel::{
    now_secs, SpinPollResponse, SpinTriggerRequest, SpinTriggerResponse, SyncPushResponse,
    SyncUpdate, SyncedState,
};

use crate::error::Error;
use crate::AppState;

/// GET /api/sync — the full synced document.
#[debug_handler]
pub async fn get_sync(State(state): State<AppState>) -> Result<Json<SyncedState>, Error> {
    let data = state.store.load_state().await?;
    Ok(Json(data))
}

/// POST /api/sync — merge a partial update, stamp `lastUpdated`.
#[debug_handler]
pub async fn post_sync(
    State(state): State<AppState>,
    Json(update): Json<SyncUpdate>,
) -> Result<Json<SyncPushResponse>, Error> {
    let data = state.store.apply_update(update).await?;
    info!("State updated, lastUpdated={}", data.last_updated);
    Ok(Json(SyncPushResponse { success: true, data }))
}

/// POST /api/spin — overwrite the signal slot with a fresh command.
#[debug_handler]
pub async fn trigger_spin(
    State(state): State<AppState>,
    Json(request): Json<SpinTriggerRequest>,
) -> Result<Json<SpinTriggerResponse>, Error> {
    let data = state.store.write_signal(request.winner_index).await?;
    info!("🎡 Spin command issued at t={:.3}", data.timestamp);
    Ok(Json(SpinTriggerResponse { success: true, data }))
}

/// GET /api/spin — report whether a spin command is active. Degrades to
/// `hasCommand: false` on any storage or parse problem; never errors.
#[debug_handler]
pub async fn poll_spin(State(state): State<AppState>) -> Json<SpinPollResponse> {
    match state.store.read_signal().await {
        Some(signal) if signal.is_fresh_at(now_secs()) => Json(SpinPollResponse {
            has_command: true,
            data: Some(signal),
        }),
        _ => Json(SpinPollResponse {
            has_command: false,
            data: None,
        }),
    }
}

pub async fn health_check() -> impl IntoResponse {
    "OK"
}
