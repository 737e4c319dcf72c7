use axum::{extract::State, http::StatusCode};
use tracing::warn;

use crate::{AppState, error::ApiError};

pub async fn reset(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.store.reset().await?;
    warn!("store reset through testing endpoint");
    Ok(StatusCode::NO_CONTENT)
}
