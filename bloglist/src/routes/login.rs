use axum::{Json, extract::State};
use tracing::info;

use crate::{
    AppState,
    auth::verify_password,
    error::ApiError,
    model::{Credentials, LoginResponse},
};

pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state.store.user_by_username(&credentials.username).await?;

    let valid = match &user {
        Some(user) => verify_password(credentials.password, user.password_hash.clone()).await,
        None => false,
    };

    let Some(user) = user.filter(|_| valid) else {
        return Err(ApiError::Unauthorized("invalid username or password"));
    };

    let token = state.tokens.issue(&user)?;
    info!(username = %user.username, "login");

    Ok(Json(LoginResponse {
        token,
        username: user.username,
        name: user.name,
    }))
}
