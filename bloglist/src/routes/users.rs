use std::collections::HashMap;

use axum::{Json, extract::State, http::StatusCode};
use tracing::info;

use crate::{
    AppState,
    auth::hash_password,
    error::ApiError,
    model::{BlogRef, Id, NewUser, User, UserView},
};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<UserView>>, ApiError> {
    let blogs = state.store.blogs().await?;
    let by_id: HashMap<Id, BlogRef> = blogs
        .iter()
        .map(|b| (b.id, BlogRef::from(b)))
        .collect();

    let users = state
        .store
        .users()
        .await?
        .into_iter()
        .map(|u| UserView {
            blogs: u
                .blogs
                .iter()
                .filter_map(|id| by_id.get(id).cloned())
                .collect(),
            id: u.id,
            username: u.username,
            name: u.name,
        })
        .collect();

    Ok(Json(users))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    let (username, name, password) = payload.validate()?;
    let password_hash = hash_password(password, state.config.bcrypt_cost).await?;

    let user = state
        .store
        .insert_user(User {
            id: Id::generate(),
            username,
            name,
            password_hash,
            blogs: Vec::new(),
        })
        .await?;
    info!(username = %user.username, "user created");

    let view = UserView {
        id: user.id,
        username: user.username,
        name: user.name,
        blogs: Vec::new(),
    };
    Ok((StatusCode::CREATED, Json(view)))
}
