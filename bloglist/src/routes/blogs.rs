use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    model::{BlogUpdate, BlogView, Id, NewBlog, User},
};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<BlogView>>, ApiError> {
    let users: HashMap<Id, User> = state
        .store
        .users()
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let blogs = state
        .store
        .blogs()
        .await?
        .into_iter()
        .map(|b| {
            let owner = users.get(&b.user);
            BlogView::new(b, owner)
        })
        .collect();

    Ok(Json(blogs))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogView>, ApiError> {
    let id: Id = id.parse()?;
    let blog = state
        .store
        .blog(id)
        .await?
        .ok_or(ApiError::NotFound("blog"))?;
    let owner = state.store.user(blog.user).await?;

    Ok(Json(BlogView::new(blog, owner.as_ref())))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<NewBlog>,
) -> Result<(StatusCode, Json<BlogView>), ApiError> {
    let blog = payload.into_blog(user.id)?;
    let blog = state.store.insert_blog(blog).await?;
    info!(id = %blog.id, username = %user.username, "blog created");

    Ok((StatusCode::CREATED, Json(BlogView::new(blog, Some(&user)))))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<BlogUpdate>,
) -> Result<Json<BlogView>, ApiError> {
    let id: Id = id.parse()?;
    let blog = state
        .store
        .update_blog(id, update)
        .await?
        .ok_or(ApiError::NotFound("blog"))?;
    let owner = state.store.user(blog.user).await?;

    Ok(Json(BlogView::new(blog, owner.as_ref())))
}

pub async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: Id = id.parse()?;
    let blog = state
        .store
        .blog(id)
        .await?
        .ok_or(ApiError::NotFound("blog"))?;

    if state.config.strict_ownership && blog.user != user.id {
        return Err(ApiError::Forbidden);
    }

    state.store.delete_blog(id).await?;
    info!(%id, username = %user.username, "blog deleted");

    Ok(StatusCode::NO_CONTENT)
}
