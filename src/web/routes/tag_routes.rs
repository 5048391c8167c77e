use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use std::sync::Arc;

use crate::db::services;
use crate::web::models::{AuthenticatedUser, NameRequest, TagDto};
use crate::web::{AppError, AppState};

// --- Router ---

pub fn create_tags_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tags_handler).post(create_tag_handler))
        .route("/{tag_id}", patch(rename_tag_handler).delete(delete_tag_handler))
}

// --- Route Handlers ---

async fn list_tags_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<TagDto>>, AppError> {
    let tags = services::list_tags(&app_state.db, authenticated_user.id).await?;
    Ok(Json(tags.into_iter().map(TagDto::from).collect()))
}

async fn create_tag_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<NameRequest>,
) -> Result<(StatusCode, Json<TagDto>), AppError> {
    let tag = services::create_tag(&app_state.db, authenticated_user.id, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(tag.into())))
}

async fn rename_tag_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(tag_id): Path<i32>,
    Json(payload): Json<NameRequest>,
) -> Result<Json<TagDto>, AppError> {
    let tag =
        services::rename_tag(&app_state.db, tag_id, authenticated_user.id, &payload.name).await?;
    Ok(Json(tag.into()))
}

async fn delete_tag_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(tag_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let rows_affected =
        services::delete_tag(&app_state.db, tag_id, authenticated_user.id).await?;

    if rows_affected > 0 {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Tag not found.".to_string()))
    }
}
