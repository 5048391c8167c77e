use axum::{
    Json, Router,
    extract::{Extension, State},
    routing::get,
};
use std::sync::Arc;

use crate::db::services::user_service;
use crate::services::auth_service;
use crate::web::models::{AuthenticatedUser, ProfileResponse, UpdateProfileRequest};
use crate::web::{AppError, AppState};

// --- Router ---

pub fn create_me_router() -> Router<Arc<AppState>> {
    // Anything other than GET/PATCH on the profile answers 405.
    Router::new().route("/", get(get_profile_handler).patch(update_profile_handler))
}

// --- Route Handlers ---

async fn get_profile_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = user_service::find_by_id(&app_state.db, authenticated_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    Ok(Json(ProfileResponse {
        name: user.name,
        email: user.email,
    }))
}

async fn update_profile_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = auth_service::update_profile(
        &app_state.db,
        authenticated_user.id,
        payload.name,
        payload.password,
    )
    .await?;

    Ok(Json(ProfileResponse {
        name: user.name,
        email: user.email,
    }))
}
