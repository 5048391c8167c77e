use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, patch},
};
use std::sync::Arc;

use crate::db::services;
use crate::web::models::{AuthenticatedUser, IngredientDto, NameRequest};
use crate::web::{AppError, AppState};

// --- Router ---

pub fn create_ingredients_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_ingredients_handler).post(create_ingredient_handler))
        .route(
            "/{ingredient_id}",
            patch(rename_ingredient_handler).delete(delete_ingredient_handler),
        )
}

// --- Route Handlers ---

async fn list_ingredients_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<IngredientDto>>, AppError> {
    let ingredients = services::list_ingredients(&app_state.db, authenticated_user.id).await?;
    Ok(Json(ingredients.into_iter().map(IngredientDto::from).collect()))
}

async fn create_ingredient_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<NameRequest>,
) -> Result<(StatusCode, Json<IngredientDto>), AppError> {
    let ingredient =
        services::create_ingredient(&app_state.db, authenticated_user.id, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(ingredient.into())))
}

async fn rename_ingredient_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(ingredient_id): Path<i32>,
    Json(payload): Json<NameRequest>,
) -> Result<Json<IngredientDto>, AppError> {
    let ingredient = services::rename_ingredient(
        &app_state.db,
        ingredient_id,
        authenticated_user.id,
        &payload.name,
    )
    .await?;
    Ok(Json(ingredient.into()))
}

async fn delete_ingredient_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(ingredient_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let rows_affected =
        services::delete_ingredient(&app_state.db, ingredient_id, authenticated_user.id).await?;

    if rows_affected > 0 {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Ingredient not found.".to_string()))
    }
}
