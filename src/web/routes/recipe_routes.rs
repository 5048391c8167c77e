use axum::{
    Json, Router,
    extract::{Extension, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;

use crate::db::services::recipe_service::{self, NewRecipe, RecipeChanges, UpdateMode};
use crate::web::models::{
    self, AuthenticatedUser, CreateRecipeRequest, PatchRecipeRequest, PutRecipeRequest,
    RecipeDetail, RecipeSummary,
};
use crate::web::{AppError, AppState};

// --- Router ---

pub fn create_recipes_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_recipes_handler).post(create_recipe_handler))
        .route(
            "/{recipe_id}",
            get(get_recipe_handler)
                .put(put_recipe_handler)
                .patch(patch_recipe_handler)
                .delete(delete_recipe_handler),
        )
        .route("/{recipe_id}/image", post(upload_image_handler))
}

async fn load_detail(
    app_state: &AppState,
    recipe_id: i32,
    user_id: i32,
) -> Result<RecipeDetail, AppError> {
    let (model, tags, ingredients) =
        recipe_service::get_recipe_detail(&app_state.db, recipe_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Recipe not found.".to_string()))?;
    Ok(models::recipe_detail(model, tags, ingredients))
}

// --- Route Handlers ---

async fn list_recipes_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<RecipeSummary>>, AppError> {
    let recipes = recipe_service::list_recipes(&app_state.db, authenticated_user.id).await?;
    Ok(Json(
        recipes
            .into_iter()
            .map(|(model, tag_ids, ingredient_ids)| {
                models::recipe_summary(model, tag_ids, ingredient_ids)
            })
            .collect(),
    ))
}

async fn create_recipe_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeDetail>), AppError> {
    let model = recipe_service::create_recipe(
        &app_state.db,
        authenticated_user.id,
        NewRecipe {
            title: payload.title,
            time_minutes: payload.time_minutes,
            price: payload.price,
            tag_ids: payload.tags,
            ingredient_ids: payload.ingredients,
        },
    )
    .await?;

    let detail = load_detail(&app_state, model.id, authenticated_user.id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn get_recipe_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i32>,
) -> Result<Json<RecipeDetail>, AppError> {
    let detail = load_detail(&app_state, recipe_id, authenticated_user.id).await?;
    Ok(Json(detail))
}

async fn put_recipe_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i32>,
    Json(payload): Json<PutRecipeRequest>,
) -> Result<Json<RecipeDetail>, AppError> {
    recipe_service::update_recipe(
        &app_state.db,
        recipe_id,
        authenticated_user.id,
        RecipeChanges {
            title: Some(payload.title),
            time_minutes: Some(payload.time_minutes),
            price: Some(payload.price),
            tag_ids: payload.tags,
            ingredient_ids: payload.ingredients,
        },
        UpdateMode::Full,
    )
    .await?;

    let detail = load_detail(&app_state, recipe_id, authenticated_user.id).await?;
    Ok(Json(detail))
}

async fn patch_recipe_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i32>,
    Json(payload): Json<PatchRecipeRequest>,
) -> Result<Json<RecipeDetail>, AppError> {
    recipe_service::update_recipe(
        &app_state.db,
        recipe_id,
        authenticated_user.id,
        RecipeChanges {
            title: payload.title,
            time_minutes: payload.time_minutes,
            price: payload.price,
            tag_ids: payload.tags,
            ingredient_ids: payload.ingredients,
        },
        UpdateMode::Partial,
    )
    .await?;

    let detail = load_detail(&app_state, recipe_id, authenticated_user.id).await?;
    Ok(Json(detail))
}

async fn delete_recipe_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let deleted = recipe_service::delete_recipe(
        &app_state.db,
        &app_state.media,
        recipe_id,
        authenticated_user.id,
    )
    .await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Recipe not found.".to_string()))
    }
}

async fn upload_image_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut image_bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart request: {e}")))?
    {
        if field.name() == Some("image") {
            image_bytes = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {e}")))?,
            );
        }
    }

    let bytes = image_bytes
        .ok_or_else(|| AppError::InvalidInput("Multipart field 'image' is required.".to_string()))?;

    let updated = recipe_service::attach_image(
        &app_state.db,
        &app_state.media,
        recipe_id,
        authenticated_user.id,
        &bytes,
    )
    .await?;

    Ok(Json(serde_json::json!({ "image": updated.image })))
}
