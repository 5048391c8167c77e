use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode},
    middleware as axum_middleware,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ServerConfig;
use crate::services::auth_service;
use crate::storage::MediaStore;
use crate::web::middleware::auth;
use crate::web::models::{RegisterRequest, TokenRequest, TokenResponse, UserResponse};
use crate::web::routes::{ingredient_routes, recipe_routes, tag_routes, user_routes};

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub media: MediaStore,
    pub config: Arc<ServerConfig>,
}

// --- Public Handlers ---

async fn register_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = auth_service::register_user(&app_state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn token_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = auth_service::login_user(&app_state.db, payload, &app_state.config.jwt_secret).await?;
    Ok(Json(token))
}

async fn health_check_handler() -> &'static str {
    "OK"
}

// --- Router ---

pub fn create_axum_router(
    db: DatabaseConnection,
    media: MediaStore,
    config: Arc<ServerConfig>,
) -> Router {
    let app_state = Arc::new(AppState { db, media, config });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check_handler))
        .route("/api/users", post(register_handler))
        .route("/api/users/token", post(token_handler))
        .nest(
            "/api/users/me",
            user_routes::create_me_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth)),
        )
        .nest(
            "/api/tags",
            tag_routes::create_tags_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth)),
        )
        .nest(
            "/api/ingredients",
            ingredient_routes::create_ingredients_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth)),
        )
        .nest(
            "/api/recipes",
            recipe_routes::create_recipes_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth)),
        )
        .with_state(app_state.clone())
        .layer(cors)
}
