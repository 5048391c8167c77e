use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::entities::{ingredient, recipe, tag};

// --- Account DTOs ---

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

// JWT claims carried by the bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub user_id: i32,
    pub exp: usize,
}

/// Authenticated account details, passed to handlers as a request extension.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub email: String,
}

// --- Tag / Ingredient DTOs ---

/// Create/rename payload shared by tags and ingredients.
#[derive(Debug, Serialize, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TagDto {
    pub id: i32,
    pub name: String,
}

impl From<tag::Model> for TagDto {
    fn from(model: tag::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IngredientDto {
    pub id: i32,
    pub name: String,
}

impl From<ingredient::Model> for IngredientDto {
    fn from(model: ingredient::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

// --- Recipe DTOs ---

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    #[serde(default)]
    pub tags: Vec<i32>,
    #[serde(default)]
    pub ingredients: Vec<i32>,
}

/// Full-update payload: scalars are required, an omitted relation list means
/// "no relations".
#[derive(Debug, Serialize, Deserialize)]
pub struct PutRecipeRequest {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub tags: Option<Vec<i32>>,
    pub ingredients: Option<Vec<i32>>,
}

/// Partial-update payload: whatever is omitted stays untouched.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PatchRecipeRequest {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub tags: Option<Vec<i32>>,
    pub ingredients: Option<Vec<i32>>,
}

/// List representation: relations as bare id references.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: i32,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub tags: Vec<i32>,
    pub ingredients: Vec<i32>,
    pub image: Option<String>,
}

/// Detail representation: relations expanded to full objects.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub id: i32,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub tags: Vec<TagDto>,
    pub ingredients: Vec<IngredientDto>,
    pub image: Option<String>,
}

pub fn recipe_summary(
    model: recipe::Model,
    tag_ids: Vec<i32>,
    ingredient_ids: Vec<i32>,
) -> RecipeSummary {
    RecipeSummary {
        id: model.id,
        title: model.title,
        time_minutes: model.time_minutes,
        price: model.price,
        tags: tag_ids,
        ingredients: ingredient_ids,
        image: model.image,
    }
}

pub fn recipe_detail(
    model: recipe::Model,
    tags: Vec<tag::Model>,
    ingredients: Vec<ingredient::Model>,
) -> RecipeDetail {
    RecipeDetail {
        id: model.id,
        title: model.title,
        time_minutes: model.time_minutes,
        price: model.price,
        tags: tags.into_iter().map(TagDto::from).collect(),
        ingredients: ingredients.into_iter().map(IngredientDto::from).collect(),
        image: model.image,
    }
}
