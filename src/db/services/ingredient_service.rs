use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::db::entities::ingredient;
use crate::db::services::owned;
use crate::web::error::AppError;

pub async fn list_ingredients(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<ingredient::Model>, AppError> {
    Ok(owned::list_for_owner::<ingredient::Entity, _>(db, user_id).await?)
}

pub async fn create_ingredient(
    db: &DatabaseConnection,
    user_id: i32,
    name: &str,
) -> Result<ingredient::Model, AppError> {
    if name.is_empty() {
        return Err(AppError::InvalidInput(
            "Ingredient name must not be empty.".to_string(),
        ));
    }

    let model = ingredient::ActiveModel {
        user_id: Set(user_id),
        name: Set(name.to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

pub async fn rename_ingredient(
    db: &DatabaseConnection,
    ingredient_id: i32,
    user_id: i32,
    name: &str,
) -> Result<ingredient::Model, AppError> {
    if name.is_empty() {
        return Err(AppError::InvalidInput(
            "Ingredient name must not be empty.".to_string(),
        ));
    }

    let Some(model) =
        owned::find_owned::<ingredient::Entity, _>(db, ingredient_id, user_id).await?
    else {
        return Err(AppError::NotFound("Ingredient not found.".to_string()));
    };

    let mut active: ingredient::ActiveModel = model.into();
    active.name = Set(name.to_owned());
    Ok(active.update(db).await?)
}

pub async fn delete_ingredient(
    db: &DatabaseConnection,
    ingredient_id: i32,
    user_id: i32,
) -> Result<u64, AppError> {
    Ok(owned::delete_owned::<ingredient::Entity, _>(db, ingredient_id, user_id).await?)
}
