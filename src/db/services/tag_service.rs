use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::db::entities::tag;
use crate::db::services::owned;
use crate::web::error::AppError;

pub async fn list_tags(db: &DatabaseConnection, user_id: i32) -> Result<Vec<tag::Model>, AppError> {
    Ok(owned::list_for_owner::<tag::Entity, _>(db, user_id).await?)
}

pub async fn create_tag(
    db: &DatabaseConnection,
    user_id: i32,
    name: &str,
) -> Result<tag::Model, AppError> {
    if name.is_empty() {
        return Err(AppError::InvalidInput("Tag name must not be empty.".to_string()));
    }

    let model = tag::ActiveModel {
        user_id: Set(user_id),
        name: Set(name.to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(model)
}

pub async fn rename_tag(
    db: &DatabaseConnection,
    tag_id: i32,
    user_id: i32,
    name: &str,
) -> Result<tag::Model, AppError> {
    if name.is_empty() {
        return Err(AppError::InvalidInput("Tag name must not be empty.".to_string()));
    }

    let Some(model) = owned::find_owned::<tag::Entity, _>(db, tag_id, user_id).await? else {
        return Err(AppError::NotFound("Tag not found.".to_string()));
    };

    let mut active: tag::ActiveModel = model.into();
    active.name = Set(name.to_owned());
    Ok(active.update(db).await?)
}

/// Link rows referencing the tag cascade in the schema.
pub async fn delete_tag(db: &DatabaseConnection, tag_id: i32, user_id: i32) -> Result<u64, AppError> {
    Ok(owned::delete_owned::<tag::Entity, _>(db, tag_id, user_id).await?)
}
