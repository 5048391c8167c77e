use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};

use crate::db::entities::user;

/// Case-insensitive email lookup. The stored address has a lower-cased
/// domain part, but callers may present any casing.
pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(user::Column::Email))).eq(email.to_lowercase()))
        .one(db)
        .await
}

pub async fn find_by_id(db: &DatabaseConnection, user_id: i32) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find_by_id(user_id).one(db).await
}

pub async fn create_user(
    db: &DatabaseConnection,
    email: &str,
    name: &str,
    password_hash: &str,
    is_staff: bool,
    is_superuser: bool,
) -> Result<user::Model, DbErr> {
    let now = Utc::now();
    user::ActiveModel {
        email: Set(email.to_owned()),
        name: Set(name.to_owned()),
        password_hash: Set(password_hash.to_owned()),
        is_active: Set(true),
        is_staff: Set(is_staff),
        is_superuser: Set(is_superuser),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Applies only the provided fields. Returns `None` if the user row is gone.
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: i32,
    name: Option<String>,
    password_hash: Option<String>,
) -> Result<Option<user::Model>, DbErr> {
    let Some(model) = find_by_id(db, user_id).await? else {
        return Ok(None);
    };

    let mut active: user::ActiveModel = model.into();
    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(hash) = password_hash {
        active.password_hash = Set(hash);
    }
    active.updated_at = Set(Utc::now());

    Ok(Some(active.update(db).await?))
}
