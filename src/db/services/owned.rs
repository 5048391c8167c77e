use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, Order, QueryFilter, QueryOrder};

use crate::db::entities::{ingredient, recipe, tag};

/// An entity whose rows belong to exactly one user account. Every read and
/// delete below filters on the owner column, so rows owned by another
/// account are indistinguishable from absent rows.
pub trait OwnedEntity: EntityTrait {
    fn id_column() -> Self::Column;
    fn owner_column() -> Self::Column;
    /// Ordering applied by `list_for_owner`.
    fn list_order() -> (Self::Column, Order);
}

impl OwnedEntity for tag::Entity {
    fn id_column() -> Self::Column {
        tag::Column::Id
    }
    fn owner_column() -> Self::Column {
        tag::Column::UserId
    }
    fn list_order() -> (Self::Column, Order) {
        (tag::Column::Name, Order::Desc)
    }
}

impl OwnedEntity for ingredient::Entity {
    fn id_column() -> Self::Column {
        ingredient::Column::Id
    }
    fn owner_column() -> Self::Column {
        ingredient::Column::UserId
    }
    fn list_order() -> (Self::Column, Order) {
        (ingredient::Column::Name, Order::Desc)
    }
}

impl OwnedEntity for recipe::Entity {
    fn id_column() -> Self::Column {
        recipe::Column::Id
    }
    fn owner_column() -> Self::Column {
        recipe::Column::UserId
    }
    /// Most recently created first.
    fn list_order() -> (Self::Column, Order) {
        (recipe::Column::Id, Order::Desc)
    }
}

pub async fn list_for_owner<E, C>(db: &C, owner_id: i32) -> Result<Vec<E::Model>, DbErr>
where
    E: OwnedEntity,
    C: ConnectionTrait,
{
    let (column, order) = E::list_order();
    E::find()
        .filter(E::owner_column().eq(owner_id))
        .order_by(column, order)
        .all(db)
        .await
}

pub async fn find_owned<E, C>(db: &C, id: i32, owner_id: i32) -> Result<Option<E::Model>, DbErr>
where
    E: OwnedEntity,
    C: ConnectionTrait,
{
    E::find()
        .filter(E::id_column().eq(id))
        .filter(E::owner_column().eq(owner_id))
        .one(db)
        .await
}

pub async fn delete_owned<E, C>(db: &C, id: i32, owner_id: i32) -> Result<u64, DbErr>
where
    E: OwnedEntity,
    C: ConnectionTrait,
{
    E::delete_many()
        .filter(E::id_column().eq(id))
        .filter(E::owner_column().eq(owner_id))
        .exec(db)
        .await
        .map(|res| res.rows_affected)
}
