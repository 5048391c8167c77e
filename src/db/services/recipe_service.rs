use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::db::entities::{ingredient, recipe, recipe_ingredient, recipe_tag, tag};
use crate::db::services::owned::{self, OwnedEntity};
use crate::storage::MediaStore;
use crate::web::error::AppError;

/// Whether an update replaces the whole resource or only the provided fields.
/// A full update treats an omitted relation list as the empty list; a partial
/// update leaves omitted relation lists untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateMode {
    Partial,
    Full,
}

pub struct NewRecipe {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub tag_ids: Vec<i32>,
    pub ingredient_ids: Vec<i32>,
}

#[derive(Default)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub time_minutes: Option<i32>,
    pub price: Option<Decimal>,
    pub tag_ids: Option<Vec<i32>>,
    pub ingredient_ids: Option<Vec<i32>>,
}

fn validate_scalars(
    title: Option<&str>,
    time_minutes: Option<i32>,
    price: Option<Decimal>,
) -> Result<(), AppError> {
    if let Some(title) = title {
        if title.is_empty() {
            return Err(AppError::InvalidInput("Recipe title must not be empty.".to_string()));
        }
    }
    if let Some(minutes) = time_minutes {
        if minutes < 0 {
            return Err(AppError::InvalidInput(
                "Recipe time_minutes must not be negative.".to_string(),
            ));
        }
    }
    if let Some(price) = price {
        if price < Decimal::ZERO {
            return Err(AppError::InvalidInput("Recipe price must not be negative.".to_string()));
        }
    }
    Ok(())
}

/// Resolves a client-supplied id list to rows owned by the requesting user.
/// Ids that do not exist or belong to another account are rejected, so a
/// recipe can never reference someone else's tags or ingredients.
async fn resolve_owned_ids<E, C>(
    db: &C,
    user_id: i32,
    ids: &[i32],
    what: &str,
) -> Result<Vec<i32>, AppError>
where
    E: OwnedEntity,
    C: ConnectionTrait,
{
    let unique: Vec<i32> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
    if unique.is_empty() {
        return Ok(unique);
    }

    let found = E::find()
        .filter(E::id_column().is_in(unique.clone()))
        .filter(E::owner_column().eq(user_id))
        .all(db)
        .await?;

    if found.len() != unique.len() {
        return Err(AppError::InvalidInput(format!(
            "Request references {what} ids that do not exist."
        )));
    }
    Ok(unique)
}

async fn replace_tag_links<C: ConnectionTrait>(
    db: &C,
    recipe_id: i32,
    tag_ids: &[i32],
) -> Result<(), AppError> {
    recipe_tag::Entity::delete_many()
        .filter(recipe_tag::Column::RecipeId.eq(recipe_id))
        .exec(db)
        .await?;
    if !tag_ids.is_empty() {
        recipe_tag::Entity::insert_many(tag_ids.iter().map(|&tag_id| recipe_tag::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(tag_id),
        }))
        .exec(db)
        .await?;
    }
    Ok(())
}

async fn replace_ingredient_links<C: ConnectionTrait>(
    db: &C,
    recipe_id: i32,
    ingredient_ids: &[i32],
) -> Result<(), AppError> {
    recipe_ingredient::Entity::delete_many()
        .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
        .exec(db)
        .await?;
    if !ingredient_ids.is_empty() {
        recipe_ingredient::Entity::insert_many(ingredient_ids.iter().map(|&ingredient_id| {
            recipe_ingredient::ActiveModel {
                recipe_id: Set(recipe_id),
                ingredient_id: Set(ingredient_id),
            }
        }))
        .exec(db)
        .await?;
    }
    Ok(())
}

/// Summaries for the owner's recipes, newest first, with bare relation ids.
pub async fn list_recipes(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<(recipe::Model, Vec<i32>, Vec<i32>)>, AppError> {
    let recipes = owned::list_for_owner::<recipe::Entity, _>(db, user_id).await?;
    if recipes.is_empty() {
        return Ok(Vec::new());
    }

    let recipe_ids: Vec<i32> = recipes.iter().map(|r| r.id).collect();

    let mut tags_by_recipe: HashMap<i32, Vec<i32>> = HashMap::new();
    for link in recipe_tag::Entity::find()
        .filter(recipe_tag::Column::RecipeId.is_in(recipe_ids.clone()))
        .order_by_asc(recipe_tag::Column::TagId)
        .all(db)
        .await?
    {
        tags_by_recipe.entry(link.recipe_id).or_default().push(link.tag_id);
    }

    let mut ingredients_by_recipe: HashMap<i32, Vec<i32>> = HashMap::new();
    for link in recipe_ingredient::Entity::find()
        .filter(recipe_ingredient::Column::RecipeId.is_in(recipe_ids))
        .order_by_asc(recipe_ingredient::Column::IngredientId)
        .all(db)
        .await?
    {
        ingredients_by_recipe
            .entry(link.recipe_id)
            .or_default()
            .push(link.ingredient_id);
    }

    Ok(recipes
        .into_iter()
        .map(|model| {
            let tag_ids = tags_by_recipe.remove(&model.id).unwrap_or_default();
            let ingredient_ids = ingredients_by_recipe.remove(&model.id).unwrap_or_default();
            (model, tag_ids, ingredient_ids)
        })
        .collect())
}

/// A single recipe with its relations expanded, or `None` when the id is not
/// owned by the caller.
pub async fn get_recipe_detail(
    db: &DatabaseConnection,
    recipe_id: i32,
    user_id: i32,
) -> Result<Option<(recipe::Model, Vec<tag::Model>, Vec<ingredient::Model>)>, AppError> {
    let Some(model) = owned::find_owned::<recipe::Entity, _>(db, recipe_id, user_id).await? else {
        return Ok(None);
    };

    let tags = model
        .find_related(tag::Entity)
        .order_by_asc(tag::Column::Id)
        .all(db)
        .await?;
    let ingredients = model
        .find_related(ingredient::Entity)
        .order_by_asc(ingredient::Column::Id)
        .all(db)
        .await?;

    Ok(Some((model, tags, ingredients)))
}

/// Inserts the recipe row and its relation links in one transaction.
pub async fn create_recipe(
    db: &DatabaseConnection,
    user_id: i32,
    data: NewRecipe,
) -> Result<recipe::Model, AppError> {
    validate_scalars(Some(&data.title), Some(data.time_minutes), Some(data.price))?;

    let txn = db.begin().await?;

    let tag_ids = resolve_owned_ids::<tag::Entity, _>(&txn, user_id, &data.tag_ids, "tag").await?;
    let ingredient_ids =
        resolve_owned_ids::<ingredient::Entity, _>(&txn, user_id, &data.ingredient_ids, "ingredient")
            .await?;

    let now = Utc::now();
    let model = recipe::ActiveModel {
        user_id: Set(user_id),
        title: Set(data.title),
        time_minutes: Set(data.time_minutes),
        price: Set(data.price),
        image: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    replace_tag_links(&txn, model.id, &tag_ids).await?;
    replace_ingredient_links(&txn, model.id, &ingredient_ids).await?;

    txn.commit().await?;
    Ok(model)
}

/// Applies scalar changes and relation rewrites in one transaction. See
/// [`UpdateMode`] for how omitted relation lists are treated.
pub async fn update_recipe(
    db: &DatabaseConnection,
    recipe_id: i32,
    user_id: i32,
    changes: RecipeChanges,
    mode: UpdateMode,
) -> Result<recipe::Model, AppError> {
    validate_scalars(changes.title.as_deref(), changes.time_minutes, changes.price)?;

    let tag_ids = match (mode, changes.tag_ids) {
        (_, Some(ids)) => Some(ids),
        (UpdateMode::Full, None) => Some(Vec::new()),
        (UpdateMode::Partial, None) => None,
    };
    let ingredient_ids = match (mode, changes.ingredient_ids) {
        (_, Some(ids)) => Some(ids),
        (UpdateMode::Full, None) => Some(Vec::new()),
        (UpdateMode::Partial, None) => None,
    };

    let txn = db.begin().await?;

    let Some(existing) = owned::find_owned::<recipe::Entity, _>(&txn, recipe_id, user_id).await?
    else {
        return Err(AppError::NotFound("Recipe not found.".to_string()));
    };

    let mut active: recipe::ActiveModel = existing.into();
    if let Some(title) = changes.title {
        active.title = Set(title);
    }
    if let Some(minutes) = changes.time_minutes {
        active.time_minutes = Set(minutes);
    }
    if let Some(price) = changes.price {
        active.price = Set(price);
    }
    active.updated_at = Set(Utc::now());
    let model = active.update(&txn).await?;

    if let Some(ids) = tag_ids {
        let ids = resolve_owned_ids::<tag::Entity, _>(&txn, user_id, &ids, "tag").await?;
        replace_tag_links(&txn, recipe_id, &ids).await?;
    }
    if let Some(ids) = ingredient_ids {
        let ids =
            resolve_owned_ids::<ingredient::Entity, _>(&txn, user_id, &ids, "ingredient").await?;
        replace_ingredient_links(&txn, recipe_id, &ids).await?;
    }

    txn.commit().await?;
    Ok(model)
}

/// Deletes the recipe and its link rows, then removes the stored image file.
/// Returns `false` when the id is not owned by the caller.
pub async fn delete_recipe(
    db: &DatabaseConnection,
    media: &MediaStore,
    recipe_id: i32,
    user_id: i32,
) -> Result<bool, AppError> {
    let txn = db.begin().await?;

    let Some(model) = owned::find_owned::<recipe::Entity, _>(&txn, recipe_id, user_id).await? else {
        return Ok(false);
    };
    let image = model.image.clone();

    recipe_tag::Entity::delete_many()
        .filter(recipe_tag::Column::RecipeId.eq(recipe_id))
        .exec(&txn)
        .await?;
    recipe_ingredient::Entity::delete_many()
        .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
        .exec(&txn)
        .await?;
    model.delete(&txn).await?;

    txn.commit().await?;

    if let Some(path) = image {
        media.remove(&path).await;
    }
    Ok(true)
}

/// Stores the uploaded payload under a fresh random name, commits the path to
/// the recipe row, then drops the previously stored file. The file is written
/// before the database reference so a crash can orphan a file but never leave
/// the row pointing at nothing.
pub async fn attach_image(
    db: &DatabaseConnection,
    media: &MediaStore,
    recipe_id: i32,
    user_id: i32,
    data: &[u8],
) -> Result<recipe::Model, AppError> {
    let Some(model) = owned::find_owned::<recipe::Entity, _>(db, recipe_id, user_id).await? else {
        return Err(AppError::NotFound("Recipe not found.".to_string()));
    };
    let previous = model.image.clone();

    let stored = media.store_image(data).await?;

    let mut active: recipe::ActiveModel = model.into();
    active.image = Set(Some(stored.clone()));
    active.updated_at = Set(Utc::now());
    let updated = match active.update(db).await {
        Ok(model) => model,
        Err(e) => {
            media.remove(&stored).await;
            return Err(e.into());
        }
    };

    if let Some(previous) = previous {
        if previous != stored {
            media.remove(&previous).await;
        }
    }
    Ok(updated)
}
