//! Categories and locations. These are managed by site staff, so there are
//! no web forms for them; the functions here are the whole interface.

use sqlx::SqlitePool;

use blogicum_core::{Category, CategoryId, Location, LocationId, Validator};

use crate::rows::{CategoryRow, LocationRow};
use crate::{current_epoch_ms, is_unique_violation, DbError};

const CATEGORY_COLUMNS: &str = "id, title, description, slug, is_published, created_at";
const LOCATION_COLUMNS: &str = "id, name, is_published, created_at";

pub async fn create_category(
    pool: &SqlitePool,
    title: &str,
    description: &str,
    slug: &str,
    is_published: bool,
) -> Result<Category, DbError> {
    Validator::validate_title("title", title)?;
    Validator::validate_slug(slug)?;

    let sql = format!(
        "INSERT INTO categories (title, description, slug, is_published, created_at) \
         VALUES (?, ?, ?, ?, ?) RETURNING {CATEGORY_COLUMNS}"
    );
    let result = sqlx::query_as::<_, CategoryRow>(&sql)
        .bind(title)
        .bind(description)
        .bind(slug)
        .bind(is_published)
        .bind(current_epoch_ms())
        .fetch_one(pool)
        .await;

    match result {
        Ok(row) => {
            tracing::info!("Created category {}", row.slug);
            row.try_into()
        }
        Err(e) if is_unique_violation(&e) => Err(DbError::SlugTaken),
        Err(e) => Err(e.into()),
    }
}

/// Resolve a category page. Unpublished categories are reported as missing.
pub async fn get_published_category(pool: &SqlitePool, slug: &str) -> Result<Category, DbError> {
    let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = ? AND is_published = 1");
    sqlx::query_as::<_, CategoryRow>(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound("category"))?
        .try_into()
}

/// All categories, oldest first, for the post form's choices.
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<Category>, DbError> {
    let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id ASC");
    sqlx::query_as::<_, CategoryRow>(&sql)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(TryInto::try_into)
        .collect()
}

pub async fn set_category_published(
    pool: &SqlitePool,
    id: CategoryId,
    is_published: bool,
) -> Result<(), DbError> {
    let done = sqlx::query("UPDATE categories SET is_published = ? WHERE id = ?")
        .bind(is_published)
        .bind(id.0)
        .execute(pool)
        .await?;
    if done.rows_affected() == 0 {
        return Err(DbError::NotFound("category"));
    }
    Ok(())
}

/// Delete a category. Its posts stay, with no category.
pub async fn delete_category(pool: &SqlitePool, id: CategoryId) -> Result<(), DbError> {
    let done = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id.0)
        .execute(pool)
        .await?;
    if done.rows_affected() == 0 {
        return Err(DbError::NotFound("category"));
    }
    Ok(())
}

pub async fn create_location(
    pool: &SqlitePool,
    name: &str,
    is_published: bool,
) -> Result<Location, DbError> {
    Validator::validate_title("name", name)?;

    let sql = format!(
        "INSERT INTO locations (name, is_published, created_at) VALUES (?, ?, ?) \
         RETURNING {LOCATION_COLUMNS}"
    );
    sqlx::query_as::<_, LocationRow>(&sql)
        .bind(name)
        .bind(is_published)
        .bind(current_epoch_ms())
        .fetch_one(pool)
        .await?
        .try_into()
}

/// All locations, oldest first, for the post form's choices.
pub async fn list_locations(pool: &SqlitePool) -> Result<Vec<Location>, DbError> {
    let sql = format!("SELECT {LOCATION_COLUMNS} FROM locations ORDER BY id ASC");
    sqlx::query_as::<_, LocationRow>(&sql)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(TryInto::try_into)
        .collect()
}

/// Delete a location. Its posts stay, with no location.
pub async fn delete_location(pool: &SqlitePool, id: LocationId) -> Result<(), DbError> {
    let done = sqlx::query("DELETE FROM locations WHERE id = ?")
        .bind(id.0)
        .execute(pool)
        .await?;
    if done.rows_affected() == 0 {
        return Err(DbError::NotFound("location"));
    }
    Ok(())
}
