//! Blogicum DB - SQLite entity store built on sqlx.
//!
//! Point lookups fail with [`DbError::NotFound`]; collection queries load
//! related users, categories and locations in the same statement.

pub mod comments;
pub mod posts;
pub mod taxonomy;
pub mod users;

mod rows;

pub use comments::{create_comment, delete_comment, get_comment, list_comments, update_comment};
pub use posts::{create_post, delete_post, fetch_feed, get_post, update_post};
pub use taxonomy::{
    create_category, create_location, delete_category, delete_location, get_published_category,
    list_categories, list_locations, set_category_published,
};
pub use users::{
    create_user, find_credentials, get_user, get_user_by_username, update_profile, ProfileChanges,
};

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

use blogicum_core::ValidationError;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("A user with that username already exists")]
    UsernameTaken,

    #[error("A category with that slug already exists")]
    SlugTaken,

    #[error("Invalid value: {0}")]
    Validation(#[from] ValidationError),

    #[error("Stored timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Get current time as milliseconds since Unix epoch.
pub fn current_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

pub(crate) fn to_epoch_ms(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn from_epoch_ms(ms: i64) -> Result<DateTime<Utc>, DbError> {
    DateTime::from_timestamp_millis(ms).ok_or(DbError::InvalidTimestamp(ms))
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Initialize database connection pool with recommended pragmas.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(5))
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

    SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
}

/// Run database migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(include_str!("../migrations/001_create_blog_tables.sql"))
        .execute(pool)
        .await?;
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = testing::setup_test_db().await;
        run_migrations(&pool).await.unwrap();

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN \
             ('users', 'categories', 'locations', 'posts', 'comments')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 5);
    }

    #[test]
    fn test_epoch_ms_conversion() {
        let now = Utc::now();
        let ms = to_epoch_ms(now);
        assert_eq!(from_epoch_ms(ms).unwrap().timestamp_millis(), ms);
        assert!(matches!(
            from_epoch_ms(i64::MAX),
            Err(DbError::InvalidTimestamp(_))
        ));
    }
}
