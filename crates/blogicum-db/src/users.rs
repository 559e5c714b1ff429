use sqlx::SqlitePool;

use blogicum_core::{User, UserId, Validator};

use crate::rows::{UserRow, USER_COLUMNS};
use crate::{current_epoch_ms, is_unique_violation, DbError};

/// Fields a user may change on their profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChanges {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Register a user. `password_hash` is stored verbatim.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<User, DbError> {
    Validator::validate_username(username)?;

    let result = sqlx::query(
        "INSERT INTO users (username, password_hash, date_joined) VALUES (?, ?, ?)",
    )
    .bind(username)
    .bind(password_hash)
    .bind(current_epoch_ms())
    .execute(pool)
    .await;

    match result {
        Ok(done) => get_user(pool, UserId(done.last_insert_rowid())).await,
        Err(e) if is_unique_violation(&e) => Err(DbError::UsernameTaken),
        Err(e) => Err(e.into()),
    }
}

pub async fn get_user(pool: &SqlitePool, id: UserId) -> Result<User, DbError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = ?");
    sqlx::query_as::<_, UserRow>(&sql)
        .bind(id.0)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound("user"))?
        .try_into()
}

pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> Result<User, DbError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE u.username = ?");
    sqlx::query_as::<_, UserRow>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound("user"))?
        .try_into()
}

/// Look up a user and their password hash for login.
/// Returns `None` when the username is unknown.
pub async fn find_credentials(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<(User, String)>, DbError> {
    let hash: Option<(i64, String)> =
        sqlx::query_as("SELECT id, password_hash FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;

    match hash {
        Some((id, hash)) => Ok(Some((get_user(pool, UserId(id)).await?, hash))),
        None => Ok(None),
    }
}

pub async fn update_profile(
    pool: &SqlitePool,
    id: UserId,
    changes: &ProfileChanges,
) -> Result<User, DbError> {
    Validator::validate_username(&changes.username)?;
    Validator::validate_person_name("first_name", &changes.first_name)?;
    Validator::validate_person_name("last_name", &changes.last_name)?;
    Validator::validate_email(&changes.email)?;

    let result = sqlx::query(
        r#"
        UPDATE users
        SET username = ?, first_name = ?, last_name = ?, email = ?
        WHERE id = ?
        "#,
    )
    .bind(&changes.username)
    .bind(&changes.first_name)
    .bind(&changes.last_name)
    .bind(&changes.email)
    .bind(id.0)
    .execute(pool)
    .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => Err(DbError::NotFound("user")),
        Ok(_) => get_user(pool, id).await,
        Err(e) if is_unique_violation(&e) => Err(DbError::UsernameTaken),
        Err(e) => Err(e.into()),
    }
}
