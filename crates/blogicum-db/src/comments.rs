use sqlx::SqlitePool;

use blogicum_core::{Comment, CommentId, PostId, UserId, Validator};

use crate::rows::{CommentRow, COMMENT_SELECT};
use crate::{current_epoch_ms, DbError};

pub async fn create_comment(
    pool: &SqlitePool,
    post: PostId,
    author: UserId,
    text: &str,
) -> Result<CommentId, DbError> {
    Validator::validate_text("text", text)?;

    let done = sqlx::query(
        "INSERT INTO comments (text, created_at, author_id, post_id) VALUES (?, ?, ?, ?)",
    )
    .bind(text)
    .bind(current_epoch_ms())
    .bind(author.0)
    .bind(post.0)
    .execute(pool)
    .await?;

    let id = CommentId(done.last_insert_rowid());
    tracing::info!("Created {} on {} by {}", id, post, author);
    Ok(id)
}

/// Fetch a comment through the post it belongs to. A comment id paired
/// with the wrong post is reported as missing.
pub async fn get_comment(
    pool: &SqlitePool,
    post: PostId,
    id: CommentId,
) -> Result<Comment, DbError> {
    let sql = format!("{COMMENT_SELECT} WHERE cm.id = ? AND cm.post_id = ?");
    sqlx::query_as::<_, CommentRow>(&sql)
        .bind(id.0)
        .bind(post.0)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound("comment"))?
        .try_into()
}

/// All comments of a post, oldest first.
pub async fn list_comments(pool: &SqlitePool, post: PostId) -> Result<Vec<Comment>, DbError> {
    let sql = format!("{COMMENT_SELECT} WHERE cm.post_id = ? ORDER BY cm.created_at ASC, cm.id ASC");
    sqlx::query_as::<_, CommentRow>(&sql)
        .bind(post.0)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(TryInto::try_into)
        .collect()
}

pub async fn update_comment(pool: &SqlitePool, id: CommentId, text: &str) -> Result<(), DbError> {
    Validator::validate_text("text", text)?;

    let done = sqlx::query("UPDATE comments SET text = ? WHERE id = ?")
        .bind(text)
        .bind(id.0)
        .execute(pool)
        .await?;
    if done.rows_affected() == 0 {
        return Err(DbError::NotFound("comment"));
    }
    tracing::info!("Updated {}", id);
    Ok(())
}

pub async fn delete_comment(pool: &SqlitePool, id: CommentId) -> Result<(), DbError> {
    let done = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id.0)
        .execute(pool)
        .await?;
    if done.rows_affected() == 0 {
        return Err(DbError::NotFound("comment"));
    }
    tracing::info!("Deleted {}", id);
    Ok(())
}
