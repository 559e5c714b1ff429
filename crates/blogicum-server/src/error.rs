use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use blogicum_core::{PaginationError, PostId};
use blogicum_db::DbError;

use crate::render;

/// Everything a handler can fail with, and how each failure is shown.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing entity, hidden post, or out-of-range page.
    #[error("Not found")]
    NotFound,

    /// An anonymous user tried something that needs an account.
    #[error("Login required for {next}")]
    LoginRequired { next: String },

    /// A logged-in user tried to change someone else's post or comment.
    /// Answered by sending them back to the post, not with a 403.
    #[error("Only the author may change this; back to {post_id}")]
    NotAuthor { post_id: PostId },

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("Session token error: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl From<PaginationError> for AppError {
    fn from(_: PaginationError) -> Self {
        AppError::NotFound
    }
}

pub fn login_url(next: &str) -> String {
    format!("/auth/login/?next={}", urlencoding::encode(next))
}

pub fn post_url(id: PostId) -> String {
    format!("/posts/{}/", id.0)
}

pub fn profile_url(username: &str) -> String {
    format!("/profile/{}/", urlencoding::encode(username))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound | AppError::Db(DbError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, Html(render::not_found_page())).into_response()
            }
            AppError::LoginRequired { next } => Redirect::to(&login_url(&next)).into_response(),
            AppError::NotAuthor { post_id } => Redirect::to(&post_url(post_id)).into_response(),
            other => {
                tracing::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(render::server_error_page()),
                )
                    .into_response()
            }
        }
    }
}
