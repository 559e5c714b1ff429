pub mod auth;
pub mod blog;
pub mod comments;
pub mod health;
pub mod posts;
pub mod profile;

use axum::{
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use blogicum_core::{authorize_mutation, Authored, MutationDecision, User};

use crate::error::AppError;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(blog::routes())
        .merge(posts::routes())
        .merge(comments::routes())
        .merge(profile::routes())
        .merge(auth::routes())
        .merge(health::routes())
        .route("/static/style.css", get(stylesheet))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn stylesheet() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/css; charset=utf-8")],
        include_str!("../../static/style.css"),
    )
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// Path ids that are not integers name nothing.
pub(crate) fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| AppError::NotFound)
}

/// Let only the author through; anyone else goes back to the post.
pub(crate) fn ensure_author<T: Authored>(user: &User, target: &T) -> Result<(), AppError> {
    match authorize_mutation(Some(user.id), target) {
        MutationDecision::Allowed => Ok(()),
        MutationDecision::RedirectToPost(post_id) => Err(AppError::NotAuthor { post_id }),
        // A logged-in user is never anonymous.
        MutationDecision::LoginRequired => Err(AppError::LoginRequired {
            next: "/".to_string(),
        }),
    }
}
