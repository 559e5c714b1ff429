use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};

use blogicum_core::{Comment, CommentId, PostId, User};
use blogicum_db::DbError;

use crate::error::{post_url, AppError};
use crate::forms::CommentForm;
use crate::render;
use crate::routes::{ensure_author, parse_id};
use crate::session::LoggedIn;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts/{id}/comment/", post(add_comment))
        .route(
            "/posts/{id}/edit_comment/{comment_id}/",
            get(edit_form).post(edit),
        )
        .route(
            "/posts/{id}/delete_comment/{comment_id}/",
            get(delete_form).post(delete),
        )
}

async fn add_comment(
    State(state): State<AppState>,
    LoggedIn(user): LoggedIn,
    Path(id): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<Response, AppError> {
    let post = blogicum_db::get_post(&state.pool, PostId(parse_id(&id)?)).await?;

    let result = match form.validate() {
        Ok(text) => blogicum_db::create_comment(&state.pool, post.id, user.id, text).await,
        Err(e) => Err(e.into()),
    };
    match result {
        Ok(_) => Ok(Redirect::to(&post_url(post.id)).into_response()),
        Err(DbError::Validation(e)) => {
            let action = format!("/posts/{}/comment/", post.id.0);
            Ok(Html(render::comment_form_page(
                Some(&user),
                "New comment",
                &action,
                &form.text,
                Some(&e.to_string()),
            ))
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Load a comment for editing or deleting by its author. The comment must
/// belong to the post named in the path.
async fn authored_comment(
    state: &AppState,
    user: &User,
    (post_id, comment_id): &(String, String),
) -> Result<Comment, AppError> {
    let post = PostId(parse_id(post_id)?);
    let id = CommentId(parse_id(comment_id)?);
    let comment = blogicum_db::get_comment(&state.pool, post, id).await?;
    ensure_author(user, &comment)?;
    Ok(comment)
}

fn edit_action(comment: &Comment) -> String {
    format!(
        "/posts/{}/edit_comment/{}/",
        comment.post_id.0, comment.id.0
    )
}

async fn edit_form(
    State(state): State<AppState>,
    LoggedIn(user): LoggedIn,
    Path(ids): Path<(String, String)>,
) -> Result<Html<String>, AppError> {
    let comment = authored_comment(&state, &user, &ids).await?;
    Ok(Html(render::comment_form_page(
        Some(&user),
        "Edit comment",
        &edit_action(&comment),
        &comment.text,
        None,
    )))
}

async fn edit(
    State(state): State<AppState>,
    LoggedIn(user): LoggedIn,
    Path(ids): Path<(String, String)>,
    Form(form): Form<CommentForm>,
) -> Result<Response, AppError> {
    let comment = authored_comment(&state, &user, &ids).await?;

    let result = match form.validate() {
        Ok(text) => blogicum_db::update_comment(&state.pool, comment.id, text).await,
        Err(e) => Err(e.into()),
    };
    match result {
        Ok(()) => Ok(Redirect::to(&post_url(comment.post_id)).into_response()),
        Err(DbError::Validation(e)) => Ok(Html(render::comment_form_page(
            Some(&user),
            "Edit comment",
            &edit_action(&comment),
            &form.text,
            Some(&e.to_string()),
        ))
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

async fn delete_form(
    State(state): State<AppState>,
    LoggedIn(user): LoggedIn,
    Path(ids): Path<(String, String)>,
) -> Result<Html<String>, AppError> {
    let comment = authored_comment(&state, &user, &ids).await?;
    Ok(Html(render::delete_comment_page(Some(&user), &comment)))
}

async fn delete(
    State(state): State<AppState>,
    LoggedIn(user): LoggedIn,
    Path(ids): Path<(String, String)>,
) -> Result<Redirect, AppError> {
    let comment = authored_comment(&state, &user, &ids).await?;
    blogicum_db::delete_comment(&state.pool, comment.id).await?;
    Ok(Redirect::to(&post_url(comment.post_id)))
}
