use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use chrono::Utc;

use blogicum_core::{is_visible, Post, PostId, User};
use blogicum_db::DbError;

use crate::error::{post_url, profile_url, AppError};
use crate::forms::PostForm;
use crate::render;
use crate::routes::{ensure_author, parse_id};
use crate::session::{LoggedIn, Viewer};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts/create/", get(create_form).post(create))
        .route("/posts/{id}/", get(detail))
        .route("/posts/{id}/edit/", get(edit_form).post(edit))
        .route("/posts/{id}/delete/", get(delete_form).post(delete))
}

async fn detail(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let now = Utc::now();
    let post = blogicum_db::get_post(&state.pool, PostId(parse_id(&id)?)).await?;
    if !is_visible(&post, viewer.id(), now) {
        return Err(AppError::NotFound);
    }
    let comments = blogicum_db::list_comments(&state.pool, post.id).await?;

    Ok(Html(render::detail_page(viewer.user(), &post, &comments, now)))
}

/// Re-render the post form with the current choices.
async fn form_page(
    state: &AppState,
    user: &User,
    heading: &str,
    action: &str,
    form: &PostForm,
    error: Option<&str>,
) -> Result<Html<String>, AppError> {
    let categories = blogicum_db::list_categories(&state.pool).await?;
    let locations = blogicum_db::list_locations(&state.pool).await?;
    Ok(Html(render::post_form_page(
        Some(user),
        heading,
        action,
        form,
        &categories,
        &locations,
        error,
    )))
}

async fn create_form(
    State(state): State<AppState>,
    LoggedIn(user): LoggedIn,
) -> Result<Html<String>, AppError> {
    let form = PostForm::blank(Utc::now());
    form_page(&state, &user, "New post", "/posts/create/", &form, None).await
}

async fn create(
    State(state): State<AppState>,
    LoggedIn(user): LoggedIn,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let categories = blogicum_db::list_categories(&state.pool).await?;
    let locations = blogicum_db::list_locations(&state.pool).await?;

    let result = match form.to_draft(&categories, &locations) {
        Ok(draft) => blogicum_db::create_post(&state.pool, user.id, &draft).await,
        Err(e) => Err(e.into()),
    };
    match result {
        Ok(_) => Ok(Redirect::to(&profile_url(&user.username)).into_response()),
        Err(DbError::Validation(e)) => {
            form_page(&state, &user, "New post", "/posts/create/", &form, Some(&e.to_string()))
                .await
                .map(IntoResponse::into_response)
        }
        Err(e) => Err(e.into()),
    }
}

/// Load a post for editing or deleting by its author.
async fn authored_post(state: &AppState, user: &User, id: &str) -> Result<Post, AppError> {
    let post = blogicum_db::get_post(&state.pool, PostId(parse_id(id)?)).await?;
    ensure_author(user, &post)?;
    Ok(post)
}

async fn edit_form(
    State(state): State<AppState>,
    LoggedIn(user): LoggedIn,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let post = authored_post(&state, &user, &id).await?;
    let action = format!("/posts/{}/edit/", post.id.0);
    form_page(
        &state,
        &user,
        "Edit post",
        &action,
        &PostForm::from_post(&post),
        None,
    )
    .await
}

async fn edit(
    State(state): State<AppState>,
    LoggedIn(user): LoggedIn,
    Path(id): Path<String>,
    Form(form): Form<PostForm>,
) -> Result<Response, AppError> {
    let post = authored_post(&state, &user, &id).await?;
    let categories = blogicum_db::list_categories(&state.pool).await?;
    let locations = blogicum_db::list_locations(&state.pool).await?;

    let result = match form.to_draft(&categories, &locations) {
        Ok(draft) => blogicum_db::update_post(&state.pool, post.id, &draft).await,
        Err(e) => Err(e.into()),
    };
    match result {
        Ok(()) => Ok(Redirect::to(&post_url(post.id)).into_response()),
        Err(DbError::Validation(e)) => {
            let action = format!("/posts/{}/edit/", post.id.0);
            form_page(&state, &user, "Edit post", &action, &form, Some(&e.to_string()))
                .await
                .map(IntoResponse::into_response)
        }
        Err(e) => Err(e.into()),
    }
}

async fn delete_form(
    State(state): State<AppState>,
    LoggedIn(user): LoggedIn,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let post = authored_post(&state, &user, &id).await?;
    Ok(Html(render::delete_post_page(Some(&user), &post)))
}

async fn delete(
    State(state): State<AppState>,
    LoggedIn(user): LoggedIn,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let post = authored_post(&state, &user, &id).await?;
    blogicum_db::delete_post(&state.pool, post.id).await?;
    Ok(Redirect::to(&profile_url(&user.username)))
}
