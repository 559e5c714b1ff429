use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use chrono::Utc;

use blogicum_core::{paginate, FeedQuery, PageRequest, POSTS_PER_PAGE};
use blogicum_db::DbError;

use crate::error::{profile_url, AppError};
use crate::forms::{PageQuery, ProfileForm};
use crate::render;
use crate::session::{LoggedIn, Viewer};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile/edit/", get(edit_form).post(edit))
        .route("/profile/{username}/", get(profile))
}

/// A user's posts. The owner also sees their unpublished and scheduled
/// posts, and posts in hidden categories.
async fn profile(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let owner = blogicum_db::get_user_by_username(&state.pool, &username).await?;
    let request = PageRequest::parse(query.page.as_deref())?;
    let is_owner = viewer.id() == Some(owner.id);

    let feed = FeedQuery::profile(owner.id, is_owner, Utc::now());
    let entries = blogicum_db::fetch_feed(&state.pool, &feed).await?;
    let page = paginate(entries, request, POSTS_PER_PAGE)?;

    Ok(Html(render::profile_page(
        viewer.user(),
        &owner,
        is_owner,
        &page,
    )))
}

async fn edit_form(LoggedIn(user): LoggedIn) -> Html<String> {
    Html(render::profile_form_page(
        Some(&user),
        &ProfileForm::from_user(&user),
        None,
    ))
}

async fn edit(
    State(state): State<AppState>,
    LoggedIn(user): LoggedIn,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    let result = match form.to_changes() {
        Ok(changes) => blogicum_db::update_profile(&state.pool, user.id, &changes).await,
        Err(e) => Err(e.into()),
    };

    let error = match result {
        Ok(updated) => {
            tracing::info!("Profile of {} updated", updated.id);
            return Ok(Redirect::to(&profile_url(&updated.username)).into_response());
        }
        Err(DbError::Validation(e)) => e.to_string(),
        Err(DbError::UsernameTaken) => DbError::UsernameTaken.to_string(),
        Err(e) => return Err(e.into()),
    };

    Ok(Html(render::profile_form_page(Some(&user), &form, Some(&error))).into_response())
}
