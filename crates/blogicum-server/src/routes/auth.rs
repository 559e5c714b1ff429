use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;

use blogicum_db::DbError;

use crate::error::AppError;
use crate::forms::{safe_next, LoginForm, NextQuery, RegistrationForm};
use crate::render;
use crate::session::{hash_password, logout_cookie, verify_password, Viewer};
use crate::state::AppState;

const BAD_CREDENTIALS: &str =
    "Please enter a correct username and password. Both fields may be case-sensitive.";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login/", get(login_form).post(login))
        .route("/auth/logout/", post(logout))
        .route("/auth/registration/", get(registration_form).post(register))
}

async fn login_form(viewer: Viewer, Query(query): Query<NextQuery>) -> Html<String> {
    let next = safe_next(query.next.as_deref());
    Html(render::login_page(viewer.user(), "", next, None))
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim();
    let next = safe_next(Some(&form.next));

    let verified = match blogicum_db::find_credentials(&state.pool, username).await? {
        Some((user, hash)) => verify_password(form.password.clone(), hash)
            .await?
            .then_some(user),
        None => None,
    };
    let Some(user) = verified else {
        tracing::warn!("Rejected login for {:?}", username);
        return Ok(
            Html(render::login_page(None, username, next, Some(BAD_CREDENTIALS))).into_response(),
        );
    };

    let token = state.sessions.issue(&user)?;
    tracing::info!("{} logged in", user.id);
    Ok((jar.add(state.sessions.login_cookie(token)), Redirect::to(next)).into_response())
}

async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.remove(logout_cookie()), Redirect::to("/"))
}

async fn registration_form(viewer: Viewer) -> Html<String> {
    Html(render::registration_page(viewer.user(), "", None))
}

async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim();

    let error = match form.validate() {
        Ok(()) => {
            let hash = hash_password(form.password1.clone()).await?;
            match blogicum_db::create_user(&state.pool, username, &hash).await {
                Ok(user) => {
                    tracing::info!("Registered {} as {}", user.username, user.id);
                    return Ok(Redirect::to("/").into_response());
                }
                Err(DbError::UsernameTaken) => DbError::UsernameTaken.to_string(),
                Err(DbError::Validation(e)) => e.to_string(),
                Err(e) => return Err(e.into()),
            }
        }
        Err(e) => e.to_string(),
    };

    Ok(Html(render::registration_page(None, username, Some(&error))).into_response())
}
