//! Login sessions: password hashing, signed session cookies, and the
//! extractors that tell handlers who is asking.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use blogicum_core::{User, UserId};
use blogicum_db::DbError;

use crate::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "blogicum_session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub exp: usize,
}

/// Signing keys and lifetime for session tokens.
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user.id.0,
            username: user.username.clone(),
            exp: (Utc::now() + self.ttl).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// The user a token was issued to, or `None` if it is forged or expired.
    pub fn verify(&self, token: &str) -> Option<UserId> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| UserId(data.claims.sub))
            .ok()
    }

    pub fn login_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build()
    }
}

pub fn logout_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Hash a password with Argon2id and a random salt, off the async workers.
pub async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::PasswordHash(e.to_string()))
    })
    .await
    .map_err(|e| AppError::PasswordHash(format!("spawn_blocking join error: {}", e)))?
}

/// Check a password against a stored hash, off the async workers.
/// A malformed hash never matches.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || {
        PasswordHash::new(&hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    })
    .await
    .map_err(|e| AppError::PasswordHash(format!("spawn_blocking join error: {}", e)))
}

/// The user behind the request, if any.
///
/// The account is re-read on every request, so a renamed or deleted user is
/// seen immediately. A missing, invalid or expired session is anonymous.
pub struct Viewer(pub Option<User>);

impl Viewer {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }

    pub fn id(&self) -> Option<UserId> {
        self.0.as_ref().map(|u| u.id)
    }
}

impl FromRequestParts<AppState> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(id) = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| state.sessions.verify(cookie.value()))
        else {
            return Ok(Viewer(None));
        };

        match blogicum_db::get_user(&state.pool, id).await {
            Ok(user) => Ok(Viewer(Some(user))),
            Err(DbError::NotFound(_)) => Ok(Viewer(None)),
            Err(e) => Err(e.into()),
        }
    }
}

/// A logged-in user. Anonymous requests are sent to the login page and come
/// back to the requested path afterwards.
pub struct LoggedIn(pub User);

impl FromRequestParts<AppState> for LoggedIn {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let Viewer(user) = Viewer::from_request_parts(parts, state).await?;
        user.map(LoggedIn).ok_or_else(|| AppError::LoginRequired {
            next: parts
                .uri
                .path_and_query()
                .map(|pq| pq.to_string())
                .unwrap_or_else(|| "/".to_string()),
        })
    }
}
