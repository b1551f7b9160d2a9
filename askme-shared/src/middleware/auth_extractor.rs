use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::errors::{AppError, ErrorCode};
use crate::types::auth::{AuthUser, Claims, SESSION_COOKIE};

/// Router state that knows the key session tokens are signed with.
pub trait SessionSecret {
    fn session_secret(&self) -> &str;
}

impl<T: SessionSecret> SessionSecret for Arc<T> {
    fn session_secret(&self) -> &str {
        (**self).session_secret()
    }
}

/// Requires a logged-in user; rejects with 401 otherwise.
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: SessionSecret + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_session_token(&parts.headers)
            .ok_or_else(|| AppError::unauthorized("please log in to access this page"))?;
        let claims = decode_session(&token, state.session_secret())?;

        if claims.is_expired() {
            return Err(AppError::new(ErrorCode::SessionExpired, "session has expired"));
        }

        Ok(AuthUser::from(claims))
    }
}

/// Prefers `Authorization: Bearer`, falling back to the session cookie.
fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.trim().to_string());
        }
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

pub fn decode_session(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::new(ErrorCode::SessionExpired, "session has expired")
        }
        _ => AppError::new(ErrorCode::SessionInvalid, format!("invalid session: {e}")),
    })?;

    Ok(token_data.claims)
}

/// Optional auth extractor
pub struct OptionalAuthUser(pub Option<AuthUser>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: SessionSecret + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(Self(Some(user))),
            Err(_) => Ok(Self(None)),
        }
    }
}
