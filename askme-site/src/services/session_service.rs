use axum::http::HeaderValue;
use jsonwebtoken::{encode, EncodingKey, Header};

use askme_shared::errors::AppError;
use askme_shared::types::auth::{Claims, SessionToken, SESSION_COOKIE};

use crate::config::AppConfig;

/// Signs a session token for `user_id`. Remember-me sessions use the longer TTL.
pub fn issue_session(user_id: i32, remember: bool, config: &AppConfig) -> Result<SessionToken, AppError> {
    let ttl = if remember { config.remember_ttl } else { config.session_ttl };
    let claims = Claims::new(user_id, ttl, remember);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.session_secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(format!("JWT encoding failed: {e}")))?;

    Ok(SessionToken::new(token, ttl, remember))
}

/// `Set-Cookie` value for a freshly issued session. Only remember-me
/// sessions outlive the browser.
pub fn session_cookie(session: &SessionToken, secure: bool) -> Result<HeaderValue, AppError> {
    let mut cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", session.token);
    if session.remember {
        cookie.push_str(&format!("; Max-Age={}", session.expires_in));
    }
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|e| AppError::internal(format!("invalid cookie: {e}")))
}

pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    if secure {
        HeaderValue::from_static("askme_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Secure")
    } else {
        HeaderValue::from_static("askme_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use askme_shared::middleware::decode_session;

    fn config() -> AppConfig {
        AppConfig { session_secret: "test-secret".into(), ..AppConfig::default() }
    }

    #[test]
    fn issued_token_decodes_to_the_user() {
        let session = issue_session(42, false, &config()).unwrap();
        let claims = decode_session(&session.token, "test-secret").unwrap();
        assert_eq!(claims.sub, 42);
        assert!(!claims.remember);
        assert_eq!(session.expires_in, config().session_ttl);
    }

    #[test]
    fn remember_me_uses_the_long_ttl() {
        let session = issue_session(42, true, &config()).unwrap();
        assert_eq!(session.expires_in, config().remember_ttl);
        assert!(decode_session(&session.token, "test-secret").unwrap().remember);
    }

    #[test]
    fn cookie_max_age_only_when_remembered() {
        let short = session_cookie(&issue_session(1, false, &config()).unwrap(), false).unwrap();
        let long = session_cookie(&issue_session(1, true, &config()).unwrap(), true).unwrap();

        let short = short.to_str().unwrap();
        let long = long.to_str().unwrap();
        assert!(short.starts_with("askme_session="));
        assert!(short.contains("HttpOnly"));
        assert!(!short.contains("Max-Age"));
        assert!(long.contains(&format!("Max-Age={}", config().remember_ttl)));
        assert!(long.ends_with("; Secure"));
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let cookie = clear_session_cookie(false);
        assert!(cookie.to_str().unwrap().contains("Max-Age=0"));
    }
}
