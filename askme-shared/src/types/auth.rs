use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "askme_session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
    #[serde(default)]
    pub remember: bool,
}

impl Claims {
    pub fn new(user_id: i32, duration_secs: i64, remember: bool) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id,
            iat: now,
            exp: now + duration_secs,
            jti: Uuid::now_v7(),
            remember,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// The authenticated identity attached to a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub session_id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            session_id: claims.jti,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub remember: bool,
}

impl SessionToken {
    pub fn new(token: String, expires_in: i64, remember: bool) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            remember,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_claims_are_not_expired() {
        let claims = Claims::new(7, 60, false);
        assert!(!claims.is_expired());
        assert_eq!(AuthUser::from(claims).id, 7);
    }

    #[test]
    fn negative_duration_expires_immediately() {
        assert!(Claims::new(7, -10, true).is_expired());
    }
}
