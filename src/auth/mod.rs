//! Request authentication. The strategy is picked once at startup from
//! `auth.mode` and shared through `web::Data<Authenticator>`.

pub mod basic;
pub mod jwt;

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::jwt::JwtSettings;
use crate::config::settings::AuthMode;
use crate::models::user::UserRole;

pub use basic::{parse_basic_credentials, BasicAuthenticator, BasicCredentials};
pub use jwt::{Claims, JwtAuthenticator};

pub const BASIC_CHALLENGE: &str = "Basic realm=\"Restricted\"";

/// The authenticated caller, stored in request extensions by the middleware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Basic authentication required")]
    BasicRequired,

    #[error("Bearer token required")]
    TokenRequired,

    #[error("Invalid credentials")]
    MalformedCredentials,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient privileges")]
    Forbidden,

    #[error("Authenticator is not configured")]
    Misconfigured,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Misconfigured | AuthError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if matches!(self, AuthError::BasicRequired) {
            builder.insert_header((header::WWW_AUTHENTICATE, BASIC_CHALLENGE));
        }

        let message = match self {
            AuthError::Database(e) => {
                tracing::error!("Database error during authentication: {:?}", e);
                "Internal server error".to_string()
            }
            AuthError::Misconfigured => {
                tracing::error!("Authenticator missing from app data");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        builder.json(json!({
            "success": false,
            "error": message
        }))
    }
}

/// Closed set of authentication strategies.
#[derive(Clone)]
pub enum Authenticator {
    Basic(BasicAuthenticator),
    Jwt(JwtAuthenticator),
}

impl Authenticator {
    pub fn from_settings(mode: AuthMode, jwt: JwtSettings, pool: PgPool) -> Self {
        tracing::info!("Authentication mode: {:?}", mode);
        match mode {
            AuthMode::Basic => Authenticator::Basic(BasicAuthenticator::new(pool)),
            AuthMode::Jwt => Authenticator::Jwt(JwtAuthenticator::new(jwt)),
        }
    }

    /// `authorization` is the raw `Authorization` header value, if any.
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, AuthError> {
        match self {
            Authenticator::Basic(basic) => basic.authenticate(authorization).await,
            Authenticator::Jwt(jwt) => jwt.authenticate(authorization),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_challenge_header_is_set() {
        let response = AuthError::BasicRequired.error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            BASIC_CHALLENGE
        );
    }

    #[test]
    fn bearer_failures_carry_no_challenge() {
        let response = AuthError::InvalidToken.error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn forbidden_maps_to_403() {
        assert_eq!(AuthError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }
}
