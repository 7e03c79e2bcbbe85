use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;

use crate::auth::{AuthError, Principal};
use crate::db::user_queries::UserQueries;
use crate::models::user::normalize_email;
use crate::utils::password::verify_password;

#[derive(Debug)]
pub struct BasicCredentials {
    pub email: String,
    pub password: SecretString,
}

/// Decodes an `Authorization: Basic …` value. The payload is split at the
/// first `:` and the email is normalized; empty parts are rejected.
pub fn parse_basic_credentials(header: &str) -> Result<BasicCredentials, AuthError> {
    let encoded = header
        .strip_prefix("Basic ")
        .ok_or(AuthError::BasicRequired)?
        .trim();

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|_| AuthError::MalformedCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedCredentials)?;

    let (email, password) = decoded.split_once(':').unwrap_or((decoded.as_str(), ""));
    let email = normalize_email(email);
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::MalformedCredentials);
    }

    Ok(BasicCredentials {
        email,
        password: SecretString::new(password.into()),
    })
}

#[derive(Clone)]
pub struct BasicAuthenticator {
    pool: PgPool,
}

impl BasicAuthenticator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(name = "Basic authentication", skip_all)]
    pub async fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, AuthError> {
        let credentials = parse_basic_credentials(authorization.ok_or(AuthError::BasicRequired)?)?;

        let user = UserQueries::new(self.pool.clone())
            .find_by_email(&credentials.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(credentials.password.expose_secret(), &user.password_hash) {
            tracing::warn!("Password mismatch for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Principal {
            user_id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn splits_at_first_colon() {
        let credentials = parse_basic_credentials(&header(" Ana@Example.com :pa:ss")).unwrap();
        assert_eq!(credentials.email, "ana@example.com");
        assert_eq!(credentials.password.expose_secret(), "pa:ss");
    }

    #[test]
    fn rejects_empty_parts() {
        assert!(matches!(
            parse_basic_credentials(&header("ana@example.com:")),
            Err(AuthError::MalformedCredentials)
        ));
        assert!(matches!(
            parse_basic_credentials(&header("ana@example.com")),
            Err(AuthError::MalformedCredentials)
        ));
        assert!(matches!(
            parse_basic_credentials(&header("  :secret")),
            Err(AuthError::MalformedCredentials)
        ));
    }

    #[test]
    fn rejects_other_schemes_and_bad_base64() {
        assert!(matches!(
            parse_basic_credentials("Bearer abc"),
            Err(AuthError::BasicRequired)
        ));
        assert!(matches!(
            parse_basic_credentials("Basic !!!"),
            Err(AuthError::MalformedCredentials)
        ));
    }
}
