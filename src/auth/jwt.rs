use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Header};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{AuthError, Principal};
use crate::config::jwt::JwtSettings;
use crate::models::user::UserRole;

/// HS256 claims carried by bearer tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub exp: usize,
}

impl Claims {
    pub fn for_principal(principal: &Principal, expiration_hours: i64) -> Self {
        let exp = Utc::now() + Duration::hours(expiration_hours);
        Self {
            sub: principal.user_id.to_string(),
            name: principal.name.clone(),
            email: principal.email.clone(),
            role: principal.role,
            exp: exp.timestamp() as usize,
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

#[derive(Clone)]
pub struct JwtAuthenticator {
    settings: Arc<JwtSettings>,
}

impl JwtAuthenticator {
    pub fn new(settings: JwtSettings) -> Self {
        Self { settings: Arc::new(settings) }
    }

    /// Signs claims with the shared secret. Tokens are normally minted by the
    /// identity provider; this is used by tooling and tests.
    pub fn encode(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::default(), claims, &self.settings.encoding_key())
    }

    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.settings.decoding_key(), &self.settings.validation())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::warn!("Failed to decode token: {:?}", e);
                AuthError::InvalidToken
            })
    }

    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, AuthError> {
        let token = authorization
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::TokenRequired)?;

        let claims = self.decode(token)?;
        let user_id = claims.user_id().ok_or(AuthError::InvalidToken)?;

        Ok(Principal {
            user_id,
            name: claims.name,
            email: claims.email,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> JwtAuthenticator {
        JwtAuthenticator::new(JwtSettings::new("test-secret".into(), 1))
    }

    fn principal(role: UserRole) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            role,
        }
    }

    #[test]
    fn valid_token_yields_principal() {
        let auth = authenticator();
        let expected = principal(UserRole::Admin);
        let token = auth.encode(&Claims::for_principal(&expected, 1)).unwrap();

        let header = format!("Bearer {}", token);
        assert_eq!(auth.authenticate(Some(&header)).unwrap(), expected);
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = authenticator();
        let token = auth.encode(&Claims::for_principal(&principal(UserRole::User), -2)).unwrap();
        let header = format!("Bearer {}", token);
        assert!(matches!(auth.authenticate(Some(&header)), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let other = JwtAuthenticator::new(JwtSettings::new("another-secret".into(), 1));
        let token = other.encode(&Claims::for_principal(&principal(UserRole::User), 1)).unwrap();
        let header = format!("Bearer {}", token);
        assert!(matches!(
            authenticator().authenticate(Some(&header)),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn missing_or_wrong_scheme_requires_token() {
        let auth = authenticator();
        assert!(matches!(auth.authenticate(None), Err(AuthError::TokenRequired)));
        assert!(matches!(auth.authenticate(Some("Basic abc")), Err(AuthError::TokenRequired)));
        assert!(matches!(auth.authenticate(Some("Bearer ")), Err(AuthError::TokenRequired)));
    }
}
