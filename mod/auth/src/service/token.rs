use axum::http::HeaderMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use chirp_core::{Authenticator, Identity, ServiceError};

use crate::model::{Claims, User};
use crate::service::AuthService;

impl AuthService {
    /// Sign a JWT for a user. Stateless: no session record is kept, a
    /// token stays valid until its expiry.
    pub fn issue_token(&self, user: &User) -> Result<String, ServiceError> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::days(self.config.token_ttl_days);

        let claims = Claims {
            user_id: user.id.clone(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::Internal(format!("JWT encode failed: {}", e)))
    }

    /// Verify and decode a JWT. Fails on bad signature or expiry.
    pub fn verify_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| ServiceError::Unauthenticated("Invalid or expired token".to_string()))
    }
}

impl Authenticator for AuthService {
    fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, ServiceError> {
        let token = extract_bearer(headers)
            .ok_or_else(|| ServiceError::Unauthenticated("No token provided".to_string()))?;
        let claims = self.verify_token(token)?;
        Ok(Identity {
            user_id: claims.user_id,
            email: claims.email,
        })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}
