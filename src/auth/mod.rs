//! Session authentication for the admin area.
//!
//! The catalog only needs a credentials-based session: admins log in with
//! email and password, receive a short-lived bearer token, and every
//! mutating route requires a valid session. Resource-level authorization
//! (owner checks) lives in [`ownership`].

use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{user, User, UserModel};
use crate::errors::ServiceError;

pub mod ownership;

pub use ownership::authorize_owner;

/// Claim structure for session tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    pub email: String,
    pub name: String,
    /// Token id
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated admin extracted from a validated session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub token_id: String,
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub session_ttl: Duration,
}

/// Issued session token pair
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Validates credentials against the users table and issues/validates
/// session tokens.
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
    db: Arc<DbPool>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DbPool>) -> Self {
        Self { config, db }
    }

    /// Verify credentials and issue a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionToken, ServiceError> {
        let user = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("invalid credentials".to_string()))?;

        if !verify_password(password, &user.password_hash) {
            return Err(ServiceError::Unauthorized("invalid credentials".to_string()));
        }

        self.issue_token(&user)
    }

    /// Issue a token for an already-verified user.
    pub fn issue_token(&self, user: &UserModel) -> Result<SessionToken, ServiceError> {
        let now = Utc::now();
        let expires_in = self.config.session_ttl.as_secs();

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + expires_in as i64,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::InternalError(format!("token creation failed: {e}")))?;

        Ok(SessionToken {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in,
        })
    }

    /// Validate a bearer token and map its claims to an [`AuthUser`].
    pub fn validate_token(&self, token: &str) -> Result<AuthUser, ServiceError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| {
            debug!("token validation failed: {e}");
            ServiceError::Unauthorized("invalid or expired session".to_string())
        })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| ServiceError::Unauthorized("malformed session subject".to_string()))?;

        Ok(AuthUser {
            user_id,
            email: data.claims.email,
            name: data.claims.name,
            token_id: data.claims.jti,
        })
    }
}

/// Hash a password with argon2 and a fresh salt.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
    use argon2::Argon2;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::InternalError(format!("password hashing failed: {e}")))
}

/// Constant-time verification of a password against its stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};
    use argon2::Argon2;

    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Middleware validating the session and stashing the [`AuthUser`] in
/// request extensions. Routes wrapped by this reject with 401 before the
/// handler runs.
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, ServiceError> {
    let auth_service = request
        .extensions()
        .get::<Arc<AuthService>>()
        .cloned()
        .ok_or_else(|| ServiceError::InternalError("auth service not available".to_string()))?;

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(|| ServiceError::Unauthorized("missing session token".to_string()))?;

    let auth_user = auth_service.validate_token(token)?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extractor for handlers running behind [`auth_middleware`].
#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ServiceError::Unauthorized("missing session token".to_string()))
    }
}

/// Extension methods for Router to add session middleware
pub trait AuthRouterExt {
    fn with_session(self) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_session(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip_verifies() {
        let hash = hash_password("kopalnia123").expect("hash should succeed");
        assert!(verify_password("kopalnia123", &hash));
        assert!(!verify_password("kopalnia124", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
