use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::password::PasswordHasher;
use crate::auth::session::RefreshTokenLifecycle;
use crate::config::AuthConfig;
use crate::db::models::User;
use crate::db::DbOperations;
use crate::error::{AppError, AuthError, DatabaseError};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

/// Both halves of a successful authentication: a short-lived JWT for
/// request auth and a long-lived opaque refresh token to mint the next one.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct AuthService {
    db: Arc<DbOperations>,
    lifecycle: RefreshTokenLifecycle,
    hasher: PasswordHasher,
    jwt_secret: String,
    access_token_expiry_minutes: i64,
}

impl AuthService {
    pub fn new(db: Arc<DbOperations>, config: AuthConfig) -> Self {
        let hasher = PasswordHasher::new(config.hash_cost);
        let lifecycle = RefreshTokenLifecycle::new(
            db.clone(),
            hasher,
            config.refresh_token_lifetime_days,
        );
        Self {
            db,
            lifecycle,
            hasher,
            jwt_secret: config.jwt_secret,
            access_token_expiry_minutes: config.access_token_expiry_minutes,
        }
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<User, AppError> {
        if self.db.get_user_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken.into());
        }

        let password_hash = self.hasher.hash(password).await?;
        let user = User::new(
            email.to_string(),
            password_hash,
            display_name.map(str::to_string),
        );

        // The pre-check races with concurrent registrations; the unique
        // index settles it.
        match self.db.create_user(&user).await {
            Ok(user) => {
                info!(user_id = %user.id, "registered new user");
                Ok(user)
            }
            Err(AppError::DatabaseError(DatabaseError::Duplicate)) => {
                Err(AuthError::EmailTaken.into())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AppError> {
        let user = self
            .db
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(&user.password_hash, password).await? {
            return Err(AuthError::InvalidCredentials.into());
        }

        let refresh_token = self.lifecycle.issue(user.id).await?;
        let access_token = self.generate_access_token(user.id)?;

        Ok((
            user,
            TokenPair {
                access_token,
                refresh_token,
            },
        ))
    }

    /// Exchange a refresh token for a fresh pair. The presented token is
    /// rotated out: it is revoked and a replacement issued, so a captured
    /// token stops working the moment its owner refreshes.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let user_id = self.lifecycle.verify(refresh_token).await?;

        self.lifecycle.revoke(refresh_token).await?;
        let new_refresh = self.lifecycle.issue(user_id).await?;
        let access_token = self.generate_access_token(user_id)?;

        Ok(TokenPair {
            access_token,
            refresh_token: new_refresh,
        })
    }

    /// Revoke the presented refresh token. Deliberately silent on a miss:
    /// the response never discloses whether the token existed.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        self.lifecycle.revoke(refresh_token).await
    }

    /// Decode an access token and return its subject user id.
    pub fn validate_access_token(&self, token: &str) -> Result<Uuid, AppError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?
        .claims;

        Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken.into())
    }

    fn generate_access_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = (now + Duration::minutes(self.access_token_expiry_minutes)).timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            exp,
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }
}
