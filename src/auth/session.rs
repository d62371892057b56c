use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenIssuer;
use crate::db::models::RefreshTokenRecord;
use crate::error::{AppError, AuthError};

/// Persistence contract for refresh-token records. The Postgres layer
/// implements it in production; tests back it with an in-memory map.
///
/// These four query shapes are all the lifecycle needs. In particular
/// there is no lookup-by-token: stored digests are salted, so the
/// plaintext cannot serve as a key.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;

    /// All records with `revoked = false` and `expires_at > now`.
    async fn select_active(&self, now: DateTime<Utc>)
        -> Result<Vec<RefreshTokenRecord>, AppError>;

    async fn select_all(&self) -> Result<Vec<RefreshTokenRecord>, AppError>;

    async fn mark_revoked(&self, record_id: Uuid) -> Result<(), AppError>;
}

/// State machine over refresh-token records.
///
/// A record is `Active` until its timestamp passes (`Expired`, derived, no
/// transition needed) or `revoked` flips to true (`Revoked`, terminal).
/// Every call re-reads the store, so horizontally scaled instances need no
/// in-memory coordination.
pub struct RefreshTokenLifecycle {
    store: Arc<dyn SessionStore>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    lifetime: Duration,
}

impl RefreshTokenLifecycle {
    pub fn new(store: Arc<dyn SessionStore>, hasher: PasswordHasher, lifetime_days: i64) -> Self {
        Self {
            store,
            hasher,
            issuer: TokenIssuer::new(),
            lifetime: Duration::days(lifetime_days),
        }
    }

    /// Generate a fresh token, persist its hash, and hand the plaintext
    /// back exactly once. The only way a record enters `Active`.
    ///
    /// Concurrent issues for one user all succeed; a user may hold any
    /// number of simultaneous sessions.
    pub async fn issue(&self, user_id: Uuid) -> Result<String, AppError> {
        let plaintext = self.issuer.issue();
        let token_hash = self.hasher.hash(&plaintext).await?;
        let record = RefreshTokenRecord::new(user_id, token_hash, self.lifetime);
        self.store.insert(&record).await?;
        debug!(user_id = %user_id, record_id = %record.id, "issued refresh token");
        Ok(plaintext)
    }

    /// Resolve a presented plaintext to its owning user, or reject.
    ///
    /// Salted storage rules out a keyed lookup, so this walks the active
    /// set and tests each digest in sequence. The scan is linear in the
    /// number of live sessions; that cost is the price of digests that
    /// resist offline dictionary attack if the table leaks.
    pub async fn verify(&self, plaintext: &str) -> Result<Uuid, AppError> {
        let now = Utc::now();
        for record in self.store.select_active(now).await? {
            if self.hasher.verify(&record.token_hash, plaintext).await? {
                return Ok(record.user_id);
            }
        }
        Err(AuthError::InvalidCredentials.into())
    }

    /// Terminally revoke the record matching a presented plaintext.
    ///
    /// An unmatched token is a silent no-op: reporting the miss would
    /// confirm to a caller which tokens exist. Either way the caller
    /// observes success, so the call is idempotent.
    pub async fn revoke(&self, plaintext: &str) -> Result<(), AppError> {
        for record in self.store.select_all().await? {
            if record.revoked {
                continue;
            }
            if self.hasher.verify(&record.token_hash, plaintext).await? {
                self.store.mark_revoked(record.id).await?;
                debug!(record_id = %record.id, "revoked refresh token");
                return Ok(());
            }
        }
        Ok(())
    }
}
