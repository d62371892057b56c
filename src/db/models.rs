use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::scores::{GameMode, ScoreClaim};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    // One-way bcrypt digest; the plaintext password is never stored.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, password_hash: String, display_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            display_name,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Server-side half of a refresh token. `token_hash` is the bcrypt digest
/// of the plaintext handed to the client; the plaintext itself is never
/// persisted or logged.
///
/// `revoked` only ever flips false to true. Rows are not deleted here;
/// pruning expired and revoked rows is external housekeeping.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshTokenRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    pub fn new(user_id: Uuid, token_hash: String, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            expires_at: now + lifetime,
            revoked: false,
            created_at: now,
        }
    }

    /// A record authenticates a session iff it is neither revoked nor past
    /// expiry. Expiry is purely a timestamp comparison; there is no sweep.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && now < self.expires_at
    }
}

/// An accepted score claim, immutable once written. Only claims that pass
/// the integrity validator become records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: Uuid,
    // None for anonymous submissions.
    pub user_id: Option<Uuid>,
    pub mode: GameMode,
    pub score: i64,
    pub wave_reached: i32,
    pub duration_ms: i64,
    pub seed: String,
    pub client_version: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ScoreRecord {
    /// Build the persistent record for a claim that passed validation.
    /// The validator's bounds keep the numeric narrowing lossless.
    pub fn from_claim(claim: &ScoreClaim) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: claim.user_id,
            mode: claim.mode,
            score: claim.score as i64,
            wave_reached: claim.wave_reached as i32,
            duration_ms: claim.duration_ms as i64,
            seed: claim.seed.clone(),
            client_version: claim.client_version.clone(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_usable() {
        let record = RefreshTokenRecord::new(Uuid::new_v4(), "digest".into(), Duration::days(7));
        assert!(record.is_usable(Utc::now()));
        assert!(!record.revoked);
    }

    #[test]
    fn test_expired_record_is_not_usable() {
        let mut record =
            RefreshTokenRecord::new(Uuid::new_v4(), "digest".into(), Duration::days(7));
        record.expires_at = Utc::now() - Duration::seconds(1);
        assert!(!record.is_usable(Utc::now()));
    }

    #[test]
    fn test_revoked_record_is_not_usable() {
        let mut record =
            RefreshTokenRecord::new(Uuid::new_v4(), "digest".into(), Duration::days(7));
        record.revoked = true;
        assert!(!record.is_usable(Utc::now()));
    }
}
