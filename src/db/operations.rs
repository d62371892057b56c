use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::SessionStore;
use crate::db::models::{RefreshTokenRecord, ScoreRecord, User};
use crate::error::{AppError, DatabaseError};
use crate::scores::GameMode;

pub struct DbOperations {
    pool: Arc<PgPool>,
}

impl DbOperations {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub async fn new_with_options(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub async fn create_user(&self, user: &User) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, display_name, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, display_name, password_hash, created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::DatabaseError(DatabaseError::Duplicate)
            }
            other => other.into(),
        })?;

        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, display_name, password_hash, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, display_name, password_hash, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    pub async fn insert_score(&self, record: &ScoreRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO scores
                (id, user_id, mode, score, wave_reached, duration_ms, seed, client_version, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(record.mode.as_str())
        .bind(record.score)
        .bind(record.wave_reached)
        .bind(record.duration_ms)
        .bind(&record.seed)
        .bind(&record.client_version)
        .bind(record.created_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    pub async fn top_scores(
        &self,
        mode: Option<GameMode>,
        limit: i64,
    ) -> Result<Vec<ScoreRecord>, AppError> {
        let rows = match mode {
            Some(mode) => {
                sqlx::query_as::<_, ScoreRow>(
                    "SELECT id, user_id, mode, score, wave_reached, duration_ms, seed, client_version, created_at
                     FROM scores WHERE mode = $1
                     ORDER BY score DESC, created_at ASC
                     LIMIT $2",
                )
                .bind(mode.as_str())
                .bind(limit)
                .fetch_all(self.pool.as_ref())
                .await?
            }
            None => {
                sqlx::query_as::<_, ScoreRow>(
                    "SELECT id, user_id, mode, score, wave_reached, duration_ms, seed, client_version, created_at
                     FROM scores
                     ORDER BY score DESC, created_at ASC
                     LIMIT $1",
                )
                .bind(limit)
                .fetch_all(self.pool.as_ref())
                .await?
            }
        };

        rows.into_iter().map(ScoreRecord::try_from).collect()
    }
}

// The four query shapes the token lifecycle needs, and no others.
#[async_trait]
impl SessionStore for DbOperations {
    async fn insert(&self, record: &RefreshTokenRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at, revoked, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id)
        .bind(record.user_id)
        .bind(&record.token_hash)
        .bind(record.expires_at)
        .bind(record.revoked)
        .bind(record.created_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn select_active(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshTokenRecord>, AppError> {
        let records = sqlx::query_as::<_, RefreshTokenRecord>(
            "SELECT id, user_id, token_hash, expires_at, revoked, created_at
             FROM refresh_tokens WHERE revoked = FALSE AND expires_at > $1",
        )
        .bind(now)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(records)
    }

    async fn select_all(&self) -> Result<Vec<RefreshTokenRecord>, AppError> {
        let records = sqlx::query_as::<_, RefreshTokenRecord>(
            "SELECT id, user_id, token_hash, expires_at, revoked, created_at
             FROM refresh_tokens",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(records)
    }

    async fn mark_revoked(&self, record_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = $1")
            .bind(record_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}

// Mode is stored as text; decoding back into the enum happens here so a
// corrupt row surfaces as a query error instead of a panic.
#[derive(sqlx::FromRow)]
struct ScoreRow {
    id: Uuid,
    user_id: Option<Uuid>,
    mode: String,
    score: i64,
    wave_reached: i32,
    duration_ms: i64,
    seed: String,
    client_version: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ScoreRow> for ScoreRecord {
    type Error = AppError;

    fn try_from(row: ScoreRow) -> Result<Self, Self::Error> {
        let mode = GameMode::from_str(&row.mode).map_err(|_| {
            AppError::DatabaseError(DatabaseError::QueryError(format!(
                "unrecognized mode '{}' in scores row {}",
                row.mode, row.id
            )))
        })?;

        Ok(ScoreRecord {
            id: row.id,
            user_id: row.user_id,
            mode,
            score: row.score,
            wave_reached: row.wave_reached,
            duration_ms: row.duration_ms,
            seed: row.seed,
            client_version: row.client_version,
            created_at: row.created_at,
        })
    }
}
