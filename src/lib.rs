pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod scores;

use std::sync::Arc;
use std::time::Duration;

use actix_web::HttpResponse;

pub use config::Settings;
pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;

pub use auth::{AuthService, RateLimitConfig, RateLimiter};
pub use db::{DbOperations, RefreshTokenRecord, ScoreRecord, User};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db: Arc<DbOperations>,
    pub auth: Arc<AuthService>,
    pub login_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let db = Arc::new(
            DbOperations::new_with_options(
                &config.database.url,
                config.database.max_connections,
                Duration::from_secs(5),
            )
            .await?,
        );

        let auth = Arc::new(AuthService::new(db.clone(), config.auth.clone()));
        let login_limiter = Arc::new(RateLimiter::new(RateLimitConfig::default()));

        Ok(Self {
            config: Arc::new(config),
            db,
            auth,
            login_limiter,
        })
    }
}
