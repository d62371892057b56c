use thiserror::Error;
use actix_web::{ResponseError, HttpResponse, http::StatusCode};
use serde_json::json;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    AuthError(#[from] AuthError),

    #[error("Score rejected: {0}")]
    ScoreRejected(#[from] ScoreRejection),

    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::DatabaseError(DatabaseError::NotFound),
            _ => AppError::DatabaseError(DatabaseError::QueryError(err.to_string())),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

// Only reached for genuine infrastructure faults; the hasher maps malformed
// digests to a clean non-match before this conversion ever runs.
impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AppError::InternalError(format!("hashing failure: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::AuthError(AuthError::TokenExpired)
            }
            _ => AppError::AuthError(AuthError::InvalidToken),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let response = match self {
            // Structured refusal: callers get a machine-readable reason code
            // alongside the message.
            AppError::ScoreRejected(rejection) => json!({
                "error": {
                    "status": status.as_u16(),
                    "reason": rejection.reason_code(),
                    "message": rejection.to_string()
                }
            }),
            _ => json!({
                "error": {
                    "status": status.as_u16(),
                    "message": self.to_string()
                }
            }),
        };
        HttpResponse::build(status).json(response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthError(e) => match e {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
                AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::Unauthorized => StatusCode::FORBIDDEN,
                AuthError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                AuthError::EmailTaken => StatusCode::CONFLICT,
            },
            AppError::ScoreRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DatabaseError(DatabaseError::NotFound) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Rate limited")]
    RateLimited,

    #[error("Email already registered")]
    EmailTaken,
}

/// Why a score claim was refused before persistence. A refused claim is
/// surfaced to the caller and nothing is written to the leaderboard.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreRejection {
    #[error("structurally invalid claim: {0}")]
    StructuralInvalid(String),

    #[error("{duration_ms}ms is below the {floor_ms}ms floor for wave {wave_reached}")]
    ImplausibleDuration {
        wave_reached: u32,
        duration_ms: u64,
        floor_ms: u64,
    },

    #[error("{score} points exceeds the {ceiling} ceiling for wave {wave_reached}")]
    ImplausibleScoreRate {
        wave_reached: u32,
        score: u64,
        ceiling: u64,
    },
}

impl ScoreRejection {
    pub fn reason_code(&self) -> &'static str {
        match self {
            ScoreRejection::StructuralInvalid(_) => "structural_invalid",
            ScoreRejection::ImplausibleDuration { .. } => "implausible_duration",
            ScoreRejection::ImplausibleScoreRate { .. } => "implausible_score_rate",
        }
    }
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate record")]
    Duplicate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::InternalError(_)));

        let config_err = config::ConfigError::NotFound(String::from("key not found"));
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::ConfigError(_)));

        let db_err = sqlx::Error::RowNotFound;
        let app_err: AppError = db_err.into();
        assert!(matches!(app_err, AppError::DatabaseError(DatabaseError::NotFound)));
    }

    #[test]
    fn test_error_status_codes() {
        let err = AppError::AuthError(AuthError::InvalidCredentials);
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err = AppError::AuthError(AuthError::EmailTaken);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err = AppError::ScoreRejected(ScoreRejection::StructuralInvalid("wave".into()));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = AppError::ValidationError("invalid input".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = AppError::DatabaseError(DatabaseError::NotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_rejection_reason_codes() {
        let r = ScoreRejection::ImplausibleDuration {
            wave_reached: 10,
            duration_ms: 30_000,
            floor_ms: 50_000,
        };
        assert_eq!(r.reason_code(), "implausible_duration");

        let r = ScoreRejection::ImplausibleScoreRate {
            wave_reached: 5,
            score: 60_000,
            ceiling: 50_000,
        };
        assert_eq!(r.reason_code(), "implausible_score_rate");

        assert_eq!(
            ScoreRejection::StructuralInvalid("seed".into()).reason_code(),
            "structural_invalid"
        );
    }
}
