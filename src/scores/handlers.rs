use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::{info, warn};

use crate::auth::handlers::bearer_token;
use crate::db::models::ScoreRecord;
use crate::error::AppError;
use crate::scores::{validate_claim, GameMode, ScoreClaim};
use crate::AppState;

/// Accept or refuse a claimed game-session outcome.
///
/// Anonymous submissions are allowed; a bearer access token, when present,
/// attributes the score to its user. A token that is present but invalid
/// fails the request rather than silently degrading to anonymous.
pub async fn submit_score(
    req: HttpRequest,
    claim: web::Json<ScoreClaim>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let mut claim = claim.into_inner();

    claim.user_id = match bearer_token(&req) {
        Some(token) => Some(state.auth.validate_access_token(token)?),
        None => None,
    };

    if let Err(rejection) = validate_claim(&claim) {
        warn!(
            reason = rejection.reason_code(),
            mode = claim.mode.as_str(),
            wave_reached = claim.wave_reached,
            "rejected score claim"
        );
        return Err(rejection.into());
    }

    let record = ScoreRecord::from_claim(&claim);
    state.db.insert_score(&record).await?;

    info!(
        score_id = %record.id,
        mode = record.mode.as_str(),
        score = record.score,
        "accepted score"
    );
    Ok(HttpResponse::Created().json(record))
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub mode: Option<GameMode>,
    pub limit: Option<i64>,
}

pub async fn leaderboard(
    query: web::Query<LeaderboardQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let scores = state.db.top_scores(query.mode, limit).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "scores": scores })))
}
