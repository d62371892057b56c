use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ScoreRejection;

/// Wave bounds a claim may report.
pub const MIN_WAVE: u32 = 1;
pub const MAX_WAVE: u32 = 100;

/// Absolute score cap accepted by the backend.
pub const MAX_SCORE: u64 = 1_000_000;

/// Upper bound on the opaque seed string.
pub const MAX_SEED_LEN: usize = 128;

/// Longest session the backend will record: 24 hours. Also keeps the
/// persisted millisecond count comfortably inside a signed 64-bit column.
pub const MAX_DURATION_MS: u64 = 86_400_000;

/// Minimum wall-clock time to clear one wave. A claim faster than this
/// floor is physically impossible regardless of score.
pub const MIN_WAVE_DURATION_MS: u64 = 5_000;

/// Maximum point yield a single wave can produce under the game design.
pub const MAX_SCORE_PER_WAVE: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Normal,
    Hard,
    Endless,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Normal => "normal",
            GameMode::Hard => "hard",
            GameMode::Endless => "endless",
        }
    }
}

impl std::str::FromStr for GameMode {
    type Err = ScoreRejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(GameMode::Normal),
            "hard" => Ok(GameMode::Hard),
            "endless" => Ok(GameMode::Endless),
            other => Err(ScoreRejection::StructuralInvalid(format!(
                "unknown mode '{}'",
                other
            ))),
        }
    }
}

/// A client-asserted game-session outcome, constructed per request and
/// either persisted as a `ScoreRecord` or discarded.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreClaim {
    pub mode: GameMode,
    pub wave_reached: u32,
    pub duration_ms: u64,
    pub score: u64,
    pub seed: String,
    #[serde(default)]
    pub client_version: Option<String>,
    // Filled from the access token by the handler, never by the client;
    // None means anonymous.
    #[serde(skip)]
    pub user_id: Option<Uuid>,
}

/// Plausibility gate run before any claim reaches the leaderboard.
///
/// Pure and synchronous; safe to call concurrently without coordination.
/// This is deliberately a coarse, replay-free check: it cannot catch a bot
/// playing inside the physical envelope, only claims that are provably
/// impossible given elapsed time and per-wave scoring caps.
pub fn validate_claim(claim: &ScoreClaim) -> Result<(), ScoreRejection> {
    // Structural bounds first; no heuristic runs on a malformed claim.
    // Mode validity and non-negative duration/score are enforced by the
    // types, so only the numeric ranges and the seed remain to check.
    if claim.wave_reached < MIN_WAVE || claim.wave_reached > MAX_WAVE {
        return Err(ScoreRejection::StructuralInvalid(format!(
            "wave_reached {} outside [{}, {}]",
            claim.wave_reached, MIN_WAVE, MAX_WAVE
        )));
    }
    if claim.score > MAX_SCORE {
        return Err(ScoreRejection::StructuralInvalid(format!(
            "score {} exceeds maximum {}",
            claim.score, MAX_SCORE
        )));
    }
    if claim.duration_ms > MAX_DURATION_MS {
        return Err(ScoreRejection::StructuralInvalid(format!(
            "duration_ms {} exceeds maximum {}",
            claim.duration_ms, MAX_DURATION_MS
        )));
    }
    if claim.seed.is_empty() {
        return Err(ScoreRejection::StructuralInvalid("empty seed".into()));
    }
    if claim.seed.len() > MAX_SEED_LEN {
        return Err(ScoreRejection::StructuralInvalid(format!(
            "seed longer than {} bytes",
            MAX_SEED_LEN
        )));
    }

    // wave_reached is at most 100, so neither product can overflow.
    let floor_ms = u64::from(claim.wave_reached) * MIN_WAVE_DURATION_MS;
    if claim.duration_ms < floor_ms {
        return Err(ScoreRejection::ImplausibleDuration {
            wave_reached: claim.wave_reached,
            duration_ms: claim.duration_ms,
            floor_ms,
        });
    }

    let ceiling = u64::from(claim.wave_reached) * MAX_SCORE_PER_WAVE;
    if claim.score > ceiling {
        return Err(ScoreRejection::ImplausibleScoreRate {
            wave_reached: claim.wave_reached,
            score: claim.score,
            ceiling,
        });
    }

    Ok(())
}
