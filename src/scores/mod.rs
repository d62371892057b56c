//! Score submission and leaderboard module
//!
//! Claims pass through the integrity validator before anything touches
//! the scores table.

pub mod handlers;
mod validator;

pub use validator::{
    validate_claim, GameMode, ScoreClaim, MAX_DURATION_MS, MAX_SCORE, MAX_SCORE_PER_WAVE,
    MAX_SEED_LEN, MAX_WAVE, MIN_WAVE, MIN_WAVE_DURATION_MS,
};
