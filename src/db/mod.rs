//! Database module for the Wavefall server
//!
//! Models and the Postgres data access layer, including the
//! `SessionStore` implementation backing the token lifecycle.

pub mod models;
pub mod operations;

pub use models::{RefreshTokenRecord, ScoreRecord, User};
pub use operations::DbOperations;
