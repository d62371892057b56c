//! Authentication module for the Wavefall server
//!
//! Covers password hashing, refresh-token issuance and revocation,
//! access-token minting, and login brute-force limiting.

pub mod handlers;
mod password;
mod rate_limit;
mod service;
mod session;
mod token;

pub use password::PasswordHasher;
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use service::{AuthService, Claims, TokenPair};
pub use session::{RefreshTokenLifecycle, SessionStore};
pub use token::{TokenIssuer, TOKEN_BYTES, TOKEN_ENCODED_LEN};
