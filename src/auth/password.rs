use crate::error::AppError;
use tokio::task;

/// One-way adaptive hashing for passwords and refresh tokens.
///
/// Bcrypt digests are self-describing (algorithm tag, cost and salt are
/// embedded), so verification needs no side channel. The same primitive
/// covers both credential kinds; cost is fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a secret on the blocking pool. Bcrypt at production cost takes
    /// hundreds of milliseconds; it must not stall the async runtime.
    pub async fn hash(&self, secret: &str) -> Result<String, AppError> {
        let cost = self.cost;
        let secret = secret.to_owned();
        task::spawn_blocking(move || bcrypt::hash(secret, cost))
            .await
            .map_err(|e| AppError::InternalError(format!("hash task failed: {}", e)))?
            .map_err(AppError::from)
    }

    /// Recompute with the digest's embedded parameters and compare in
    /// constant time. A malformed digest does not verify; it is never an
    /// error.
    pub async fn verify(&self, digest: &str, secret: &str) -> Result<bool, AppError> {
        let digest = digest.to_owned();
        let secret = secret.to_owned();
        let outcome = task::spawn_blocking(move || bcrypt::verify(secret, &digest))
            .await
            .map_err(|e| AppError::InternalError(format!("verify task failed: {}", e)))?;
        Ok(outcome.unwrap_or(false))
    }
}
