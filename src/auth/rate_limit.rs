use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use chrono::{DateTime, Utc, Duration};

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window_size: Duration,
    pub max_attempts: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_size: Duration::minutes(1),
            max_attempts: 10, // login attempts per window per identity
        }
    }
}

#[derive(Debug)]
struct RequestWindow {
    timestamps: Vec<DateTime<Utc>>,
}

impl RequestWindow {
    fn new() -> Self {
        Self {
            timestamps: Vec::new(),
        }
    }

    fn cleanup_old_requests(&mut self, window_size: Duration) {
        let cutoff = Utc::now() - window_size;
        self.timestamps.retain(|ts| *ts > cutoff);
    }

    fn add_request(&mut self) {
        self.timestamps.push(Utc::now());
    }

    fn request_count(&self) -> usize {
        self.timestamps.len()
    }
}

/// Windowed brute-force limiter for credential endpoints, keyed by the
/// claimed identity (email). In-memory only; per-instance counting is
/// acceptable for a first line of defense.
pub struct RateLimiter {
    windows: Arc<RwLock<HashMap<String, RequestWindow>>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    pub async fn check_rate_limit(&self, key: &str) -> bool {
        let mut windows = self.windows.write().await;

        let window = windows
            .entry(key.to_string())
            .or_insert_with(RequestWindow::new);

        window.cleanup_old_requests(self.config.window_size);

        if window.request_count() < self.config.max_attempts as usize {
            window.add_request();
            true
        } else {
            false
        }
    }

    pub async fn cleanup(&self) {
        let mut windows = self.windows.write().await;

        // Remove windows with no recent requests
        windows.retain(|_, window| {
            window.cleanup_old_requests(self.config.window_size);
            !window.timestamps.is_empty()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{sleep, Duration as TokioDuration};

    #[tokio::test]
    async fn test_rate_limiter() {
        let mut config = RateLimitConfig::default();
        // Use a shorter window for testing
        config.window_size = Duration::seconds(1);
        let limiter = RateLimiter::new(config);

        // Should allow attempts up to limit
        for _ in 0..10 {
            assert!(limiter.check_rate_limit("player@example.com").await);
        }

        // Should deny attempts over limit
        assert!(!limiter.check_rate_limit("player@example.com").await);

        // A different identity is unaffected
        assert!(limiter.check_rate_limit("other@example.com").await);

        // Wait for window to pass
        sleep(TokioDuration::from_millis(1100)).await;

        // Should allow attempts again
        assert!(limiter.check_rate_limit("player@example.com").await);
    }

    #[tokio::test]
    async fn test_cleanup_bounds_unique_key_spam() {
        let mut config = RateLimitConfig::default();
        config.window_size = Duration::milliseconds(50);
        let limiter = RateLimiter::new(config);

        // One attempt each from many distinct identities leaves one entry
        // per key behind.
        for i in 0..500 {
            assert!(limiter.check_rate_limit(&format!("spam-{}@example.com", i)).await);
        }
        assert_eq!(limiter.windows.read().await.len(), 500);

        // Once their windows lapse, cleanup reclaims every entry.
        sleep(TokioDuration::from_millis(100)).await;
        limiter.cleanup().await;
        assert!(limiter.windows.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_drops_idle_windows() {
        let mut config = RateLimitConfig::default();
        config.window_size = Duration::milliseconds(50);
        let limiter = RateLimiter::new(config);

        assert!(limiter.check_rate_limit("idle@example.com").await);
        sleep(TokioDuration::from_millis(100)).await;
        limiter.cleanup().await;

        assert!(limiter.windows.read().await.is_empty());
    }
}
