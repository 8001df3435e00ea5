//! Client-side rate limiting
//!
//! Token bucket shared by all calls made through one client. Waiting for a
//! token happens inside `acquire`; the caller races it against its
//! cancellation token.

use std::time::{Duration, Instant};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::sync::Mutex;
use tracing::debug;

/// Gate consulted before every dispatch
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Wait until one request may be sent
    async fn acquire(&self);
}

/// Token bucket state
#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(max_tokens: f64, now: Instant) -> Self {
        Self {
            tokens: max_tokens,
            last_update: now,
        }
    }

    /// Try to consume a token, returning how long to wait if none is available
    fn try_consume(
        &mut self,
        now: Instant,
        tokens_per_second: f64,
        max_tokens: f64,
    ) -> Result<(), Duration> {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();

        self.tokens = elapsed
            .mul_add(tokens_per_second, self.tokens)
            .min(max_tokens);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            Err(Duration::from_secs_f64(
                (1.0 - self.tokens) / tokens_per_second,
            ))
        }
    }
}

/// Token bucket limiter allowing `requests_per_second` with an equal burst
#[derive(Debug)]
pub struct TokenBucketLimiter {
    bucket: Mutex<TokenBucket>,
    tokens_per_second: f64,
    max_tokens: f64,
}

impl TokenBucketLimiter {
    /// Create a limiter; a rate of 0 is treated as 1 request per second
    #[must_use]
    pub fn new(requests_per_second: u32) -> Self {
        let max_tokens = f64::from(requests_per_second.max(1));
        Self {
            bucket: Mutex::new(TokenBucket::new(max_tokens, Instant::now())),
            tokens_per_second: max_tokens,
            max_tokens,
        }
    }
}

#[async_trait]
impl RateLimiter for TokenBucketLimiter {
    async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                match bucket.try_consume(Instant::now(), self.tokens_per_second, self.max_tokens) {
                    Ok(()) => return,
                    Err(wait) => wait,
                }
            };

            debug!(wait_ms = wait.as_millis(), "Rate limited, waiting for token");
            tokio::time::sleep(wait).await;
        }
    }
}
