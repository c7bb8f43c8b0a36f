//! Per-client rate limiting for the auth endpoints.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter as GovernorRateLimiter};

type KeyedRateLimiter = GovernorRateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window, per key.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(60),
        }
    }
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub retry_after: Duration,
}

/// Keyed GCRA rate limiter (one bucket per client IP).
///
/// Limits are per-process, not distributed across instances.
pub struct IpRateLimiter {
    limiter: KeyedRateLimiter,
    clock: DefaultClock,
}

impl IpRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let max = NonZeroU32::new(config.max_requests.max(1)).expect("non-zero after clamp");
        // A zero window would make the quota period zero, which governor
        // rejects. Clamp it like max_requests.
        let window = config.window.max(Duration::from_secs(1));
        let quota = Quota::with_period(window / max.get())
            .expect("valid quota")
            .allow_burst(max);

        Self {
            limiter: GovernorRateLimiter::keyed(quota),
            clock: DefaultClock::default(),
        }
    }

    pub fn from_env() -> Self {
        let defaults = RateLimitConfig::default();
        let config = RateLimitConfig {
            max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_requests),
            window: Duration::from_secs(
                std::env::var("RATE_LIMIT_WINDOW_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.window.as_secs()),
            ),
        };
        Self::new(config)
    }

    /// Check and consume one unit of quota for `key`.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        match self.limiter.check_key(&key.to_string()) {
            Ok(_) => RateLimitDecision {
                allowed: true,
                retry_after: Duration::ZERO,
            },
            Err(not_until) => RateLimitDecision {
                allowed: false,
                retry_after: not_until.wait_time_from(self.clock.now()),
            },
        }
    }
}
