use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::errors::PolicyError;
use crate::jwt::Claims;

/// Timing rules for sliding-expiration sessions.
///
/// The renewal window is always strictly shorter than the ttl, which is what
/// makes a renewed token outlive the one it replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    ttl: Duration,
    renewal_window: Duration,
    max_lifetime: Option<Duration>,
}

impl SessionPolicy {
    pub const DEFAULT_TTL_MINUTES: i64 = 15;
    pub const DEFAULT_RENEWAL_WINDOW_MINUTES: i64 = 5;

    /// Build a policy.
    ///
    /// # Arguments
    /// * `ttl` - Lifetime of every issued token
    /// * `renewal_window` - Trailing span before expiry in which use triggers renewal
    /// * `max_lifetime` - Optional cap on the whole session, measured from login
    ///
    /// # Errors
    /// * `NonPositiveTtl` - ttl shorter than one second
    /// * `NegativeRenewalWindow` - window below zero
    /// * `WindowNotShorterThanTtl` - window >= ttl
    /// * `LifetimeShorterThanTtl` - cap below a single ttl
    pub fn new(
        ttl: Duration,
        renewal_window: Duration,
        max_lifetime: Option<Duration>,
    ) -> Result<Self, PolicyError> {
        let ttl_secs = ttl.num_seconds();
        let window_secs = renewal_window.num_seconds();

        if ttl_secs < 1 {
            return Err(PolicyError::NonPositiveTtl(ttl_secs));
        }
        if window_secs < 0 {
            return Err(PolicyError::NegativeRenewalWindow(window_secs));
        }
        if window_secs >= ttl_secs {
            return Err(PolicyError::WindowNotShorterThanTtl {
                window: window_secs,
                ttl: ttl_secs,
            });
        }
        if let Some(max) = max_lifetime {
            if max.num_seconds() < ttl_secs {
                return Err(PolicyError::LifetimeShorterThanTtl {
                    max: max.num_seconds(),
                    ttl: ttl_secs,
                });
            }
        }

        Ok(Self {
            ttl,
            renewal_window,
            max_lifetime,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn renewal_window(&self) -> Duration {
        self.renewal_window
    }

    pub fn max_lifetime(&self) -> Option<Duration> {
        self.max_lifetime
    }

    /// Whether a still-valid token has entered the renewal window.
    pub fn renewal_due(&self, claims: &Claims, now: DateTime<Utc>) -> bool {
        let remaining = claims.seconds_remaining(now);
        remaining > 0 && remaining <= self.renewal_window.num_seconds()
    }

    /// Expiry for a replacement token, or `None` when the session cap leaves
    /// no room to extend past the current expiry.
    pub fn renewed_expiry(&self, claims: &Claims, now: DateTime<Utc>) -> Option<i64> {
        let mut exp = now.timestamp() + self.ttl.num_seconds();

        if let Some(max) = self.max_lifetime {
            exp = exp.min(claims.auth_time + max.num_seconds());
        }

        (exp > claims.exp).then_some(exp)
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(Self::DEFAULT_TTL_MINUTES),
            renewal_window: Duration::minutes(Self::DEFAULT_RENEWAL_WINDOW_MINUTES),
            max_lifetime: None,
        }
    }
}
