use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

use super::errors::SessionError;
use super::policy::SessionPolicy;
use crate::jwt::Claims;
use crate::jwt::IssuedToken;
use crate::jwt::TokenCodec;

/// Outcome of an admitted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    /// Subject the presented token is bound to
    pub subject: String,
    /// Verified claims of the presented token
    pub claims: Claims,
    /// Replacement token, present when the presented one was inside the renewal window
    pub renewed: Option<IssuedToken>,
}

/// Gate for protected requests.
///
/// Verifies a presented bearer token and, when it is close to expiry, mints a
/// replacement for the same subject. The presented token is never revoked; the
/// replacement is advisory and the client may keep using the old one until it
/// runs out.
pub struct SessionGuard {
    codec: Arc<TokenCodec>,
    policy: SessionPolicy,
}

impl SessionGuard {
    pub fn new(codec: Arc<TokenCodec>, policy: SessionPolicy) -> Self {
        Self { codec, policy }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Decide on a presented token.
    ///
    /// # Arguments
    /// * `token` - Bearer token, `None` when the request carried none
    ///
    /// # Returns
    /// Subject, claims, and an optional renewed token
    ///
    /// # Errors
    /// * `Unauthenticated` - No token presented
    /// * `InvalidToken` - Signature or structure does not verify
    /// * `ExpiredToken` - Token verified but its expiry has passed
    pub fn authorize(&self, token: Option<&str>) -> Result<Authorization, SessionError> {
        let token = token.ok_or(SessionError::Unauthenticated)?;

        // One instant for both the expiry check and any renewal.
        let now = self.codec.now();
        let claims = self.codec.parse_at(token, now)?;

        let renewed = if self.policy.renewal_due(&claims, now) {
            self.renew(&claims, now)
        } else {
            None
        };

        Ok(Authorization {
            subject: claims.sub.clone(),
            claims,
            renewed,
        })
    }

    fn renew(&self, claims: &Claims, now: DateTime<Utc>) -> Option<IssuedToken> {
        let Some(exp) = self.policy.renewed_expiry(claims, now) else {
            tracing::debug!(
                subject = %claims.sub,
                auth_time = claims.auth_time,
                "Session reached its maximum lifetime, not renewing"
            );
            return None;
        };

        match self.codec.encode(claims.renewed(now, exp)) {
            Ok(issued) => {
                tracing::debug!(
                    subject = %claims.sub,
                    previous_exp = claims.exp,
                    renewed_exp = issued.claims.exp,
                    "Session token renewed"
                );
                Some(issued)
            }
            Err(e) => {
                tracing::warn!(subject = %claims.sub, error = %e, "Session token renewal failed");
                None
            }
        }
    }
}
