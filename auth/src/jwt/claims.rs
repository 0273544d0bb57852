use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Session token claims.
///
/// All instants are Unix timestamps in seconds (RFC 7519 NumericDate).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (stable credential identifier)
    pub sub: String,

    /// Issued at
    pub iat: i64,

    /// Expiration time
    pub exp: i64,

    /// Instant of the password login that started this session.
    /// Carried unchanged through every renewal.
    pub auth_time: i64,
}

impl Claims {
    /// Create claims for a fresh login at `now`.
    ///
    /// # Arguments
    /// * `subject` - Credential identifier the token is bound to
    /// * `now` - Issuance instant
    /// * `ttl` - Lifetime of the token
    pub fn for_subject(subject: impl ToString, now: DateTime<Utc>, ttl: Duration) -> Self {
        let iat = now.timestamp();

        Self {
            sub: subject.to_string(),
            iat,
            exp: iat + ttl.num_seconds(),
            auth_time: iat,
        }
    }

    /// Claims for a replacement token: same subject and login instant,
    /// fresh issuance and expiry.
    pub fn renewed(&self, now: DateTime<Utc>, exp: i64) -> Self {
        Self {
            sub: self.sub.clone(),
            iat: now.timestamp(),
            exp,
            auth_time: self.auth_time,
        }
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.iat, 0).unwrap_or_default()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }

    /// Seconds left until expiry; zero or negative once expired.
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        self.exp - now.timestamp()
    }

    /// A token is valid strictly before `exp`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.seconds_remaining(now) <= 0
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_for_subject() {
        let claims = Claims::for_subject("user123", noon(), Duration::minutes(15));

        assert_eq!(claims.sub, "user123");
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert_eq!(claims.auth_time, claims.iat);
        assert_eq!(claims.expires_at(), noon() + Duration::minutes(15));
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::for_subject("user123", noon(), Duration::seconds(10));

        assert!(!claims.is_expired(noon() + Duration::seconds(9)));
        assert!(claims.is_expired(noon() + Duration::seconds(10))); // Exactly at expiration
        assert!(claims.is_expired(noon() + Duration::seconds(11)));
    }

    #[test]
    fn test_renewed_keeps_subject_and_auth_time() {
        let claims = Claims::for_subject("user123", noon(), Duration::minutes(15));
        let later = noon() + Duration::minutes(11);

        let renewed = claims.renewed(later, later.timestamp() + 900);

        assert_eq!(renewed.sub, claims.sub);
        assert_eq!(renewed.auth_time, claims.auth_time);
        assert_eq!(renewed.iat, later.timestamp());
        assert!(renewed.exp > claims.exp);
    }
}
