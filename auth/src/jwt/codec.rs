use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;
use crate::clock::Clock;
use crate::clock::SystemClock;

/// Encoded token together with the claims it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

impl IssuedToken {
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.claims.expires_at()
    }
}

/// Signs and verifies session tokens.
///
/// Uses HS256 (HMAC with SHA-256) over a process-wide secret. Expiry is judged
/// against the injected clock rather than the library's own wall-clock check,
/// so signature failures and staleness come back as distinct variants.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a new codec with a secret key and the system clock.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Rotating the secret invalidates every outstanding token
    pub fn new(secret: &[u8]) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    /// Create a codec reading time from `clock`.
    pub fn with_clock(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        let algorithm = Algorithm::HS256;

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            validation,
            clock,
        }
    }

    /// Current instant according to the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Issue a token for `subject` expiring `ttl` from now.
    ///
    /// # Errors
    /// * `EmptySubject` - Subject is empty
    /// * `InvalidTtl` - Lifetime shorter than one second
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<IssuedToken, JwtError> {
        self.issue_at(subject, ttl, self.now())
    }

    /// Issue a token as of an explicit instant.
    pub fn issue_at(
        &self,
        subject: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        if subject.is_empty() {
            return Err(JwtError::EmptySubject);
        }
        if ttl.num_seconds() < 1 {
            return Err(JwtError::InvalidTtl(ttl.num_seconds()));
        }

        self.encode(Claims::for_subject(subject, now, ttl))
    }

    /// Sign already-built claims.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: Claims) -> Result<IssuedToken, JwtError> {
        let header = Header::new(self.algorithm);

        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))?;

        Ok(IssuedToken { token, claims })
    }

    /// Verify and decode a token against the current instant.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature does not verify, or the token is malformed
    /// * `ExpiredToken` - Signature is good but `exp` has passed
    pub fn parse(&self, token: &str) -> Result<Claims, JwtError> {
        self.parse_at(token, self.now())
    }

    /// Verify and decode a token as of an explicit instant.
    pub fn parse_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        // Signature and structure only; expiry is judged against `now` below.
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

        let claims = token_data.claims;

        if claims.sub.is_empty() {
            return Err(JwtError::InvalidToken("empty subject".to_string()));
        }
        if claims.is_expired(now) {
            return Err(JwtError::ExpiredToken);
        }

        Ok(claims)
    }
}
