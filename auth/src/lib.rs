//! Session authentication primitives
//!
//! Provides the stateless building blocks for credential login and
//! sliding-expiration sessions:
//! - Password hashing (Argon2id)
//! - Session token issuance and verification (HS256 JWT)
//! - Session guard with automatic renewal near expiry
//!
//! Services own their credential storage and adapt these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::TokenCodec;
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let issued = codec.issue("user123", Duration::minutes(15)).unwrap();
//! let claims = codec.parse(&issued.token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```
//!
//! ## Guarding Requests
//! ```
//! use std::sync::Arc;
//!
//! use auth::{SessionGuard, SessionPolicy, TokenCodec};
//!
//! let codec = Arc::new(TokenCodec::new(b"secret_key_at_least_32_bytes_long!"));
//! let guard = SessionGuard::new(codec.clone(), SessionPolicy::default());
//!
//! let issued = codec.issue("user123", guard.policy().ttl()).unwrap();
//! let authorization = guard.authorize(Some(&issued.token)).unwrap();
//! assert_eq!(authorization.subject, "user123");
//! assert!(authorization.renewed.is_none());
//! ```

pub mod clock;
pub mod jwt;
pub mod password;
pub mod session;

// Re-export commonly used items
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::TokenCodec;
pub use password::HashCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use session::Authorization;
pub use session::PolicyError;
pub use session::SessionError;
pub use session::SessionGuard;
pub use session::SessionPolicy;
