use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::credential::errors::CredentialIdError;
use crate::credential::errors::IdentifierError;
use crate::credential::errors::ValidationError;

/// Credential aggregate entity.
///
/// A registered login: normalized email plus Argon2 PHC hash. Never mutated
/// after registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: CredentialId,
    pub identifier: Identifier,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Stable credential identifier; session tokens are bound to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialId(pub Uuid);

impl CredentialId {
    /// Generate a new random credential ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a credential ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, CredentialIdError> {
        Uuid::parse_str(s)
            .map(CredentialId)
            .map_err(|e| CredentialIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for CredentialId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Login identifier value type
///
/// An email address, trimmed and lowercased so lookups are case-insensitive.
/// Validated with an RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Create a new normalized identifier.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Errors
    /// * `Empty` - Nothing left after trimming
    /// * `InvalidFormat` - Not a valid email address
    pub fn new(email: &str) -> Result<Self, IdentifierError> {
        let normalized = email.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(IdentifierError::Empty);
        }

        email_address::EmailAddress::from_str(&normalized)
            .map(|_| Identifier(normalized))
            .map_err(|e| IdentifierError::InvalidFormat(e.to_string()))
    }

    /// Get identifier as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext secret submitted by a client.
///
/// Debug output is redacted so the value never reaches logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// # Errors
    /// * `EmptyPassword` - Zero-length password
    pub fn new(password: String) -> Result<Self, ValidationError> {
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Command to register a new credential with domain types
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub identifier: Identifier,
    pub password: Password,
}

impl RegisterCommand {
    /// Validate raw input into a command.
    ///
    /// # Errors
    /// * `Identifier` - Empty or malformed email
    /// * `EmptyPassword` - Empty password
    pub fn new(email: &str, password: String) -> Result<Self, ValidationError> {
        Ok(Self {
            identifier: Identifier::new(email)?,
            password: Password::new(password)?,
        })
    }
}

/// Command to log in with domain types
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub identifier: Identifier,
    pub password: Password,
}

impl LoginCommand {
    /// # Errors
    /// * `Identifier` - Empty or malformed email
    /// * `EmptyPassword` - Empty password
    pub fn new(email: &str, password: String) -> Result<Self, ValidationError> {
        Ok(Self {
            identifier: Identifier::new(email)?,
            password: Password::new(password)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_is_normalized() {
        let identifier = Identifier::new("  A@X.com ").unwrap();
        assert_eq!(identifier.as_str(), "a@x.com");
    }

    #[test]
    fn test_identifier_rejects_empty() {
        assert_eq!(Identifier::new("   "), Err(IdentifierError::Empty));
    }

    #[test]
    fn test_identifier_rejects_malformed_email() {
        assert!(matches!(
            Identifier::new("not-an-email"),
            Err(IdentifierError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_password_rejects_empty() {
        assert_eq!(
            Password::new(String::new()),
            Err(ValidationError::EmptyPassword)
        );
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("secret1".to_string()).unwrap();
        assert_eq!(format!("{:?}", password), "Password(***)");
    }

    #[test]
    fn test_register_command_checks_identifier_first() {
        let result = RegisterCommand::new("", String::new());
        assert_eq!(
            result.unwrap_err(),
            ValidationError::Identifier(IdentifierError::Empty)
        );
    }

    #[test]
    fn test_credential_id_round_trip() {
        let id = CredentialId::new();
        assert_eq!(CredentialId::from_string(&id.to_string()), Ok(id));
        assert!(CredentialId::from_string("nope").is_err());
    }
}
