use std::env;
use std::fmt;

use auth::HashCost;
use auth::PolicyError;
use auth::SessionPolicy;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct SessionConfig {
    pub secret: String,
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,
    #[serde(default = "default_renewal_window_minutes")]
    pub renewal_window_minutes: i64,
    #[serde(default)]
    pub max_lifetime_hours: Option<i64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

fn default_ttl_minutes() -> i64 {
    SessionPolicy::DEFAULT_TTL_MINUTES
}

fn default_renewal_window_minutes() -> i64 {
    SessionPolicy::DEFAULT_RENEWAL_WINDOW_MINUTES
}

impl SessionConfig {
    /// Build the session timing policy.
    ///
    /// # Errors
    /// * `OutOfRange` - A value does not fit in a duration
    /// * `PolicyError` - Window not shorter than ttl, or non-positive values
    pub fn policy(&self) -> Result<SessionPolicy, PolicyError> {
        let ttl = checked(Duration::try_minutes, "ttl_minutes", self.ttl_minutes)?;
        let renewal_window = checked(
            Duration::try_minutes,
            "renewal_window_minutes",
            self.renewal_window_minutes,
        )?;
        let max_lifetime = self
            .max_lifetime_hours
            .map(|hours| checked(Duration::try_hours, "max_lifetime_hours", hours))
            .transpose()?;

        SessionPolicy::new(ttl, renewal_window, max_lifetime)
    }
}

fn checked(
    to_duration: fn(i64) -> Option<Duration>,
    setting: &'static str,
    value: i64,
) -> Result<Duration, PolicyError> {
    to_duration(value).ok_or(PolicyError::OutOfRange { setting, value })
}

// Keeps the signing secret out of logs.
impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"***")
            .field("ttl_minutes", &self.ttl_minutes)
            .field("renewal_window_minutes", &self.renewal_window_minutes)
            .field("max_lifetime_hours", &self.max_lifetime_hours)
            .finish()
    }
}

impl PasswordConfig {
    pub fn cost(&self) -> HashCost {
        HashCost {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        let cost = HashCost::default();
        Self {
            memory_kib: cost.memory_kib,
            iterations: cost.iterations,
            parallelism: cost.parallelism,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, SESSION__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: SESSION__TTL_MINUTES=60 overrides session.ttl_minutes
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(ttl_minutes: i64, renewal_window_minutes: i64) -> SessionConfig {
        SessionConfig {
            secret: "super-secret-value-at-least-32-bytes".to_string(),
            ttl_minutes,
            renewal_window_minutes,
            max_lifetime_hours: None,
        }
    }

    #[test]
    fn test_session_policy_from_config() {
        let policy = session(60, 5).policy().unwrap();

        assert_eq!(policy.ttl(), Duration::minutes(60));
        assert_eq!(policy.renewal_window(), Duration::minutes(5));
        assert_eq!(policy.max_lifetime(), None);
    }

    #[test]
    fn test_invalid_session_policy() {
        assert!(session(5, 15).policy().is_err());
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert_eq!(
            session(i64::MAX, 5).policy(),
            Err(PolicyError::OutOfRange {
                setting: "ttl_minutes",
                value: i64::MAX
            })
        );
        assert_eq!(
            session(15, i64::MIN).policy(),
            Err(PolicyError::OutOfRange {
                setting: "renewal_window_minutes",
                value: i64::MIN
            })
        );

        let mut capped = session(15, 5);
        capped.max_lifetime_hours = Some(i64::MAX);
        assert_eq!(
            capped.policy(),
            Err(PolicyError::OutOfRange {
                setting: "max_lifetime_hours",
                value: i64::MAX
            })
        );
    }

    #[test]
    fn test_session_debug_hides_secret() {
        let rendered = format!("{:?}", session(15, 5));

        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("ttl_minutes: 15"));
    }

    #[test]
    fn test_load_from_default_file() {
        let config = ConfigBuilder::builder()
            .add_source(config::File::from_str(
                include_str!("../../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize::<Config>()
            .unwrap();

        assert_eq!(config.server.http_port, 3500);
        assert_eq!(config.session.ttl_minutes, 15);
        assert_eq!(config.session.renewal_window_minutes, 5);
        assert_eq!(config.password.cost(), HashCost::default());
        assert!(config.session.policy().is_ok());
    }
}
