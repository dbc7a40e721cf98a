//! Application configuration

use serde::Deserialize;

use crate::domain::AuthError;
use crate::infrastructure::auth::parse_duration;

const MIN_SECRET_LENGTH: usize = 32;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Authentication settings passed explicitly into the service and codec
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret for token signing; at least 32 bytes
    pub token_secret: String,
    /// Access token lifetime, e.g. "15m"
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl: String,
    /// Refresh token lifetime, e.g. "7d"
    #[serde(default = "default_refresh_token_ttl")]
    pub refresh_token_ttl: String,
    /// Failed logins before the account locks
    #[serde(default = "default_max_login_failures")]
    pub max_login_failures: u32,
    /// Length of the lock window in seconds
    #[serde(default = "default_lockout_duration_secs")]
    pub lockout_duration_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_access_token_ttl() -> String {
    "15m".to_string()
}

fn default_refresh_token_ttl() -> String {
    "7d".to_string()
}

fn default_max_login_failures() -> u32 {
    5
}

fn default_lockout_duration_secs() -> u64 {
    900
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AuthConfig {
    /// Check the invariants that must hold before the service starts
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.token_secret.len() < MIN_SECRET_LENGTH {
            return Err(AuthError::configuration(format!(
                "Token secret must be at least {MIN_SECRET_LENGTH} bytes"
            )));
        }

        parse_duration(&self.access_token_ttl)?;
        parse_duration(&self.refresh_token_ttl)?;

        if self.max_login_failures == 0 {
            return Err(AuthError::configuration(
                "max_login_failures must be at least 1",
            ));
        }

        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from optional files and `APP`-prefixed
    /// environment variables, then validate it
    pub fn load() -> Result<Self, AuthError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AuthError::configuration(e.to_string()))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AuthError::configuration(e.to_string()))?;

        config.auth.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_auth_config() -> AuthConfig {
        AuthConfig {
            token_secret: "0123456789abcdef0123456789abcdef".to_string(),
            access_token_ttl: default_access_token_ttl(),
            refresh_token_ttl: default_refresh_token_ttl(),
            max_login_failures: default_max_login_failures(),
            lockout_duration_secs: default_lockout_duration_secs(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(valid_auth_config().validate().is_ok());
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let config = AuthConfig {
            token_secret: "too-short".to_string(),
            ..valid_auth_config()
        };

        assert!(matches!(
            config.validate(),
            Err(AuthError::Configuration { .. })
        ));
    }

    #[test]
    fn test_bad_ttl_is_rejected() {
        let config = AuthConfig {
            access_token_ttl: "fifteen minutes".to_string(),
            ..valid_auth_config()
        };

        assert!(matches!(
            config.validate(),
            Err(AuthError::Configuration { .. })
        ));
    }

    #[test]
    fn test_zero_max_failures_is_rejected() {
        let config = AuthConfig {
            max_login_failures: 0,
            ..valid_auth_config()
        };

        assert!(matches!(
            config.validate(),
            Err(AuthError::Configuration { .. })
        ));
    }
}
