//! Server configuration.

use std::env;

/// Fallback JWT secret for local development. Never use in production.
pub const DEV_JWT_SECRET: &str = "dev-key-change-this";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database URL.
    pub database_url: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Access token lifetime in hours.
    pub access_token_hours: u64,
    /// Refresh token lifetime in days.
    pub refresh_token_days: u64,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("FINTRACK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("FINTRACK_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:finance_tracker.db?mode=rwc".to_string()),
            jwt_secret: env::var("FINTRACK_JWT_SECRET")
                .unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
            access_token_hours: env::var("FINTRACK_ACCESS_TOKEN_HOURS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
            refresh_token_days: env::var("FINTRACK_REFRESH_TOKEN_DAYS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            log_level: env::var("FINTRACK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns true if the JWT secret is the development fallback.
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // SAFETY: Tests run serially or in isolation
        unsafe {
            env::remove_var("FINTRACK_HOST");
            env::remove_var("FINTRACK_PORT");
            env::remove_var("FINTRACK_JWT_SECRET");
            env::remove_var("DATABASE_URL");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.access_token_hours, 1);
        assert_eq!(config.refresh_token_days, 30);
        assert!(config.uses_dev_secret());
    }
}
