//! Configuration management.
//!
//! Loads settings from environment variables, with a `.env` file picked up
//! for local development. Everything has a default except `JWT_SECRET`: the
//! shared signing secret is a deployment precondition and its absence is a
//! load error, not something to paper over at request time.
use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins; "*" allows any origin.
    pub allowed_origins: String,
    pub max_age: u64,
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_app_host() -> String {
    "0.0.0.0".to_string()
}

fn default_app_port() -> u16 {
    8080
}

fn default_cors_max_age() -> u64 {
    3600
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let app = AppConfig {
            env: env::var("APP_ENV").unwrap_or_else(|_| default_app_env()),
            host: env::var("APP_HOST").unwrap_or_else(|_| default_app_host()),
            port: env::var("APP_PORT")
                .unwrap_or_else(|_| default_app_port().to_string())
                .parse()
                .context("Invalid APP_PORT")?,
        };

        let jwt = JwtConfig {
            secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
        };

        let cors = CorsConfig {
            allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            max_age: env::var("CORS_MAX_AGE")
                .unwrap_or_else(|_| default_cors_max_age().to_string())
                .parse()
                .context("Invalid CORS_MAX_AGE")?,
        };

        Ok(Config { app, jwt, cors })
    }

    pub fn is_production(&self) -> bool {
        self.app.env == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.env == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the env-var mutations cannot race each other.
    #[test]
    fn test_from_env() {
        env::remove_var("JWT_SECRET");
        assert!(Config::from_env().is_err());

        env::set_var("JWT_SECRET", "test-secret-key");
        let config = Config::from_env().unwrap();
        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.host, "0.0.0.0");
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.jwt.secret, "test-secret-key");
        assert!(config.is_development());
        assert!(!config.is_production());

        env::set_var("APP_PORT", "9090");
        env::set_var("APP_ENV", "production");
        let config = Config::from_env().unwrap();
        assert_eq!(config.app.port, 9090);
        assert!(config.is_production());

        env::remove_var("JWT_SECRET");
        env::remove_var("APP_PORT");
        env::remove_var("APP_ENV");
    }
}
