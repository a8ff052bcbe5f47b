//! Server configuration
//!
//! Defaults are layered under `STORES_*` environment variables, e.g.
//! `STORES_BIND_ADDRESS`, `STORES_DATABASE_URL`, `STORES_JWT_SECRET`,
//! `STORES_ACCESS_TOKEN_MINUTES`, `STORES_REFRESH_TOKEN_DAYS` and
//! `STORES_ADMIN_IDENTITY`. A `.env` file is read first when present.

use ::config::builder::DefaultState;
use ::config::{ConfigBuilder, ConfigError, Environment};
use serde::Deserialize;
use stores_core::TokenPolicy;
use tracing::warn;

const INSECURE_JWT_SECRET: &str = "change-me-in-production";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_address: String,
    pub database_url: String,
    #[serde(default)]
    pub jwt_secret: Option<String>,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub admin_identity: String,
}

impl Config {
    /// Load from `.env`, then the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Self::defaults()?
            .add_source(Environment::with_prefix("STORES"))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        ::config::Config::builder()
            .set_default("bind_address", "0.0.0.0:5000")?
            .set_default("database_url", "sqlite://data.db")?
            .set_default("access_token_minutes", 15_i64)?
            .set_default("refresh_token_days", 30_i64)?
            .set_default("admin_identity", "1")
    }

    /// Signing secret, falling back to an insecure default
    pub fn jwt_secret(&self) -> String {
        match &self.jwt_secret {
            Some(secret) if !secret.is_empty() => secret.clone(),
            _ => {
                warn!("STORES_JWT_SECRET not set, using default (insecure for production)");
                INSECURE_JWT_SECRET.to_string()
            }
        }
    }

    pub fn token_policy(&self) -> TokenPolicy {
        TokenPolicy {
            access_ttl: chrono::Duration::minutes(self.access_token_minutes),
            refresh_ttl: chrono::Duration::days(self.refresh_token_days),
            admin_identity: self.admin_identity.clone(),
        }
    }
}
