use std::env;
use anyhow::{Context, Result};

/// Runtime configuration, read from the environment once at startup and
/// passed down explicitly. Nothing else in the crate touches env vars.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage_url: String,
    pub storage_api_key: Option<String>,
    pub table_name: String,
    /// Deployment mode: "local" or "production".
    pub env: String,
    pub port: u16,
    pub allowed_origins: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let storage_url = env::var("STORAGE_URL").context("STORAGE_URL not set")?;
        let storage_api_key = env::var("STORAGE_API_KEY").ok();
        let table_name = env::var("BIRTHDAY_TABLE").context("BIRTHDAY_TABLE not set")?;
        let env_name = env::var("APP_ENV").unwrap_or_else(|_| "production".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".into());

        Ok(Self {
            storage_url,
            storage_api_key,
            table_name,
            env: env_name,
            port,
            allowed_origins,
        })
    }

    pub fn is_local(&self) -> bool {
        self.env == "local"
    }
}
