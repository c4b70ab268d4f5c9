//! Process-wide configuration, read once at startup.

use std::time::Duration;

const DEFAULT_OMDB_BASE_URL: &str = "https://www.omdbapi.com/";

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub omdb_api_key: String,
    pub omdb_base_url: String,
    pub provider_timeout: Duration,
    pub bcrypt_cost: u32,
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| format!("{} must be set", key))
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| format!("PORT is not a valid port: {}", e))?,
            None => 8000,
        };

        let timeout_secs = match lookup("PROVIDER_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| format!("PROVIDER_TIMEOUT_SECS is not a number: {}", e))?,
            None => 30,
        };

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|e| format!("BCRYPT_COST is not a number: {}", e))?,
            None => bcrypt::DEFAULT_COST,
        };
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(format!("BCRYPT_COST must be between 4 and 31, got {}", bcrypt_cost));
        }

        let allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            omdb_api_key: required("OMDB_API_KEY")?,
            omdb_base_url: lookup("OMDB_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OMDB_BASE_URL.to_string()),
            provider_timeout: Duration::from_secs(timeout_secs),
            bcrypt_cost,
            allowed_origins,
        })
    }
}
