// Configuration de l'application (variables d'environnement / .env)

use std::env;

const DEFAULT_JWT_SECRET: &str = "default-insecure-key-change-this";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set in .env file")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_seconds: i64,
    /// 0 = les entrées du cache n'expirent jamais
    pub cache_ttl_seconds: u64,
    pub password_hash_iterations: u32,
    pub fixtures_seed: u64,
    pub log_level: String,
}

impl AppConfig {
    /// Charge la configuration depuis l'environnement du process
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Même parsing que `from_env`, mais sur n'importe quelle source de clés
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not found in .env, using default (INSECURE)");
            DEFAULT_JWT_SECRET.to_string()
        });

        Ok(Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            jwt_secret,
            jwt_ttl_seconds: parse_or(&lookup, "JWT_TTL_SECONDS", 3600)?,
            cache_ttl_seconds: parse_or(&lookup, "CACHE_TTL_SECONDS", 3600)?,
            password_hash_iterations: parse_or(&lookup, "PASSWORD_HASH_ITERATIONS", 260_000)?,
            fixtures_seed: parse_or(&lookup, "FIXTURES_SEED", 42)?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
