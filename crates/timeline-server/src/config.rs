use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me",
    "dev-secret-change-me",
    "your-secret-key-change-in-production",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub db_readers: usize,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = lookup("TIMELINE_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("TIMELINE_JWT_SECRET is unset or still a placeholder");
        }

        let db_path = lookup("TIMELINE_DB_PATH")
            .unwrap_or_else(|| "timeline.db".into())
            .into();
        let db_readers = match lookup("TIMELINE_DB_READERS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("TIMELINE_DB_READERS is not a number: {raw}"))?,
            None => timeline_db::DEFAULT_READERS,
        };
        let host = lookup("TIMELINE_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("TIMELINE_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("TIMELINE_PORT is not a port: {raw}"))?,
            None => 3001,
        };

        Ok(Self {
            jwt_secret,
            db_path,
            db_readers,
            host,
            port,
        })
    }
}
