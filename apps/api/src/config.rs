use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_API_URL;

/// Career used when a request does not name one.
pub const DEFAULT_JOB_NAME: &str = "machine learning";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub generation_api_url: String,
    pub generation_api_key: String,
    /// Directory holding the canonical `<job>.json` roadmap files.
    pub roadmap_dir: PathBuf,
    pub default_job_name: String,
    pub db_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            generation_api_url: env_or("GENERATION_API_URL", DEFAULT_API_URL),
            generation_api_key: require_env("GENERATION_API_KEY")?,
            roadmap_dir: PathBuf::from(env_or("ROADMAP_DIR", "data/jobs")),
            default_job_name: env_or("DEFAULT_JOB_NAME", DEFAULT_JOB_NAME),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", "10")
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
