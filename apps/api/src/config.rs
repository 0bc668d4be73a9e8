use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::llm_client::Provider;

/// Application configuration loaded from environment variables.
///
/// Provider and tool API keys are all optional: a missing key degrades the
/// corresponding capability into a failure message at call time instead of
/// preventing startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub default_provider: Provider,
    pub openai_api_key: Option<String>,
    pub deepseek_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub serper_api_key: Option<String>,
    pub firecrawl_api_key: Option<String>,
    pub jsearch_api_key: Option<String>,
    pub staging_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let default_provider = match optional_env("DEFAULT_PROVIDER") {
            Some(name) => name
                .parse::<Provider>()
                .map_err(|_| anyhow::anyhow!("DEFAULT_PROVIDER must be one of: deepseek, openai, groq"))?,
            None => Provider::Deepseek,
        };

        Ok(Config {
            default_provider,
            openai_api_key: optional_env("OPENAI_API_KEY"),
            deepseek_api_key: optional_env("DEEPSEEK_API_KEY"),
            groq_api_key: optional_env("GROQ_API_KEY"),
            serper_api_key: optional_env("SERPER_API_KEY"),
            firecrawl_api_key: optional_env("FIRECRAWL_API_KEY"),
            jsearch_api_key: optional_env("JSEARCH_API_KEY"),
            staging_dir: optional_env("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("temp")),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an environment variable, treating an empty value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
