use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_COC_API_URL: &str = "https://api.clashofclans.com/";
const DEFAULT_DATABASE_PATH: &str = "db.sqlite";
const DEFAULT_PAGINATION_TIMEOUT_SECS: u64 = 120;
const DEFAULT_ROWS_PER_TABLE: usize = 20;

/// Settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub coc_api_token: String,
    pub coc_api_url: String,
    pub database_path: String,
    pub pagination_timeout: Duration,
    pub rows_per_table: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let discord_token =
            dotenvy::var("DISCORD_TOKEN").context("Expected DISCORD_TOKEN in the environment")?;
        let coc_api_token =
            dotenvy::var("COC_API_TOKEN").context("Expected COC_API_TOKEN in the environment")?;

        let coc_api_url =
            dotenvy::var("COC_API_URL").unwrap_or_else(|_| DEFAULT_COC_API_URL.to_string());
        let database_path =
            dotenvy::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());

        let pagination_timeout = parse_or("PAGINATION_TIMEOUT_SECS", DEFAULT_PAGINATION_TIMEOUT_SECS)?;
        let rows_per_table = parse_or("ROWS_PER_TABLE", DEFAULT_ROWS_PER_TABLE)?;

        if rows_per_table == 0 {
            anyhow::bail!("ROWS_PER_TABLE must be at least 1");
        }

        Ok(Config {
            discord_token,
            coc_api_token,
            coc_api_url,
            database_path,
            pagination_timeout: Duration::from_secs(pagination_timeout),
            rows_per_table,
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match dotenvy::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {value}")),
        Err(_) => Ok(default),
    }
}
