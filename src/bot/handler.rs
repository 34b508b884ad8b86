use std::sync::Arc;

use anyhow::Context as AnyhowContext;

use crate::utils::coc::CocClient;
use crate::utils::config::Config;
use crate::utils::database::Database;

pub struct Handler {
    pub coc_client: CocClient,
    pub database: Arc<Database>,
    pub config: Config,
}

impl Handler {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let database = Database::new(&config.database_path)
            .await
            .with_context(|| format!("Failed to open database at {}", config.database_path))?;

        let coc_client = CocClient::new(&config.coc_api_url, config.coc_api_token.clone())
            .context("Failed to create Clash of Clans client")?;

        Ok(Handler {
            coc_client,
            database: Arc::new(database),
            config,
        })
    }
}
