use std::sync::LazyLock;

use regex::Regex;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;
use tokio::task::JoinSet;

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0289PYLQGRJCUV]+$").expect("tag pattern is valid")
});

/// Client for the Clash of Clans player API.
#[derive(Debug, Clone)]
pub struct CocClient {
    http_client: Client,
    base_url: Url,
    token: String,
}

#[derive(Debug, Error)]
pub enum CocError {
    #[error("Network error: {0}")]
    /// Connection failures, timeouts and non-success statuses reported by `reqwest`.
    Network(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    /// The API answered 404 for this tag.
    #[error("Player {0} not found")]
    NotFound(String),
    #[error("Invalid player tag: {0}")]
    InvalidTag(String),
    /// A bulk lookup came back without this tag.
    #[error("No data returned for player {0}")]
    MissingPlayer(String),
    #[error("Player lookup task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PlayerClan {
    pub tag: String,
    pub name: String,
}

#[derive(Debug, Default)]
pub struct PlayerLookup {
    pub found: Vec<Player>,
    /// Tags that answered 404, sorted.
    pub missing: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Player {
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub donations: u64,
    #[serde(rename = "donationsReceived", default)]
    pub received: u64,
    #[serde(default)]
    pub clan: Option<PlayerClan>,
}

/// Brings a user-typed tag into the `#2PP0Q` form the API expects.
///
/// Lowercase letters are accepted and the letter `O` is read as zero.
///
/// ```text
/// "2pp"   -> "#2PP"
/// "#2oo " -> "#200"
/// ```
pub fn normalize_tag(tag: &str) -> Result<String, CocError> {
    let cleaned = tag.trim().trim_start_matches('#').to_uppercase().replace('O', "0");
    let normalized = format!("#{cleaned}");

    if TAG_PATTERN.is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(CocError::InvalidTag(tag.to_string()))
    }
}

impl CocClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, CocError> {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(CocClient {
            http_client: Client::new(),
            base_url: Url::parse(&base_url)?,
            token: token.into(),
        })
    }

    pub async fn get_player(&self, tag: &str) -> Result<Player, CocError> {
        let tag = normalize_tag(tag)?;
        let url = self
            .base_url
            .join(&format!("v1/players/{}", tag.replace('#', "%23")))?;

        tracing::debug!("[COC] Fetching player {}", tag);

        let res = self
            .http_client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if res.status() == StatusCode::NOT_FOUND {
            return Err(CocError::NotFound(tag));
        }

        let player: Player = res.error_for_status()?.json().await?;

        Ok(player)
    }

    fn spawn_lookups(&self, tags: &[String]) -> JoinSet<Result<Player, CocError>> {
        let mut lookups = JoinSet::new();

        for tag in tags {
            let client = self.clone();
            let tag = tag.clone();
            lookups.spawn(async move { client.get_player(&tag).await });
        }

        lookups
    }

    /// Fetches all `tags` concurrently. The result order does not follow `tags`.
    ///
    /// Fails as soon as any single lookup fails.
    pub async fn get_players(&self, tags: &[String]) -> Result<Vec<Player>, CocError> {
        let mut lookups = self.spawn_lookups(tags);

        let mut players = Vec::with_capacity(tags.len());
        while let Some(result) = lookups.join_next().await {
            players.push(result??);
        }

        Ok(players)
    }

    /// Like [`CocClient::get_players`], but players the API no longer knows are
    /// collected in [`PlayerLookup::missing`] instead of failing the batch.
    pub async fn get_existing_players(&self, tags: &[String]) -> Result<PlayerLookup, CocError> {
        let mut lookups = self.spawn_lookups(tags);

        let mut lookup = PlayerLookup::default();
        while let Some(result) = lookups.join_next().await {
            match result? {
                Ok(player) => lookup.found.push(player),
                Err(CocError::NotFound(tag)) => {
                    tracing::warn!("[COC] Player {} no longer exists, skipping", tag);
                    lookup.missing.push(tag);
                }
                Err(e) => return Err(e),
            }
        }

        lookup.missing.sort();
        Ok(lookup)
    }
}
