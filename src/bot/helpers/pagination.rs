use std::collections::BTreeMap;
use std::sync::Arc;

use serenity::all::{Colour, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter};
use thiserror::Error;

use crate::utils::coc::{CocClient, CocError, Player};
use crate::utils::database::{Database, GuildConfig};
use crate::utils::table::ClyTable;

pub const LOADING: &str = "Loading...";
pub const DEFAULT_ICON_URL: &str = "https://cdn.discordapp.com/emojis/592028799768592405.png?v=1";

#[derive(Debug, Error)]
pub enum PaginatorError {
    #[error("Page {page} is out of range (1-{page_count})")]
    PageOutOfRange { page: usize, page_count: usize },
    #[error("Player lookup failed: {0}")]
    Upstream(#[from] CocError),
    #[error("Could not load guild config: {0}")]
    GuildConfig(#[from] sqlx::Error),
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),
}

/// Reaction controls, in the order they are attached.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    First,
    Previous,
    Next,
    Last,
    Stop,
}

pub const REACTION_EMOJIS: [Navigation; 5] = [
    Navigation::First,
    Navigation::Previous,
    Navigation::Next,
    Navigation::Last,
    Navigation::Stop,
];

impl Navigation {
    pub fn as_emoji(&self) -> &'static str {
        match self {
            Self::First => "\u{23ee}",
            Self::Previous => "\u{25c0}",
            Self::Next => "\u{25b6}",
            Self::Last => "\u{23ed}",
            Self::Stop => "\u{23f9}",
        }
    }

    /// Discord may hand the symbol back with a variation selector attached.
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        let emoji = emoji.trim_end_matches('\u{fe0f}');
        REACTION_EMOJIS
            .into_iter()
            .find(|action| action.as_emoji() == emoji)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PaginatorState {
    /// Nothing has been sent yet.
    Uninitialized,
    /// The placeholder is showing while a page is prepared.
    Loading,
    Displaying,
}

/// What the paginator puts into the message embed.
#[derive(Clone, Debug, PartialEq)]
pub struct PageEmbed {
    pub author: String,
    pub icon_url: String,
    pub description: String,
    pub footer: Option<String>,
}

impl From<&PageEmbed> for CreateEmbed {
    fn from(page: &PageEmbed) -> Self {
        let embed = CreateEmbed::new()
            .colour(Colour::BLURPLE)
            .author(CreateEmbedAuthor::new(&page.author).icon_url(&page.icon_url))
            .description(&page.description);

        match &page.footer {
            Some(footer) => embed.footer(CreateEmbedFooter::new(footer)),
            None => embed,
        }
    }
}

/// The message a paginator draws into and reads navigation from.
#[serenity::async_trait]
pub trait PageChannel: Send {
    /// Sends the message the paginator will keep editing.
    async fn send(&mut self, content: &str) -> Result<(), PaginatorError>;

    /// Replaces the message. `None` clears the content or the embed.
    async fn edit(
        &mut self,
        content: Option<&str>,
        embed: Option<&PageEmbed>,
    ) -> Result<(), PaginatorError>;

    async fn add_reaction(&mut self, emoji: &str) -> Result<(), PaginatorError>;

    /// Waits for the next reaction. `None` once the session has timed out.
    async fn next_reaction(&mut self) -> Result<Option<String>, PaginatorError>;

    async fn clear_reactions(&mut self) -> Result<(), PaginatorError>;
}

#[serenity::async_trait]
pub trait PlayerSource: Send + Sync {
    /// Looks up all `tags` in one batch. Results may come back in any order.
    async fn get_players(&self, tags: &[String]) -> Result<Vec<Player>, CocError>;
}

#[serenity::async_trait]
impl PlayerSource for CocClient {
    async fn get_players(&self, tags: &[String]) -> Result<Vec<Player>, CocError> {
        CocClient::get_players(self, tags).await
    }
}

#[serenity::async_trait]
pub trait GuildConfigSource: Send + Sync {
    async fn get_guild_config(&self, guild_id: u64) -> Result<GuildConfig, sqlx::Error>;
}

#[serenity::async_trait]
impl GuildConfigSource for Database {
    async fn get_guild_config(&self, guild_id: u64) -> Result<GuildConfig, sqlx::Error> {
        Database::get_guild_config(self, guild_id).await
    }
}

/// Turns one page worth of records into the text shown in the embed.
#[serenity::async_trait]
pub trait PageSource: Send + Sync {
    type Record: Send + Sync;

    /// `table` has no rows when this is called. Each record carries its 0-based position
    /// in the full data set.
    async fn prepare_entry(
        &self,
        table: &mut ClyTable,
        window: &[(usize, Self::Record)],
        config: &GuildConfig,
    ) -> Result<String, PaginatorError>;
}

#[derive(Debug, Clone)]
pub struct PaginatorOptions {
    pub title: String,
    pub rows_per_table: usize,
    pub page_count: Option<usize>,
    pub show_entry_count: bool,
}

impl Default for PaginatorOptions {
    fn default() -> Self {
        PaginatorOptions {
            title: String::new(),
            rows_per_table: 20,
            page_count: None,
            show_entry_count: true,
        }
    }
}

impl PaginatorOptions {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn rows_per_table(mut self, rows_per_table: usize) -> Self {
        self.rows_per_table = rows_per_table;
        self
    }

    /// Fixes the number of pages instead of deriving it from the data length.
    pub fn page_count(mut self, page_count: usize) -> Self {
        self.page_count = Some(page_count);
        self
    }

    pub fn show_entry_count(mut self, show_entry_count: bool) -> Self {
        self.show_entry_count = show_entry_count;
        self
    }
}

/// Shows records page by page in a single message, rendering each page at most once.
pub struct Paginator<S: PageSource, C: PageChannel> {
    source: S,
    channel: C,
    guild_configs: Arc<dyn GuildConfigSource>,
    guild_id: u64,
    guild_config: Option<GuildConfig>,
    table: ClyTable,
    data: Vec<(usize, S::Record)>,
    entries: BTreeMap<usize, String>,
    page_count: usize,
    rows_per_table: usize,
    title: String,
    show_entry_count: bool,
    current_page: usize,
    state: PaginatorState,
}

impl<S: PageSource, C: PageChannel> Paginator<S, C> {
    pub fn new(
        source: S,
        channel: C,
        guild_configs: Arc<dyn GuildConfigSource>,
        guild_id: u64,
        data: Vec<S::Record>,
        options: PaginatorOptions,
    ) -> Self {
        let rows_per_table = options.rows_per_table.max(1);
        let page_count = options
            .page_count
            .unwrap_or_else(|| data.len().div_ceil(rows_per_table))
            .max(1);

        Paginator {
            source,
            channel,
            guild_configs,
            guild_id,
            guild_config: None,
            table: ClyTable::new(),
            data: data.into_iter().enumerate().collect(),
            entries: BTreeMap::new(),
            page_count,
            rows_per_table,
            title: options.title,
            show_entry_count: options.show_entry_count,
            current_page: 1,
            state: PaginatorState::Uninitialized,
        }
    }

    #[cfg(test)]
    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    #[cfg(test)]
    pub fn state(&self) -> PaginatorState {
        self.state
    }

    pub fn is_paginating(&self) -> bool {
        self.page_count > 1
    }

    #[cfg(test)]
    pub fn is_cached(&self, page: usize) -> bool {
        self.entries.contains_key(&page)
    }

    /// Forgets a rendered page so the next visit prepares it again.
    pub fn reset_page(&mut self, page: usize) -> Option<String> {
        self.entries.remove(&page)
    }

    fn check_bounds(&self, page: usize) -> Result<(), PaginatorError> {
        if page == 0 || page > self.page_count {
            return Err(PaginatorError::PageOutOfRange {
                page,
                page_count: self.page_count,
            });
        }
        Ok(())
    }

    /// Returns the rendered page, preparing it behind a loading placeholder on the first visit.
    pub async fn get_page(&mut self, page: usize) -> Result<&str, PaginatorError> {
        self.check_bounds(page)?;

        if self.entries.contains_key(&page) {
            tracing::debug!("[PAGINATOR] Serving cached page {}", page);
        } else {
            match self.state {
                PaginatorState::Uninitialized => self.channel.send(LOADING).await?,
                _ => self.channel.edit(Some(LOADING), None).await?,
            }
            self.state = PaginatorState::Loading;

            let entry = self.prepare_entry(page).await?;
            self.entries.insert(page, entry);
            self.state = PaginatorState::Displaying;
        }

        Ok(self.entries[&page].as_str())
    }

    /// Renders `page` through the page source without touching the cache.
    pub async fn prepare_entry(&mut self, page: usize) -> Result<String, PaginatorError> {
        self.check_bounds(page)?;

        let config = match &self.guild_config {
            Some(config) => config.clone(),
            None => self.guild_configs.get_guild_config(self.guild_id).await?,
        };

        let base = (page - 1) * self.rows_per_table;
        let start = base.min(self.data.len());
        let end = (base + self.rows_per_table).min(self.data.len());

        self.source
            .prepare_entry(self.table.fresh(), &self.data[start..end], &config)
            .await
    }

    /// The footer reads `Page X/Y (N entries)`, where `N` counts the records being
    /// paginated, not the pages rendered so far.
    fn get_embed(&self, description: String, page: usize) -> PageEmbed {
        let footer = self.is_paginating().then(|| {
            if self.show_entry_count {
                format!(
                    "Page {page}/{} ({} entries)",
                    self.page_count,
                    self.data.len()
                )
            } else {
                format!("Page {page}/{}", self.page_count)
            }
        });

        let config = self.guild_config.as_ref();
        let author = config
            .and_then(|c| c.donationboard_title.clone())
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| self.title.clone());
        let icon_url = config
            .and_then(|c| c.icon_url.clone())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_ICON_URL.to_string());

        PageEmbed {
            author,
            icon_url,
            description,
            footer,
        }
    }

    /// Reactions attached on first display. With exactly two pages the jump-to-end
    /// controls are left out, though they still work if a user adds them.
    pub fn default_reactions(&self) -> Vec<Navigation> {
        REACTION_EMOJIS
            .into_iter()
            .filter(|action| {
                !(self.page_count == 2 && matches!(action, Navigation::First | Navigation::Last))
            })
            .collect()
    }

    pub async fn show_page(&mut self, page: usize, first: bool) -> Result<(), PaginatorError> {
        self.check_bounds(page)?;

        self.guild_config = Some(self.guild_configs.get_guild_config(self.guild_id).await?);
        self.current_page = page;

        let description = self.get_page(page).await?.to_string();
        let embed = self.get_embed(description, page);

        self.channel.edit(None, Some(&embed)).await?;
        self.state = PaginatorState::Displaying;

        if !self.is_paginating() || !first {
            return Ok(());
        }

        for action in self.default_reactions() {
            self.channel.add_reaction(action.as_emoji()).await?;
        }

        Ok(())
    }

    fn target_page(&self, action: Navigation) -> Option<usize> {
        match action {
            Navigation::First => Some(1),
            Navigation::Previous => self.current_page.checked_sub(1).filter(|page| *page >= 1),
            Navigation::Next => Some(self.current_page + 1).filter(|page| *page <= self.page_count),
            Navigation::Last => Some(self.page_count),
            Navigation::Stop => None,
        }
    }

    /// Applies one reaction. Returns `false` once the user asked to stop.
    pub async fn handle_reaction(&mut self, emoji: &str) -> Result<bool, PaginatorError> {
        let Some(action) = Navigation::from_emoji(emoji) else {
            return Ok(true);
        };

        if action == Navigation::Stop {
            return Ok(false);
        }

        match self.target_page(action) {
            Some(page) if page != self.current_page => self.show_page(page, false).await?,
            _ => {}
        }

        Ok(true)
    }

    /// Shows the first page and follows reactions until the session times out or is stopped.
    pub async fn paginate(&mut self) -> Result<(), PaginatorError> {
        tracing::info!(
            "[PAGINATOR] Starting '{}' with {} page(s) for guild {}",
            self.title,
            self.page_count,
            self.guild_id
        );

        self.show_page(1, true).await?;

        if !self.is_paginating() {
            return Ok(());
        }

        while let Some(emoji) = self.channel.next_reaction().await? {
            if !self.handle_reaction(&emoji).await? {
                break;
            }
        }

        if let Err(e) = self.channel.clear_reactions().await {
            tracing::warn!("[PAGINATOR] Failed to clear reactions: {}", e);
        }

        tracing::debug!(
            "[PAGINATOR] '{}' ended on page {}/{}",
            self.title,
            self.current_page(),
            self.page_count()
        );

        Ok(())
    }
}
