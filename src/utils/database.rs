use chrono::{DateTime, Utc};
use sqlx::{
    Row, SqlitePool as Pool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::utils::coc::Player;

/// Per-guild donation board settings.
#[derive(Clone, Debug, PartialEq)]
pub struct GuildConfig {
    pub guild_id: u64,
    /// `2` selects the compact layout, anything else the detailed one.
    pub donationboard_render: i64,
    pub donationboard_title: Option<String>,
    pub icon_url: Option<String>,
}

impl GuildConfig {
    pub fn new(guild_id: u64) -> Self {
        GuildConfig {
            guild_id,
            donationboard_render: 1,
            donationboard_title: None,
            icon_url: None,
        }
    }

    pub fn is_compact(&self) -> bool {
        self.donationboard_render == 2
    }
}

/// A player on a guild's donation board, with the counts seen at the last refresh.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedPlayer {
    pub player_tag: String,
    pub player_name: String,
    pub donations: u64,
    pub received: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DonationEvent {
    pub player_tag: String,
    pub player_name: String,
    pub donations: u64,
    pub received: u64,
    pub time: DateTime<Utc>,
}

pub struct Database {
    pool: Pool,
}

impl Database {
    pub async fn new(path: &str) -> Result<Self, sqlx::Error> {
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new().connect_with(opts).await?;

        Self::setup_tables(&pool).await?;
        tracing::info!("[DB] Opened database at {}", path);

        Ok(Database { pool })
    }

    /// Single-connection in-memory database, so every query sees the same tables.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let opts = SqliteConnectOptions::new().in_memory(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await?;

        Self::setup_tables(&pool).await?;

        Ok(Database { pool })
    }

    async fn setup_tables(pool: &Pool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS guilds (
                guild_id INTEGER PRIMARY KEY,
                donationboard_render INTEGER NOT NULL DEFAULT 1,
                donationboard_title TEXT,
                icon_url TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS players (
                guild_id INTEGER NOT NULL,
                player_tag TEXT NOT NULL,
                player_name TEXT NOT NULL,
                donations INTEGER NOT NULL DEFAULT 0 CHECK (donations >= 0),
                received INTEGER NOT NULL DEFAULT 0 CHECK (received >= 0),
                PRIMARY KEY (guild_id, player_tag)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                guild_id INTEGER NOT NULL,
                player_tag TEXT NOT NULL,
                player_name TEXT NOT NULL,
                donations INTEGER NOT NULL DEFAULT 0 CHECK (donations >= 0),
                received INTEGER NOT NULL DEFAULT 0 CHECK (received >= 0),
                time TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Returns the stored settings, or the defaults for a guild that never changed them.
    pub async fn get_guild_config(&self, guild_id: u64) -> Result<GuildConfig, sqlx::Error> {
        let row = sqlx::query(
            "SELECT donationboard_render, donationboard_title, icon_url FROM guilds WHERE guild_id = ?",
        )
        .bind(guild_id as i64)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(GuildConfig::new(guild_id));
        };

        Ok(GuildConfig {
            guild_id,
            donationboard_render: row.get("donationboard_render"),
            donationboard_title: row.get("donationboard_title"),
            icon_url: row.get("icon_url"),
        })
    }

    pub async fn set_donationboard_render(
        &self,
        guild_id: u64,
        render: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO guilds (guild_id, donationboard_render) VALUES (?, ?)
             ON CONFLICT(guild_id) DO UPDATE SET donationboard_render = excluded.donationboard_render",
        )
        .bind(guild_id as i64)
        .bind(render)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn set_donationboard_title(
        &self,
        guild_id: u64,
        title: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO guilds (guild_id, donationboard_title) VALUES (?, ?)
             ON CONFLICT(guild_id) DO UPDATE SET donationboard_title = excluded.donationboard_title",
        )
        .bind(guild_id as i64)
        .bind(title)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn set_icon_url(&self, guild_id: u64, icon_url: Option<&str>) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO guilds (guild_id, icon_url) VALUES (?, ?)
             ON CONFLICT(guild_id) DO UPDATE SET icon_url = excluded.icon_url",
        )
        .bind(guild_id as i64)
        .bind(icon_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Starts tracking a player. Re-adding a tracked player refreshes its counts.
    pub async fn add_player(&self, guild_id: u64, player: &Player) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO players (guild_id, player_tag, player_name, donations, received) VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(guild_id, player_tag) DO UPDATE SET
                player_name = excluded.player_name,
                donations = excluded.donations,
                received = excluded.received",
        )
        .bind(guild_id as i64)
        .bind(&player.tag)
        .bind(&player.name)
        .bind(player.donations as i64)
        .bind(player.received as i64)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns whether a player was removed.
    pub async fn remove_player(&self, guild_id: u64, player_tag: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM players WHERE guild_id = ? AND player_tag = ?")
            .bind(guild_id as i64)
            .bind(player_tag)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Tracked players, highest donations first.
    pub async fn get_tracked_players(&self, guild_id: u64) -> Result<Vec<TrackedPlayer>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT player_tag, player_name, donations, received FROM players
             WHERE guild_id = ? ORDER BY donations DESC, player_tag ASC",
        )
        .bind(guild_id as i64)
        .fetch_all(&self.pool)
        .await?;

        let players = rows
            .iter()
            .map(|row| TrackedPlayer {
                player_tag: row.get("player_tag"),
                player_name: row.get("player_name"),
                donations: row.get::<i64, _>("donations") as u64,
                received: row.get::<i64, _>("received") as u64,
            })
            .collect();

        Ok(players)
    }

    /// Stores the events of one refresh together with the new counts. Either both land or
    /// neither does, so a failed refresh is diffed again from the old counts next time.
    pub async fn record_refresh(
        &self,
        guild_id: u64,
        events: &[DonationEvent],
        live: &[Player],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        for event in events {
            sqlx::query(
                "INSERT INTO events (guild_id, player_tag, player_name, donations, received, time) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(guild_id as i64)
            .bind(&event.player_tag)
            .bind(&event.player_name)
            .bind(event.donations as i64)
            .bind(event.received as i64)
            .bind(event.time)
            .execute(&mut *tx)
            .await?;
        }

        for player in live {
            sqlx::query(
                "UPDATE players SET player_name = ?, donations = ?, received = ? WHERE guild_id = ? AND player_tag = ?",
            )
            .bind(&player.name)
            .bind(player.donations as i64)
            .bind(player.received as i64)
            .bind(guild_id as i64)
            .bind(&player.tag)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            "[DB] Guild {}: stored {} events and {} player counts",
            guild_id,
            events.len(),
            live.len()
        );

        Ok(())
    }

    /// Most recent events first.
    pub async fn get_events(&self, guild_id: u64, limit: u32) -> Result<Vec<DonationEvent>, sqlx::Error> {
        let rows = sqlx::query(
            "SELECT player_tag, player_name, donations, received, time FROM events
             WHERE guild_id = ? ORDER BY time DESC, id DESC LIMIT ?",
        )
        .bind(guild_id as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let events = rows
            .iter()
            .map(|row| DonationEvent {
                player_tag: row.get("player_tag"),
                player_name: row.get("player_name"),
                donations: row.get::<i64, _>("donations") as u64,
                received: row.get::<i64, _>("received") as u64,
                time: row.get("time"),
            })
            .collect();

        Ok(events)
    }
}
