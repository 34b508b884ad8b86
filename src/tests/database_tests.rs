#[cfg(test)]
pub mod tests {
    use crate::utils::coc::Player;
    use crate::utils::database::{Database, DonationEvent, GuildConfig};
    use chrono::{Duration, Utc};

    const GUILD: u64 = 592028799768592405;

    fn player(tag: &str, name: &str, donations: u64, received: u64) -> Player {
        Player {
            tag: tag.to_string(),
            name: name.to_string(),
            donations,
            received,
            clan: None,
        }
    }

    #[tokio::test]
    async fn test_guild_config_defaults() {
        let db = Database::in_memory().await.unwrap();
        let config = db.get_guild_config(GUILD).await.unwrap();

        assert_eq!(config, GuildConfig::new(GUILD));
        assert!(!config.is_compact());
    }

    #[tokio::test]
    async fn test_guild_config_updates_keep_other_fields() {
        let db = Database::in_memory().await.unwrap();

        db.set_donationboard_render(GUILD, 2).await.unwrap();
        db.set_donationboard_title(GUILD, Some("Top Donors")).await.unwrap();
        db.set_icon_url(GUILD, Some("https://example.com/icon.png"))
            .await
            .unwrap();

        let config = db.get_guild_config(GUILD).await.unwrap();
        assert!(config.is_compact());
        assert_eq!(config.donationboard_title.as_deref(), Some("Top Donors"));
        assert_eq!(config.icon_url.as_deref(), Some("https://example.com/icon.png"));

        db.set_donationboard_title(GUILD, None).await.unwrap();
        let config = db.get_guild_config(GUILD).await.unwrap();
        assert_eq!(config.donationboard_title, None);
        assert_eq!(config.donationboard_render, 2);
    }

    #[tokio::test]
    async fn test_tracked_players_sorted_by_donations() {
        let db = Database::in_memory().await.unwrap();

        db.add_player(GUILD, &player("#2PP", "Alice", 10, 1)).await.unwrap();
        db.add_player(GUILD, &player("#9QQ", "Bob", 300, 2)).await.unwrap();
        db.add_player(GUILD, &player("#8LL", "Carol", 45, 3)).await.unwrap();
        db.add_player(GUILD + 1, &player("#2YY", "Elsewhere", 999, 0))
            .await
            .unwrap();

        let players = db.get_tracked_players(GUILD).await.unwrap();
        let names: Vec<_> = players.iter().map(|p| p.player_name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Carol", "Alice"]);
    }

    #[tokio::test]
    async fn test_add_player_twice_updates_counts() {
        let db = Database::in_memory().await.unwrap();

        db.add_player(GUILD, &player("#2PP", "Alice", 10, 1)).await.unwrap();
        db.add_player(GUILD, &player("#2PP", "Alice II", 20, 4)).await.unwrap();

        let players = db.get_tracked_players(GUILD).await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].player_name, "Alice II");
        assert_eq!((players[0].donations, players[0].received), (20, 4));
    }

    #[tokio::test]
    async fn test_update_and_remove_player() {
        let db = Database::in_memory().await.unwrap();

        db.add_player(GUILD, &player("#2PP", "Alice", 10, 1)).await.unwrap();
        db.record_refresh(GUILD, &[], &[player("#2PP", "Alice", 55, 9)])
            .await
            .unwrap();

        let players = db.get_tracked_players(GUILD).await.unwrap();
        assert_eq!((players[0].donations, players[0].received), (55, 9));

        assert!(db.remove_player(GUILD, "#2PP").await.unwrap());
        assert!(!db.remove_player(GUILD, "#2PP").await.unwrap());
        assert!(db.get_tracked_players(GUILD).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_events_newest_first_with_limit() {
        let db = Database::in_memory().await.unwrap();
        let now = Utc::now();

        for (minutes_ago, name) in [(30, "old"), (1, "newest"), (10, "middle")] {
            let event = DonationEvent {
                player_tag: "#2PP".to_string(),
                player_name: name.to_string(),
                donations: 5,
                received: 0,
                time: now - Duration::minutes(minutes_ago),
            };
            db.record_refresh(GUILD, &[event], &[]).await.unwrap();
        }

        let events = db.get_events(GUILD, 2).await.unwrap();
        let names: Vec<_> = events.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["newest", "middle"]);
        assert_eq!(events[0].donations, 5);

        assert!(db.get_events(GUILD + 1, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_stores_nothing() {
        let db = Database::in_memory().await.unwrap();

        db.add_player(GUILD, &player("#2PP", "Alice", 0, 0)).await.unwrap();
        db.add_player(GUILD, &player("#9QQ", "Bob", 0, 0)).await.unwrap();

        let event = DonationEvent {
            player_tag: "#2PP".to_string(),
            player_name: "Alice".to_string(),
            donations: 50,
            received: 0,
            time: Utc::now(),
        };
        // a count that does not fit the column makes the second update fail
        let live = vec![
            player("#2PP", "Alice", 50, 0),
            player("#9QQ", "Bob", u64::MAX, 0),
        ];

        assert!(db.record_refresh(GUILD, &[event.clone()], &live).await.is_err());

        assert!(db.get_events(GUILD, 10).await.unwrap().is_empty());
        let players = db.get_tracked_players(GUILD).await.unwrap();
        assert!(players.iter().all(|p| p.donations == 0));

        // the retried refresh records the change exactly once
        let live = vec![player("#2PP", "Alice", 50, 0)];
        db.record_refresh(GUILD, &[event], &live).await.unwrap();

        let events = db.get_events(GUILD, 10).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].donations, 50);
        let players = db.get_tracked_players(GUILD).await.unwrap();
        assert_eq!(players[0].player_name, "Alice");
        assert_eq!(players[0].donations, 50);
    }
}
