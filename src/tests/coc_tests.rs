#[cfg(test)]
pub mod tests {
    use crate::utils::coc::{CocClient, CocError, normalize_tag};
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use regex::Regex;
    use serde_json::json;

    fn player_json(tag: &str, name: &str, donations: u64, received: u64) -> serde_json::Value {
        json!({
            "tag": tag,
            "name": name,
            "townHallLevel": 12,
            "donations": donations,
            "donationsReceived": received,
            "clan": { "tag": "#CLAN", "name": "Clashers", "clanLevel": 10 }
        })
    }

    // Group 1: tag normalization
    mod tag_tests {
        use super::*;

        #[test]
        fn test_normalize_adds_prefix_and_uppercases() {
            assert_eq!(normalize_tag("2pp").unwrap(), "#2PP");
            assert_eq!(normalize_tag("#2pp").unwrap(), "#2PP");
            assert_eq!(normalize_tag("  #9QQ  ").unwrap(), "#9QQ");
        }

        #[test]
        fn test_normalize_reads_letter_o_as_zero() {
            assert_eq!(normalize_tag("#2oo").unwrap(), "#200");
        }

        #[test]
        fn test_normalize_rejects_invalid_characters() {
            assert!(matches!(normalize_tag("#ABC"), Err(CocError::InvalidTag(_))));
            assert!(matches!(normalize_tag(""), Err(CocError::InvalidTag(_))));
            assert!(matches!(normalize_tag("#"), Err(CocError::InvalidTag(_))));
        }
    }

    // Group 2: API request tests
    mod api_request_tests {
        use super::*;

        #[tokio::test]
        async fn test_get_player_success() {
            let server = MockServer::start_async().await;
            let mock = server
                .mock_async(|when, then| {
                    when.method(GET)
                        .path_matches(Regex::new("/v1/players/.*2PP$").unwrap())
                        .header("authorization", "Bearer secret");
                    then.status(200)
                        .json_body(player_json("#2PP", "Alice", 120, 30));
                })
                .await;

            let client = CocClient::new(&server.base_url(), "secret").unwrap();
            let player = client.get_player("2pp").await.unwrap();

            mock.assert_async().await;
            assert_eq!(player.tag, "#2PP");
            assert_eq!(player.name, "Alice");
            assert_eq!(player.donations, 120);
            assert_eq!(player.received, 30);
            assert_eq!(player.clan.map(|c| c.name).as_deref(), Some("Clashers"));
        }

        #[tokio::test]
        async fn test_get_player_not_found() {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method(GET).path_matches(Regex::new("9QQ$").unwrap());
                    then.status(404)
                        .json_body(json!({ "reason": "notFound" }));
                })
                .await;

            let client = CocClient::new(&server.base_url(), "secret").unwrap();
            let result = client.get_player("#9QQ").await;
            assert!(matches!(result, Err(CocError::NotFound(tag)) if tag == "#9QQ"));
        }

        #[tokio::test]
        async fn test_get_player_server_error() {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method(GET);
                    then.status(503);
                })
                .await;

            let client = CocClient::new(&server.base_url(), "secret").unwrap();
            let result = client.get_player("#2PP").await;
            assert!(matches!(result, Err(CocError::Network(_))));
        }

        #[tokio::test]
        async fn test_get_player_invalid_tag_skips_request() {
            let server = MockServer::start_async().await;
            let mock = server
                .mock_async(|when, then| {
                    when.method(GET);
                    then.status(200);
                })
                .await;

            let client = CocClient::new(&server.base_url(), "secret").unwrap();
            let result = client.get_player("not a tag").await;

            assert!(matches!(result, Err(CocError::InvalidTag(_))));
            mock.assert_hits_async(0).await;
        }

        #[tokio::test]
        async fn test_get_players_fetches_every_tag() {
            let server = MockServer::start_async().await;
            for (tag, name) in [("2PP", "Alice"), ("9QQ", "Bob"), ("8LL", "Carol")] {
                server
                    .mock_async(|when, then| {
                        when.method(GET)
                            .path_matches(Regex::new(&format!("{tag}$")).unwrap());
                        then.status(200)
                            .json_body(player_json(&format!("#{tag}"), name, 1, 2));
                    })
                    .await;
            }

            let client = CocClient::new(&server.base_url(), "secret").unwrap();
            let tags = vec!["#2PP".to_string(), "#9QQ".to_string(), "#8LL".to_string()];
            let players = client.get_players(&tags).await.unwrap();

            let mut names: Vec<_> = players.iter().map(|p| p.name.as_str()).collect();
            names.sort();
            assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
        }

        #[tokio::test]
        async fn test_get_players_fails_when_one_lookup_fails() {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method(GET).path_matches(Regex::new("2PP$").unwrap());
                    then.status(200)
                        .json_body(player_json("#2PP", "Alice", 1, 2));
                })
                .await;
            server
                .mock_async(|when, then| {
                    when.method(GET).path_matches(Regex::new("9QQ$").unwrap());
                    then.status(404);
                })
                .await;

            let client = CocClient::new(&server.base_url(), "secret").unwrap();
            let tags = vec!["#2PP".to_string(), "#9QQ".to_string()];
            let result = client.get_players(&tags).await;
            assert!(matches!(result, Err(CocError::NotFound(_))));
        }

        #[tokio::test]
        async fn test_get_existing_players_skips_deleted_players() {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method(GET).path_matches(Regex::new("2PP$").unwrap());
                    then.status(200)
                        .json_body(player_json("#2PP", "Alice", 1, 2));
                })
                .await;
            server
                .mock_async(|when, then| {
                    when.method(GET).path_matches(Regex::new("9QQ$").unwrap());
                    then.status(404)
                        .json_body(json!({ "reason": "notFound" }));
                })
                .await;

            let client = CocClient::new(&server.base_url(), "secret").unwrap();
            let tags = vec!["#2PP".to_string(), "#9QQ".to_string()];
            let lookup = client.get_existing_players(&tags).await.unwrap();

            assert_eq!(lookup.found.len(), 1);
            assert_eq!(lookup.found[0].name, "Alice");
            assert_eq!(lookup.missing, vec!["#9QQ".to_string()]);
        }

        #[tokio::test]
        async fn test_get_existing_players_still_fails_on_server_error() {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method(GET).path_matches(Regex::new("2PP$").unwrap());
                    then.status(404);
                })
                .await;
            server
                .mock_async(|when, then| {
                    when.method(GET).path_matches(Regex::new("9QQ$").unwrap());
                    then.status(503);
                })
                .await;

            let client = CocClient::new(&server.base_url(), "secret").unwrap();
            let tags = vec!["#2PP".to_string(), "#9QQ".to_string()];
            let result = client.get_existing_players(&tags).await;
            assert!(matches!(result, Err(CocError::Network(_))));
        }
    }
}
