use httpmock::prelude::*;
use list_fetcher::{FetchError, ScoreFetcher};
use serde_json::json;
use shared::Config;

fn fetcher_for(server: &MockServer) -> ScoreFetcher {
    let mut config = Config::default();
    config.services.myanimelist_url = server.url("/animelist/{username}/load.json");
    config.services.myanimelist.request_delay_ms = 0;
    ScoreFetcher::new(&config).unwrap()
}

#[tokio::test]
async fn test_offset_pagination_and_plan_to_watch() {
    let server = MockServer::start_async().await;

    let first = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/animelist/Xinil/load.json")
                .query_param("status", "7")
                .query_param("offset", "0");
            then.status(200).json_body(json!([
                { "anime_id": 1, "status": 2, "score": 8 },
                { "anime_id": 2, "status": 6, "score": 9 },
                { "anime_id": 3, "status": 1, "score": 0 }
            ]));
        })
        .await;

    let second = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/animelist/Xinil/load.json")
                .query_param("offset", "300");
            then.status(200)
                .json_body(json!([{ "anime_id": 4, "status": 4, "score": 3 }]));
        })
        .await;

    let last = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/animelist/Xinil/load.json")
                .query_param("offset", "600");
            then.status(200).json_body(json!([]));
        })
        .await;

    let scores = fetcher_for(&server)
        .get_scores(("Xinil", "MAL"), None)
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
    last.assert_async().await;
    assert_eq!(scores.len(), 2);
    assert_eq!(scores.get("1"), Some(&8));
    assert_eq!(scores.get("4"), Some(&3));
    assert!(!scores.contains_key("2"));
}

#[tokio::test]
async fn test_error_payload() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/animelist/nobody/load.json");
            then.status(400)
                .json_body(json!({ "errors": [{ "message": "invalid request" }] }));
        })
        .await;

    let result = fetcher_for(&server).get_scores("nobody", Some("M")).await;
    assert!(matches!(result, Err(FetchError::InvalidUser(_))));
}

#[tokio::test]
async fn test_empty_list() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/animelist/Xinil/load.json");
            then.status(200).json_body(json!([]));
        })
        .await;

    let result = fetcher_for(&server).get_scores("Xinil", Some("MYANIMELIST")).await;
    assert!(matches!(result, Err(FetchError::NoAffinity(_))));
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/animelist/Xinil/load.json");
            then.status(429);
        })
        .await;

    let result = fetcher_for(&server).get_scores("Xinil", Some("MAL")).await;
    assert!(matches!(result, Err(FetchError::RateLimitExceeded(_))));
}
