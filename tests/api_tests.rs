use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;

use movie_recommender::{
    api::{create_router, AppState},
    load_ratings, AppError, RatingsArtifact, RatingsMatrix, RatingsStore, Recommender,
};

fn sample_matrix() -> RatingsMatrix {
    let entries: [(&str, [f64; 3]); 4] = [
        ("A", [5.0, 0.0, 0.0]),
        ("B", [5.0, 0.0, 0.0]),
        ("C", [0.0, 5.0, 0.0]),
        ("D", [0.0, 0.0, 5.0]),
    ];
    RatingsMatrix::new(
        entries.iter().map(|(t, _)| t.to_string()).collect(),
        entries.iter().map(|(_, r)| r.to_vec()).collect(),
    )
    .unwrap()
}

fn create_test_server() -> TestServer {
    let recommender = Arc::new(Recommender::prepare(Arc::new(sample_matrix())));
    let app = create_router(AppState::new(recommender));
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_list_movies_in_catalog_order() {
    let server = create_test_server();
    let response = server.get("/movies").await;
    response.assert_status_ok();
    let movies: Vec<String> = response.json();
    assert_eq!(movies, vec!["A", "B", "C", "D"]);
}

#[tokio::test]
async fn test_recommendations_ranked_with_ties_in_row_order() {
    let server = create_test_server();
    let response = server
        .get("/recommendations")
        .add_query_param("title", "A")
        .add_query_param("k", 3)
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "A");

    let recs = body["recommendations"].as_array().unwrap();
    let titles: Vec<&str> = recs.iter().map(|r| r["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["B", "C", "D"]);
    assert_eq!(recs[0]["rank"], 1);
    assert_eq!(recs[2]["rank"], 3);
}

#[tokio::test]
async fn test_recommendations_default_k_on_small_catalog() {
    let server = create_test_server();
    let response = server
        .get("/recommendations")
        .add_query_param("title", "D")
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    // Default of five, but only three other movies exist
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unknown_title_is_not_found() {
    let server = create_test_server();
    let response = server
        .get("/recommendations")
        .add_query_param("title", "Nope")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "unknown_title");
}

#[tokio::test]
async fn test_k_above_limit_is_rejected() {
    let server = create_test_server();
    let response = server
        .get("/recommendations")
        .add_query_param("title", "A")
        .add_query_param("k", 1000)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

async fn open_session(server: &TestServer) -> String {
    let response = server.post("/sessions").await;
    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_malformed_k_returns_json_error() {
    let server = create_test_server();

    for bad_k in ["-1", "abc"] {
        let response = server
            .get("/recommendations")
            .add_query_param("title", "A")
            .add_query_param("k", bad_k)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["kind"], "invalid_input");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_missing_title_returns_json_error() {
    let server = create_test_server();
    let response = server.get("/recommendations").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "invalid_input");
}

#[tokio::test]
async fn test_history_records_successful_queries_only() {
    let server = create_test_server();
    let session = open_session(&server).await;

    server
        .get("/recommendations")
        .add_query_param("title", "C")
        .add_query_param("session_id", &session)
        .await
        .assert_status_ok();
    server
        .get("/recommendations")
        .add_query_param("title", "Missing")
        .add_query_param("session_id", &session)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/recommendations")
        .add_query_param("title", "A")
        .add_query_param("session_id", &session)
        .await
        .assert_status_ok();

    let history: Vec<String> = server
        .get(&format!("/sessions/{session}/history"))
        .await
        .json();
    assert_eq!(history, vec!["C", "A"]);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let server = create_test_server();
    let alice = open_session(&server).await;
    let bob = open_session(&server).await;
    assert_ne!(alice, bob);

    server
        .get("/recommendations")
        .add_query_param("title", "B")
        .add_query_param("session_id", &alice)
        .await
        .assert_status_ok();
    server
        .post(&format!("/sessions/{alice}/watchlist"))
        .json(&json!({ "title": "D" }))
        .await
        .assert_status(StatusCode::CREATED);

    // Anonymous queries are not recorded anywhere
    server
        .get("/recommendations")
        .add_query_param("title", "C")
        .await
        .assert_status_ok();

    let alice_history: Vec<String> = server
        .get(&format!("/sessions/{alice}/history"))
        .await
        .json();
    let bob_history: Vec<String> = server
        .get(&format!("/sessions/{bob}/history"))
        .await
        .json();
    let bob_watchlist: Vec<String> = server
        .get(&format!("/sessions/{bob}/watchlist"))
        .await
        .json();

    assert_eq!(alice_history, vec!["B"]);
    assert!(bob_history.is_empty());
    assert!(bob_watchlist.is_empty());
}

#[tokio::test]
async fn test_unknown_or_malformed_session() {
    let server = create_test_server();

    let response = server
        .get("/sessions/00000000-0000-0000-0000-000000000000/history")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "not_found");

    let response = server
        .get("/recommendations")
        .add_query_param("title", "A")
        .add_query_param("session_id", "00000000-0000-0000-0000-000000000000")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server.get("/sessions/not-a-uuid/history").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "invalid_input");
}

#[tokio::test]
async fn test_closed_session_is_gone() {
    let server = create_test_server();
    let session = open_session(&server).await;

    server
        .delete(&format!("/sessions/{session}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/sessions/{session}/watchlist"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_watchlist_flow() {
    let server = create_test_server();
    let session = open_session(&server).await;
    let watchlist_path = format!("/sessions/{session}/watchlist");

    let response = server
        .post(&watchlist_path)
        .json(&json!({ "title": "B" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    // Adding twice is not an error
    let response = server
        .post(&watchlist_path)
        .json(&json!({ "title": "B" }))
        .await;
    response.assert_status_ok();

    let response = server
        .post(&watchlist_path)
        .json(&json!({ "title": "Not In Catalog" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let watchlist: Vec<String> = server.get(&watchlist_path).await.json();
    assert_eq!(watchlist, vec!["B"]);

    server
        .delete(&format!("{watchlist_path}/B"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete(&format!("{watchlist_path}/B"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_end_to_end_from_artifact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("movies_pivot.bin");
    RatingsArtifact {
        titles: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        ratings: vec![
            vec![5.0, 0.0, 0.0],
            vec![5.0, 0.0, 0.0],
            vec![0.0, 5.0, 0.0],
            vec![0.0, 0.0, 5.0],
        ],
    }
    .save_bin(&path)
    .unwrap();

    let store = RatingsStore::new(&path);
    let recommender = Recommender::prepare(store.load().unwrap());
    assert_eq!(recommender.recommend("A", 3).unwrap(), vec!["B", "C", "D"]);
}

#[test]
fn test_missing_artifact_stops_startup() {
    let dir = TempDir::new().unwrap();
    let result = load_ratings(dir.path().join("does-not-exist.bin"));

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::ArtifactNotFound(_)));
    assert!(err.is_load_error());
}
