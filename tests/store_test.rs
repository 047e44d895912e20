use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use jalrakshak::complaints;
use jalrakshak::dashboard::Summary;
use jalrakshak::store::{FirebaseStore, RealtimeStore};

type Tokens = Arc<Mutex<Vec<Option<String>>>>;

/// A fake realtime database. `fraudsDetected` fails and
/// `reportedComplaints` does not exist at all.
async fn spawn() -> (String, Tokens) {
    let tokens: Tokens = Arc::default();
    let app = Router::new()
        .route(
            "/WaterSaved.json",
            get(
                |State(tokens): State<Tokens>, Query(q): Query<HashMap<String, String>>| async move {
                    tokens.lock().unwrap().push(q.get("auth").cloned());
                    Json(json!(1200))
                },
            ),
        )
        .route("/activeSensors.json", get(|| async { Json(Value::Null) }))
        .route("/leaksDetected.json", get(|| async { Json(json!("7")) }))
        .route(
            "/fraudsDetected.json",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route(
            "/Complains.json",
            get(|| async {
                Json(json!({
                    "-Nq1": {
                        "date": "2024-02-11",
                        "description": "Pipe leaking near market",
                        "imageUrl": "https://img.test/leak.jpg",
                        "location": "Ward 3",
                        "type": "Leakage"
                    },
                    "-Nq2": {
                        "date": "2024-02-12",
                        "description": "Yellow tap water",
                        "location": "Ward 7",
                        "type": "Quality"
                    }
                }))
            }),
        )
        .with_state(tokens.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (format!("http://{addr}"), tokens)
}

#[tokio::test]
async fn dashboard_fills_present_keys_and_keeps_defaults() {
    let (base, _) = spawn().await;
    let store = FirebaseStore::new(format!("{base}/"), None);

    let summary = Summary::fetch(&store).await;

    assert_eq!(summary.water_saved, "1200");
    assert_eq!(summary.leaks_detected, "7");
    // null value
    assert_eq!(summary.active_sensors, "38");
    // server error
    assert_eq!(summary.frauds_detected, "6");
    // no such route
    assert_eq!(summary.reported_complaints, "4");
}

#[tokio::test]
async fn token_is_sent_as_auth_parameter() {
    let (base, tokens) = spawn().await;
    let store = FirebaseStore::new(base.clone(), Some("s3cr3t".to_string()));
    store.get("WaterSaved").await.unwrap();

    let anonymous = FirebaseStore::new(base, Some(String::new()));
    anonymous.get("WaterSaved").await.unwrap();

    let seen = tokens.lock().unwrap().clone();
    assert_eq!(seen, vec![Some("s3cr3t".to_string()), None]);
}

#[tokio::test]
async fn failing_path_is_an_error_and_null_is_absent() {
    let (base, _) = spawn().await;
    let store = FirebaseStore::new(base, None);
    assert!(store.get("fraudsDetected").await.is_err());
    assert!(store.get("activeSensors").await.unwrap().is_none());
}

#[tokio::test]
async fn complaints_are_read_from_the_collection() {
    let (base, _) = spawn().await;
    let store = FirebaseStore::new(base, None);

    let list = complaints::fetch(&store).await.unwrap();

    assert_eq!(list.len(), 2);
    let leak = list.iter().find(|c| c.id == "-Nq1").unwrap();
    assert_eq!(leak.kind, "Leakage");
    assert_eq!(leak.image_url.as_deref(), Some("https://img.test/leak.jpg"));
    let quality = list.iter().find(|c| c.id == "-Nq2").unwrap();
    assert!(quality.image_url.is_none());
    assert_eq!(quality.location, "Ward 7");
}
