use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;
use vsm_core::build_index;
use vsm_core::persist::{save_snapshot, IndexPaths};

fn tiny_index() -> vsm_core::InvertedIndex {
    build_index([
        ("doc0", "rust rust systems"),
        ("doc1", "learning rust"),
        ("doc2", "gardening tips"),
        ("doc3", "robert wrote this"),
    ])
    .unwrap()
}

async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn doc_ids(json: &Value) -> Vec<String> {
    json["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["doc_id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    save_snapshot(&IndexPaths::new(dir.path()), &tiny_index()).unwrap();
    let app = server::build_app(dir.path().to_string_lossy().to_string()).unwrap();

    let (status, json) = call(app, "/search?q=rust&k=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc_ids(&json), ["doc0", "doc1"]);
    assert_eq!(json["total_hits"], 2);
    let s0 = json["results"][0]["score"].as_f64().unwrap();
    let s1 = json["results"][1]["score"].as_f64().unwrap();
    assert!(s0 > s1 && s1 > 0.0);
}

#[tokio::test]
async fn k_is_clamped_and_total_hits_counts_everything() {
    let app = server::build_router(Arc::new(tiny_index()));
    let (_, json) = call(app, "/search?q=rust&k=0").await;
    assert_eq!(doc_ids(&json), ["doc0"]);
    assert_eq!(json["total_hits"], 2);
}

#[tokio::test]
async fn phonetic_fallback_can_be_disabled() {
    let app = server::build_router(Arc::new(tiny_index()));
    let (_, json) = call(app.clone(), "/search?q=rupert").await;
    assert_eq!(doc_ids(&json), ["doc3"]);

    let (_, json) = call(app, "/search?q=rupert&fallback=false").await;
    assert!(doc_ids(&json).is_empty());
}

#[tokio::test]
async fn concurrent_queries_share_the_index() {
    let app = server::build_router(Arc::new(tiny_index()));
    let queries = ["rust", "gardening", "robert", "rupert", "zzz"];
    let handles: Vec<_> = (0..20)
        .map(|i| {
            let app = app.clone();
            let q = queries[i % queries.len()];
            tokio::spawn(async move { (q, call(app, &format!("/search?q={q}")).await) })
        })
        .collect();
    for h in handles {
        let (q, (status, json)) = h.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["query"], q);
        assert_eq!(doc_ids(&json).is_empty(), q == "zzz");
    }
}

#[tokio::test]
async fn health_and_missing_index() {
    let app = server::build_router(Arc::new(tiny_index()));
    let req = Request::get("/health").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let dir = tempdir().unwrap();
    assert!(server::build_app(dir.path().to_string_lossy().to_string()).is_err());
}
