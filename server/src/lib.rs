use anyhow::Result;
use axum::{extract::{Query, State}, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use vsm_core::persist::{load_snapshot, IndexPaths};
use vsm_core::{search, InvertedIndex, SearchHit, SearchOptions, DEFAULT_TOP_K};

const MAX_K: usize = 100;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
    /// Soundex expansion of unknown terms; on unless `fallback=false`.
    #[serde(default = "default_fallback")]
    pub fallback: bool,
}
fn default_k() -> usize { DEFAULT_TOP_K }
fn default_fallback() -> bool { true }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

/// The index is never written after load, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<InvertedIndex>,
}

/// Load the snapshot under `index_dir` and build the router around it.
pub fn build_app(index_dir: String) -> Result<Router> {
    let (index, meta) = load_snapshot(&IndexPaths::new(&index_dir))?;
    tracing::info!(index_dir = %index_dir, num_docs = meta.num_docs, num_terms = meta.num_terms, created_at = %meta.created_at, "index loaded");
    Ok(build_router(Arc::new(index)))
}

pub fn build_router(index: Arc<InvertedIndex>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .with_state(AppState { index })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let k = params.k.clamp(1, MAX_K);

    // rank everything once so total_hits counts past the cut
    let options = SearchOptions { top_k: usize::MAX, phonetic_fallback: params.fallback };
    let mut results = search(&state.index, &params.q, &options);
    let total_hits = results.len();
    results.truncate(k);

    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results })
}
