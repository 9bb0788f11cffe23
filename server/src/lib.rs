use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use parking_lot::{Mutex, RwLock};
use search_core::dedup::remove_duplicates;
use search_core::{
    Document, DocumentId, DocumentStatus, ExecutionPolicy, RequestQueue, SearchConfig, SearchError, SearchServer,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

type ApiError = (StatusCode, String);

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub policy: ExecutionPolicy,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<Document>,
}

#[derive(Deserialize)]
pub struct MatchParams {
    pub q: String,
    #[serde(default)]
    pub policy: ExecutionPolicy,
}

#[derive(Serialize)]
pub struct MatchResponse {
    pub document_id: DocumentId,
    pub words: Vec<String>,
    pub status: DocumentStatus,
}

#[derive(Deserialize)]
pub struct AddDocumentRequest {
    pub id: DocumentId,
    pub text: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub ratings: Vec<i32>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub document_count: usize,
    pub no_result_requests: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<SearchServer>>,
    pub history: Arc<Mutex<RequestQueue>>,
    pub admin_token: Option<String>,
}

pub fn build_app(config: &SearchConfig, admin_token: Option<String>) -> Result<Router> {
    let engine = SearchServer::with_config(config)?;
    let app_state = AppState {
        engine: Arc::new(RwLock::new(engine)),
        history: Arc::new(Mutex::new(RequestQueue::new(config.history_window))),
        admin_token,
    };

    let cors = cors_layer(std::env::var("CORS_ALLOW_ORIGIN").ok().as_deref());

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/stats", get(stats_handler))
        .route("/documents", post(add_document))
        .route("/documents/dedup", post(dedup_handler))
        .route("/documents/:doc_id", delete(remove_document))
        .route("/documents/:doc_id/match", get(match_handler))
        .route("/documents/:doc_id/frequencies", get(frequencies_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

/// Comma-separated origins restrict CORS to that list. Unset or unparsable
/// input allows any origin.
pub fn cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .into_iter()
        .flat_map(|list| list.split(','))
        .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
        .filter(|origin| !origin.is_empty())
        .collect();
    let allow_origin = if origins.is_empty() { AllowOrigin::any() } else { AllowOrigin::list(origins) };
    CorsLayer::new().allow_origin(allow_origin).allow_methods(Any).allow_headers(Any)
}

fn error_response(err: SearchError) -> ApiError {
    let status = match err {
        SearchError::NotFound(_) => StatusCode::NOT_FOUND,
        SearchError::DuplicateId(_) => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, err.to_string())
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let results = state
        .engine
        .read()
        .find_top_documents_by(params.policy, &params.q, params.status)
        .map_err(error_response)?;
    state.history.lock().record(&results);
    let elapsed = start.elapsed();
    Ok(Json(SearchResponse {
        query: params.q,
        took_s: elapsed.as_secs_f64(),
        total_hits: results.len(),
        results,
    }))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        document_count: state.engine.read().document_count(),
        no_result_requests: state.history.lock().no_result_requests(),
    })
}

pub async fn match_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<DocumentId>,
    Query(params): Query<MatchParams>,
) -> Result<Json<MatchResponse>, ApiError> {
    let (words, status) = state
        .engine
        .read()
        .match_document_with(params.policy, &params.q, doc_id)
        .map_err(error_response)?;
    Ok(Json(MatchResponse { document_id: doc_id, words, status }))
}

pub async fn frequencies_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<DocumentId>,
) -> Result<Json<BTreeMap<String, f64>>, ApiError> {
    let engine = state.engine.read();
    let freqs = engine.word_frequencies(doc_id).map_err(error_response)?;
    Ok(Json(freqs.clone()))
}

// --- Admin endpoints ---
async fn add_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(doc): Json<AddDocumentRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    authorize(&state, &headers)?;
    state
        .engine
        .write()
        .add_document(doc.id, &doc.text, doc.status, &doc.ratings)
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": doc.id }))))
}

async fn remove_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(doc_id): Path<DocumentId>,
) -> Result<StatusCode, ApiError> {
    authorize(&state, &headers)?;
    state.engine.write().remove_document_with(ExecutionPolicy::Parallel, doc_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn dedup_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    authorize(&state, &headers)?;
    let removed = remove_duplicates(&mut state.engine.write());
    Ok(Json(serde_json::json!({ "removed": removed })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(required) = &state.admin_token else {
        return Ok(());
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
