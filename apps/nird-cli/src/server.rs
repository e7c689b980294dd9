//! HTTP front end using Axum.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use nird_core::config::Settings;
use nird_core::{Answer, Chunk, Dataset, DatasetMetadata, DatasetStats, Error, Retriever};
use nird_text::AnswerEngine;

/// Shared, read-only state: the engine is built once and never mutated.
pub struct AppState {
    pub engine: AnswerEngine,
    pub metadata: DatasetMetadata,
    pub stats: DatasetStats,
}

impl AppState {
    pub fn new(dataset: Dataset, settings: &Settings) -> Self {
        let stats = dataset.stats();
        let Dataset { metadata, chunks } = dataset;
        Self { engine: AnswerEngine::from_settings(chunks, settings), metadata, stats }
    }
}

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

#[derive(Serialize)]
struct DatasetView<'a> {
    metadata: &'a DatasetMetadata,
    chunks: &'a [Chunk],
}

/// Error body `{ "detail": ... }` with a status derived from the domain error.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self { Self(e) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::EmptyQuestion => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (status, Json(serde_json::json!({ "detail": self.0.to_string() }))).into_response()
    }
}

async fn welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "NIRD Semantic Search API est en ligne !",
        "utilisation": "POST /nird avec { \"question\": \"votre question\" }",
        "exemple": "curl -X POST http://127.0.0.1:8000/nird -H \"Content-Type: application/json\" -d '{\"question\": \"comment faire du reconditionnement ?\"}'",
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "chunks": state.engine.retriever().len() }))
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QuestionRequest>,
) -> Result<Json<Answer>, ApiError> {
    let answer = state.engine.answer(&payload.question)?;
    tracing::info!(chunk_id = answer.chunk_id, confiance = answer.confiance, "answered");
    Ok(Json(answer))
}

async fn data(State(state): State<Arc<AppState>>) -> Response {
    let view = DatasetView { metadata: &state.metadata, chunks: state.engine.retriever().chunks() };
    Json(view).into_response()
}

async fn data_stats(State(state): State<Arc<AppState>>) -> Json<DatasetStats> {
    Json(state.stats.clone())
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    build_router_from_arc(Arc::new(state))
}

pub fn build_router_from_arc(shared: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .route("/nird", post(ask))
        .route("/data", get(data))
        .route("/data/stats", get(data_stats))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, chunks = state.engine.retriever().len(), "NIRD API ready");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
    }
    tracing::info!("shutting down");
}
