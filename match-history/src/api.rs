use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::config::Listener;
use crate::errors::HistoryError;
use crate::history::HistoryService;
use crate::region::PlatformRegion;
use crate::types::HistoryEntry;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub fn router(service: HistoryService) -> Router {
    Router::new()
        .route("/history", get(history))
        .route("/health", get(health))
        .with_state(service)
}

pub async fn serve(listener: &Listener, service: HistoryService) -> Result<(), ApiError> {
    let addr = format!("{}:{}", listener.host, listener.port);
    let tcp_listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Serving match history");

    axum::serve(tcp_listener, router(service)).await?;
    Ok(())
}

#[derive(Deserialize, Debug)]
struct Params {
    region: PlatformRegion,
    nickname: String,
    tag: String,
}

#[derive(Serialize)]
struct ApiErrorResponse {
    detail: &'static str,
}

async fn health() -> &'static str {
    "ok"
}

async fn history(
    State(service): State<HistoryService>,
    Query(params): Query<Params>,
) -> Result<Json<Vec<HistoryEntry>>, HistoryError> {
    service
        .get_history(params.region, &params.nickname, &params.tag)
        .await
        .map(Json)
}

impl IntoResponse for HistoryError {
    fn into_response(self) -> Response {
        let detail = match self {
            HistoryError::UpstreamTransport(_) => "Could not fetch upstream data",
            HistoryError::UpstreamStatus { .. } => "Upstream returned an error",
            HistoryError::Internal(_) => "Internal server error",
        };

        (self.status(), Json(ApiErrorResponse { detail })).into_response()
    }
}
