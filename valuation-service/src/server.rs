// Thin HTTP shell over the orchestrator.
//
// One real route: `POST /api/valuation`. The handler validates the body,
// hands the typed request to the orchestrator, and renders either the
// result envelope or the error envelope. No decision logic lives here.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ValuationError;
use crate::gateway::MarketData;
use crate::orchestrator::Orchestrator;
use crate::request::{self, RawValuationRequest};

pub struct AppState<G> {
    pub orchestrator: Orchestrator<G>,
}

/// The JSON error envelope: the caller always gets this or a result, never
/// a raw stack trace.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(err: &ValuationError) -> Response {
    let status = match err {
        ValuationError::Validation { .. } | ValuationError::PostcodeFormat(_) => {
            StatusCode::BAD_REQUEST
        }
        ValuationError::NoRentalData | ValuationError::NoSaleData => StatusCode::NOT_FOUND,
        ValuationError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
        .into_response()
}

async fn valuation<G: MarketData>(
    State(state): State<Arc<AppState<G>>>,
    Json(raw): Json<RawValuationRequest>,
) -> Response {
    let req = match request::validate(raw) {
        Ok(req) => req,
        Err(e) => return error_response(&e),
    };

    match state.orchestrator.appraise(&req).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn health() -> &'static str {
    "ok"
}

pub fn router<G: MarketData + 'static>(state: Arc<AppState<G>>) -> Router {
    Router::new()
        .route("/api/valuation", post(valuation::<G>))
        .route("/api/health", get(health))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
pub async fn serve<G: MarketData + 'static>(
    bind: &str,
    state: Arc<AppState<G>>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
