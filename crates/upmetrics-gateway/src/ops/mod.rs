//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness
//! - `/metrics` : Prometheus text format (path is configurable)

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;
use crate::obs::exposition;

pub const HEALTHZ_PATH: &str = "/healthz";

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let snapshot = match state.collector().collect() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(error = %e, "metrics snapshot failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "metrics snapshot failed")
                .into_response();
        }
    };
    let body = exposition::render(&snapshot);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, exposition::CONTENT_TYPE)],
        body,
    )
        .into_response()
}

/// Hold an open-connections guard for the lifetime of each request.
/// The gauge therefore reads in-flight requests, not idle keep-alive sockets.
pub async fn track_connections(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let _guard = state.connections().open();
    next.run(req).await
}
