//! Axum router wiring.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new().route(ops::HEALTHZ_PATH, get(ops::healthz));

    let metrics = &state.cfg().metrics;
    if metrics.expose {
        tracing::info!(path = %metrics.path, "using metrics path");
        router = router.route(&metrics.path, get(ops::metrics));
    } else {
        tracing::info!("metrics exposition disabled");
    }

    router
        .layer(middleware::from_fn_with_state(state.clone(), ops::track_connections))
        .with_state(state)
}
