//! upmetrics gateway binary.
//!
//! Loads the YAML config (first argument, default `upmetrics.yaml`), builds
//! the shared state and serves `/healthz` and the metrics route until
//! SIGINT/SIGTERM.

use tracing_subscriber::{fmt, EnvFilter};

use upmetrics_gateway::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "upmetrics.yaml".into());
    let cfg = config::load_from_file(&path).expect("config load failed");
    let listen = cfg.server.listen_addr().expect("server.listen validated at load");

    // Duplicate metric families are a programming error: refuse to boot.
    let state = app_state::AppState::new(cfg).expect("metric registration failed");
    let app = router::build_router(state);

    tracing::info!(%listen, "upmetrics-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
