//! End-to-end scrape over a real listener.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::body::to_bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use upmetrics_gateway::app_state::AppState;
use upmetrics_gateway::obs::HookType;
use upmetrics_gateway::{config, ops, router};

fn state(yaml: &str) -> AppState {
    AppState::new(config::load_from_str(yaml).unwrap()).unwrap()
}

async fn get(app: axum::Router, path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let req = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn registers_all_families_once() {
    let st = state("version: 1\n");
    assert_eq!(st.descriptors().descriptors().len(), 9);
    assert!(st.descriptors().contains("tusd_connections_open"));
}

#[tokio::test]
async fn metrics_handler_renders_registry() {
    std::env::set_var("UPMETRICS_TEST_HOST_HANDLER", "handler-host");
    let st = state("version: 1\nmetrics:\n  process_label_env: UPMETRICS_TEST_HOST_HANDLER\n");

    let registry = st.registry();
    registry.increment_request("POST");
    registry.increment_error(404, "ERR_UPLOAD_NOT_FOUND");
    st.hooks().record_invocation(HookType::PostReceive);

    let resp = ops::metrics(State(st)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "text/plain; version=0.0.4; charset=utf-8"
    );

    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("tusd_requests_total{method=\"POST\",computername=\"handler-host\"} 1\n"));
    assert!(text.contains(
        "tusd_errors_total{status=\"404\",code=\"ERR_UPLOAD_NOT_FOUND\",computername=\"handler-host\"} 1\n"
    ));
    assert!(text.contains("tusd_hook_invocations_total{hooktype=\"post-receive\"} 1\n"));
}

#[tokio::test]
async fn scrape_counts_itself_as_open_connection() {
    std::env::set_var("UPMETRICS_TEST_HOST_SCRAPE", "scrape-host");
    let st = state(
        "version: 1\nmetrics:\n  path: /stats\n  process_label_env: UPMETRICS_TEST_HOST_SCRAPE\n",
    );
    let connections = st.connections().clone();
    let app = router::build_router(st);

    let resp = get(app, "/stats").await;
    assert!(resp.starts_with("HTTP/1.1 200"), "{resp}");
    assert!(resp.contains("tusd_connections_open{computername=\"scrape-host\"} 1\n"), "{resp}");
    assert_eq!(connections.get(), 0);
}

#[tokio::test]
async fn metrics_route_absent_when_not_exposed() {
    let app = router::build_router(state("version: 1\nmetrics:\n  expose: false\n"));
    let resp = get(app.clone(), "/metrics").await;
    assert!(resp.starts_with("HTTP/1.1 404"), "{resp}");

    let resp = get(app, "/healthz").await;
    assert!(resp.starts_with("HTTP/1.1 200"), "{resp}");
    assert!(resp.ends_with("ok"), "{resp}");
}
