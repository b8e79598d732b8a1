#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use upmetrics_core::MetricsError;
use upmetrics_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
metrics:
  pth: "/stats" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(matches!(err, MetricsError::BadConfig(_)), "got {err}");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8080");
    assert!(cfg.metrics.expose);
    assert_eq!(cfg.metrics.path, "/metrics");
    assert_eq!(cfg.metrics.process_label_env, "COMPUTERNAME");
}

#[test]
fn rejects_unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert!(matches!(err, MetricsError::UnsupportedVersion));
}

#[test]
fn rejects_bad_values() {
    let cases = [
        "version: 1\nserver:\n  listen: \"not-an-addr\"\n",
        "version: 1\nmetrics:\n  path: \"metrics\"\n",
        "version: 1\nmetrics:\n  path: \"/healthz\"\n",
        "version: 1\nmetrics:\n  process_label_env: \"  \"\n",
    ];
    for yaml in cases {
        let err = config::load_from_str(yaml).expect_err("must fail");
        assert!(matches!(err, MetricsError::BadConfig(_)), "yaml={yaml:?} got {err}");
    }
}

#[test]
fn missing_file_is_internal_error() {
    let err = config::load_from_file("/nonexistent/upmetrics.yaml").expect_err("must fail");
    assert!(matches!(err, MetricsError::Internal(_)));
}
