#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use upmetrics_core::{build_snapshot, CounterRegistry, FixedCounter, MetricValue};
use upmetrics_gateway::obs::exposition::render;
use upmetrics_gateway::obs::{
    Collector, ConnectionGauge, HookMetrics, HookType, GATEWAY_FAMILIES,
};

#[test]
fn renders_counters_with_help_and_type() {
    let registry = CounterRegistry::new();
    registry.increment_request("GET");
    registry.increment_request("GET");
    registry.increment_error(500, "E_INTERNAL");
    registry.add_bytes_received(1024);
    registry.increment(FixedCounter::UploadsCreated);

    let out = render(&build_snapshot(&registry, "web-1").unwrap());

    assert!(out.contains("# HELP tusd_requests_total Total number of requests served by tusd per method.\n"));
    assert!(out.contains("# TYPE tusd_requests_total counter\n"));
    assert!(out.contains("tusd_requests_total{method=\"GET\",computername=\"web-1\"} 2\n"));
    assert!(out.contains(
        "tusd_errors_total{status=\"500\",code=\"E_INTERNAL\",computername=\"web-1\"} 1\n"
    ));
    assert!(out.contains("tusd_bytes_received{computername=\"web-1\"} 1024\n"));
    assert!(out.contains("tusd_uploads_created{computername=\"web-1\"} 1\n"));
    assert!(out.contains("tusd_uploads_terminated{computername=\"web-1\"} 0\n"));
}

#[test]
fn empty_dynamic_families_are_omitted() {
    let out = render(&build_snapshot(&CounterRegistry::new(), "").unwrap());
    assert!(!out.contains("tusd_requests_total"));
    assert!(!out.contains("tusd_errors_total"));
    assert!(out.contains("tusd_uploads_finished{computername=\"\"} 0\n"));
}

#[test]
fn label_values_are_escaped() {
    let registry = CounterRegistry::new();
    registry.increment_error(400, "bad \"quote\"\\\n");

    let out = render(&build_snapshot(&registry, "h").unwrap());
    assert!(out.contains(r#"code="bad \"quote\"\\\n""#), "{out}");
}

#[test]
fn collector_merges_gauge_and_hooks() {
    let registry = Arc::new(CounterRegistry::new());
    let hooks = Arc::new(HookMetrics::new());
    let connections = ConnectionGauge::new();
    std::env::set_var("UPMETRICS_TEST_HOST_MERGE", "node-7");

    let collector = Collector::new(
        Arc::clone(&registry),
        connections.clone(),
        Arc::clone(&hooks),
        "UPMETRICS_TEST_HOST_MERGE",
    )
    .unwrap();

    hooks.record_invocation(HookType::PreCreate);
    hooks.record_invocation(HookType::PreCreate);
    hooks.record_error(HookType::PostFinish);
    let a = connections.open();
    let b = connections.open();
    drop(a);

    let out = render(&collector.collect().unwrap());
    assert!(out.contains("# TYPE tusd_connections_open gauge\n"));
    assert!(out.contains("tusd_connections_open{computername=\"node-7\"} 1\n"));
    assert!(out.contains("tusd_hook_invocations_total{hooktype=\"pre-create\"} 2\n"));
    assert!(out.contains("tusd_hook_errors_total{hooktype=\"post-finish\"} 1\n"));

    drop(b);
    assert_eq!(connections.get(), 0);
}

#[test]
fn process_label_is_read_per_scrape() {
    let collector = Collector::new(
        Arc::new(CounterRegistry::new()),
        ConnectionGauge::new(),
        Arc::new(HookMetrics::new()),
        "UPMETRICS_TEST_HOST_FRESH",
    )
    .unwrap();

    std::env::remove_var("UPMETRICS_TEST_HOST_FRESH");
    let before = render(&collector.collect().unwrap());
    assert!(before.contains("tusd_bytes_received{computername=\"\"} 0\n"));

    std::env::set_var("UPMETRICS_TEST_HOST_FRESH", "renamed");
    let after = render(&collector.collect().unwrap());
    assert!(after.contains("tusd_bytes_received{computername=\"renamed\"} 0\n"));
}

#[test]
fn collector_emits_each_registered_family_once() {
    let registry = Arc::new(CounterRegistry::new());
    registry.increment_request("GET");
    registry.increment_error(500, "E_INTERNAL");
    let hooks = Arc::new(HookMetrics::new());
    hooks.record_invocation(HookType::PostCreate);
    hooks.record_error(HookType::PostCreate);

    let collector = Collector::new(
        registry,
        ConnectionGauge::new(),
        hooks,
        "UPMETRICS_TEST_HOST_ONCE",
    )
    .unwrap();
    let snap = collector.collect().unwrap();

    let registered: Vec<_> = collector
        .descriptors()
        .descriptors()
        .iter()
        .map(|d| d.name)
        .collect();
    let emitted: Vec<_> = snap.families().iter().map(|f| f.name()).collect();
    assert_eq!(emitted, registered);
    assert_eq!(registered.len(), 6 + GATEWAY_FAMILIES.len());

    let out = render(&snap);
    for name in registered {
        let type_lines = out
            .lines()
            .filter(|l| l.starts_with(&format!("# TYPE {name} ")))
            .count();
        assert_eq!(type_lines, 1, "family={name}\n{out}");
    }
}

#[test]
fn connection_gauge_counts_only_live_guards() {
    let gauge = ConnectionGauge::new();
    let guards: Vec<_> = (0..3).map(|_| gauge.open()).collect();
    assert_eq!(gauge.get(), 3);
    drop(guards);
    assert_eq!(gauge.get(), 0);

    let family = gauge.family("h").unwrap();
    assert_eq!(family.records()[0].value, MetricValue::Gauge(0));
}
