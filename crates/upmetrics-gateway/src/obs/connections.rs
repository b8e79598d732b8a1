//! Open-connections gauge, maintained by the request layer.
//!
//! The gauge counts in-flight HTTP requests: the router holds one guard per
//! request, from the moment it reaches the middleware until the handler has
//! produced its response. An idle keep-alive connection between requests is
//! not counted. The family keeps the `tusd_connections_open` name and help
//! text so existing dashboards continue to work.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use upmetrics_core::descriptor::PROCESS_LABEL;
use upmetrics_core::error::Result;
use upmetrics_core::{MetricDesc, MetricFamily, MetricKind, MetricValue};

pub const CONNECTIONS_OPEN: MetricDesc = MetricDesc {
    name: "tusd_connections_open",
    help: "Current number of open connections.",
    kind: MetricKind::Gauge,
    labels: &[PROCESS_LABEL],
};

#[derive(Clone, Default)]
pub struct ConnectionGauge {
    open: Arc<AtomicI64>,
}

impl ConnectionGauge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one in-flight request until the returned guard is dropped.
    pub fn open(&self) -> ConnectionGuard {
        self.open.fetch_add(1, Ordering::Relaxed);
        ConnectionGuard {
            open: Arc::clone(&self.open),
        }
    }

    pub fn get(&self) -> i64 {
        self.open.load(Ordering::Relaxed)
    }

    pub fn family(&self, process_label: &str) -> Result<MetricFamily> {
        let mut family = MetricFamily::new(CONNECTIONS_OPEN);
        family.push(
            vec![process_label.to_string()],
            MetricValue::Gauge(self.get()),
        )?;
        Ok(family)
    }
}

/// Decrements the gauge on drop.
pub struct ConnectionGuard {
    open: Arc<AtomicI64>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::Relaxed);
    }
}
