//! Metric family descriptors.

use std::collections::HashSet;

use crate::error::{MetricsError, Result};

/// Label carrying the process-wide host identifier.
pub const PROCESS_LABEL: &str = "computername";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

/// Static description of one metric family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDesc {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    pub labels: &'static [&'static str],
}

pub const REQUESTS_TOTAL: MetricDesc = MetricDesc {
    name: "tusd_requests_total",
    help: "Total number of requests served by tusd per method.",
    kind: MetricKind::Counter,
    labels: &["method", PROCESS_LABEL],
};

pub const ERRORS_TOTAL: MetricDesc = MetricDesc {
    name: "tusd_errors_total",
    help: "Total number of errors per status.",
    kind: MetricKind::Counter,
    labels: &["status", "code", PROCESS_LABEL],
};

pub const BYTES_RECEIVED: MetricDesc = MetricDesc {
    name: "tusd_bytes_received",
    help: "Number of bytes received for uploads.",
    kind: MetricKind::Counter,
    labels: &[PROCESS_LABEL],
};

pub const UPLOADS_CREATED: MetricDesc = MetricDesc {
    name: "tusd_uploads_created",
    help: "Number of created uploads.",
    kind: MetricKind::Counter,
    labels: &[PROCESS_LABEL],
};

pub const UPLOADS_FINISHED: MetricDesc = MetricDesc {
    name: "tusd_uploads_finished",
    help: "Number of finished uploads.",
    kind: MetricKind::Counter,
    labels: &[PROCESS_LABEL],
};

pub const UPLOADS_TERMINATED: MetricDesc = MetricDesc {
    name: "tusd_uploads_terminated",
    help: "Number of terminated uploads.",
    kind: MetricKind::Counter,
    labels: &[PROCESS_LABEL],
};

/// Families produced by the counter registry, in export order.
pub const REGISTRY_FAMILIES: [MetricDesc; 6] = [
    REQUESTS_TOTAL,
    ERRORS_TOTAL,
    BYTES_RECEIVED,
    UPLOADS_FINISHED,
    UPLOADS_CREATED,
    UPLOADS_TERMINATED,
];

/// Startup-time registry of family names.
///
/// Registering the same name twice is a configuration bug; callers are
/// expected to abort boot on the error.
#[derive(Debug, Default)]
pub struct DescriptorSet {
    names: HashSet<&'static str>,
    descs: Vec<MetricDesc>,
}

impl DescriptorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set pre-populated with the registry families.
    pub fn with_registry_families() -> Result<Self> {
        let mut set = Self::new();
        for desc in REGISTRY_FAMILIES {
            set.register(desc)?;
        }
        Ok(set)
    }

    pub fn register(&mut self, desc: MetricDesc) -> Result<()> {
        if !self.names.insert(desc.name) {
            return Err(MetricsError::DuplicateDescriptor(desc.name.to_string()));
        }
        self.descs.push(desc);
        Ok(())
    }

    /// Ok when `desc` was registered with exactly this descriptor.
    pub fn check(&self, desc: &MetricDesc) -> Result<()> {
        match self.descs.iter().find(|d| d.name == desc.name) {
            Some(d) if d == desc => Ok(()),
            _ => Err(MetricsError::UnregisteredFamily(desc.name.to_string())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn descriptors(&self) -> &[MetricDesc] {
        &self.descs
    }
}
