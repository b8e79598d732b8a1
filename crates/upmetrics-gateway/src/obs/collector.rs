//! Scrape-time collector: one snapshot per call.
//!
//! The collector owns the descriptor set. Every family it emits must be
//! registered there with the same descriptor, and every registered family
//! must be emitted, so the exposition never carries an unknown or repeated
//! family.

use std::sync::Arc;

use upmetrics_core::error::{MetricsError, Result};
use upmetrics_core::{build_snapshot, CounterRegistry, DescriptorSet, MetricDesc, Snapshot};

use super::connections::CONNECTIONS_OPEN;
use super::hooks::{HOOK_ERRORS_TOTAL, HOOK_INVOCATIONS_TOTAL};
use super::{ConnectionGauge, HookMetrics};

/// Families maintained by the gateway next to the registry's own.
pub const GATEWAY_FAMILIES: [MetricDesc; 3] =
    [CONNECTIONS_OPEN, HOOK_INVOCATIONS_TOTAL, HOOK_ERRORS_TOTAL];

pub struct Collector {
    registry: Arc<CounterRegistry>,
    connections: ConnectionGauge,
    hooks: Arc<HookMetrics>,
    descriptors: DescriptorSet,
    label_env: String,
}

impl Collector {
    /// Fails with `DuplicateDescriptor` when two families share a name.
    pub fn new(
        registry: Arc<CounterRegistry>,
        connections: ConnectionGauge,
        hooks: Arc<HookMetrics>,
        label_env: impl Into<String>,
    ) -> Result<Self> {
        let mut descriptors = DescriptorSet::with_registry_families()?;
        for desc in GATEWAY_FAMILIES {
            descriptors.register(desc)?;
        }

        Ok(Self {
            registry,
            connections,
            hooks,
            descriptors,
            label_env: label_env.into(),
        })
    }

    pub fn descriptors(&self) -> &DescriptorSet {
        &self.descriptors
    }

    /// Build a fresh snapshot. The process label is re-read from the
    /// environment on every call.
    pub fn collect(&self) -> Result<Snapshot> {
        let label = process_label(&self.label_env);

        let mut snapshot = build_snapshot(&self.registry, &label)?;
        snapshot.push_family(self.connections.family(&label)?)?;
        for family in self.hooks.families()? {
            snapshot.push_family(family)?;
        }
        self.verify(&snapshot)?;

        tracing::trace!(
            families = snapshot.families().len(),
            records = snapshot.record_count(),
            "collected metrics snapshot"
        );
        Ok(snapshot)
    }

    fn verify(&self, snapshot: &Snapshot) -> Result<()> {
        for family in snapshot.families() {
            self.descriptors.check(family.desc())?;
        }
        // Names are unique in a snapshot, so equal counts mean equal sets.
        let expected = self.descriptors.descriptors().len();
        if snapshot.families().len() != expected {
            return Err(MetricsError::Internal(format!(
                "snapshot has {} families, {} registered",
                snapshot.families().len(),
                expected
            )));
        }
        Ok(())
    }
}

/// Value of `var`, or the empty label when unset or not unicode.
pub fn process_label(var: &str) -> String {
    std::env::var(var).unwrap_or_default()
}
