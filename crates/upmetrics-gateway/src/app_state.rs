//! Shared application state for the metrics gateway.
//!
//! Startup registers every exported family once; a duplicate name means two
//! components claim the same metric and boot fails.

use std::sync::Arc;

use upmetrics_core::error::Result;
use upmetrics_core::{CounterRegistry, DescriptorSet};

use crate::config::GatewayConfig;
use crate::obs::{Collector, ConnectionGauge, HookMetrics};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    registry: Arc<CounterRegistry>,
    hooks: Arc<HookMetrics>,
    connections: ConnectionGauge,
    collector: Arc<Collector>,
}

struct AppStateInner {
    cfg: GatewayConfig,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can report a bad descriptor set instead of panicking.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let registry = Arc::new(CounterRegistry::new());
        let hooks = Arc::new(HookMetrics::new());
        let connections = ConnectionGauge::new();
        let collector = Arc::new(Collector::new(
            Arc::clone(&registry),
            connections.clone(),
            Arc::clone(&hooks),
            cfg.metrics.process_label_env.clone(),
        )?);

        tracing::debug!(
            families = collector.descriptors().descriptors().len(),
            "metric descriptors registered"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            registry,
            hooks,
            connections,
            collector,
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn descriptors(&self) -> &DescriptorSet {
        self.collector.descriptors()
    }

    /// Counter registry shared with the upload handlers.
    pub fn registry(&self) -> Arc<CounterRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn hooks(&self) -> Arc<HookMetrics> {
        Arc::clone(&self.hooks)
    }

    pub fn connections(&self) -> &ConnectionGauge {
        &self.connections
    }

    pub fn collector(&self) -> Arc<Collector> {
        Arc::clone(&self.collector)
    }
}
