//! Observability collaborators around the counter core.
//!
//! The core owns upload counters; this module owns what the request layer
//! maintains on its own (open connections, hook outcomes), merges everything
//! into one snapshot per scrape, and renders it in the Prometheus text format.

pub mod collector;
pub mod connections;
pub mod exposition;
pub mod hooks;

pub use collector::{Collector, GATEWAY_FAMILIES};
pub use connections::{ConnectionGauge, ConnectionGuard};
pub use hooks::{HookMetrics, HookType};
