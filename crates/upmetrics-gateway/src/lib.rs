//! upmetrics gateway library entry.
//!
//! Hosts the collaborators around the counter core: strict YAML config, the
//! open-connections gauge and hook counters, the snapshot collector, the
//! Prometheus text renderer, and the axum routes that serve it.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
