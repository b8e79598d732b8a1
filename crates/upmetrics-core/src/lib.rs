//! upmetrics core: counter registry and snapshot adapter.
//!
//! This crate owns every operational counter of the upload server and turns
//! them into format-agnostic metric families on demand. It carries no
//! transport or runtime dependencies; the gateway crate owns HTTP and the
//! exposition format.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Increments and
//! reads are total; the few fallible boundary paths return `MetricsError`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod counter;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod snapshot;

pub use counter::{Counter, CounterGroup};
pub use descriptor::{DescriptorSet, MetricDesc, MetricKind};
pub use error::{MetricsError, Result};
pub use registry::{CounterRegistry, ErrorCounters, ErrorKey, FixedCounter, RegistryValues};
pub use snapshot::{build_snapshot, MetricFamily, MetricRecord, MetricValue, Snapshot};
