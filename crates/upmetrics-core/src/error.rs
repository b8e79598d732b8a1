//! Shared error type across upmetrics crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Unified error type used by core and gateway.
///
/// Counter increments and reads never fail; these variants cover startup
/// configuration and externally supplied metric families only.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("duplicate metric descriptor: {0}")]
    DuplicateDescriptor(String),
    #[error("metric family not registered: {0}")]
    UnregisteredFamily(String),
    #[error("label mismatch for {family}: expected {expected} values, got {got}")]
    LabelMismatch {
        family: String,
        expected: usize,
        got: usize,
    },
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}
