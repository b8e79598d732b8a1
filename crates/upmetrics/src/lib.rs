//! Top-level facade crate for upmetrics.
//!
//! Re-exports the counter core and the gateway library so users can depend on a single crate.

pub mod core {
    pub use upmetrics_core::*;
}

pub mod gateway {
    pub use upmetrics_gateway::*;
}
