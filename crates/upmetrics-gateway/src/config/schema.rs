use std::net::SocketAddr;

use serde::Deserialize;
use upmetrics_core::error::{MetricsError, Result};

use crate::ops::HEALTHZ_PATH;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetricsError::UnsupportedVersion);
        }

        self.server.validate()?;
        self.metrics.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            MetricsError::BadConfig(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Mount the exposition route at all.
    #[serde(default = "default_expose")]
    pub expose: bool,

    #[serde(default = "default_metrics_path")]
    pub path: String,

    /// Env var holding the host identifier attached to every record.
    #[serde(default = "default_process_label_env")]
    pub process_label_env: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            expose: default_expose(),
            path: default_metrics_path(),
            process_label_env: default_process_label_env(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') {
            return Err(MetricsError::BadConfig(
                "metrics.path must start with '/'".into(),
            ));
        }
        if self.path == HEALTHZ_PATH {
            return Err(MetricsError::BadConfig(format!(
                "metrics.path must not shadow {HEALTHZ_PATH}"
            )));
        }
        if self.process_label_env.trim().is_empty() {
            return Err(MetricsError::BadConfig(
                "metrics.process_label_env must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_expose() -> bool {
    true
}
fn default_metrics_path() -> String {
    "/metrics".into()
}
fn default_process_label_env() -> String {
    "COMPUTERNAME".into()
}
