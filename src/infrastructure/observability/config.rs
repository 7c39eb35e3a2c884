//! Metrics configuration

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Prometheus metrics configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MetricsConfig {
    /// Install a Prometheus recorder and write its exposition text after each run
    #[serde(default)]
    pub enabled: bool,
    /// Output file; defaults to `metrics.prom` inside the results directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl MetricsConfig {
    pub fn output_path(&self, results_dir: &Path) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| results_dir.join("metrics.prom"))
    }
}
