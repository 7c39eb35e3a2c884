//! Prometheus metrics infrastructure

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;
use crate::domain::{DomainError, EvaluationResult};

/// Handle to the installed Prometheus recorder
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Current metrics in Prometheus exposition format
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Write the exposition text to a file (textfile-collector style)
    pub fn write_to(&self, path: &Path) -> Result<(), DomainError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        std::fs::write(path, self.render()).map_err(|e| {
            DomainError::storage(format!("Failed to write metrics to {}: {}", path.display(), e))
        })
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::debug!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            register_default_metrics();
            tracing::info!("Prometheus metrics initialized");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

fn register_default_metrics() {
    gauge!("llm_eval_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record an LLM request metric
pub fn record_llm_request(params: LlmRequestMetricParams) {
    let labels = [
        ("provider", params.provider.to_string()),
        ("model", params.model.to_string()),
        ("status", if params.success { "success" } else { "error" }.to_string()),
    ];

    counter!("llm_requests_total", &labels).increment(1);
    histogram!("llm_request_duration_seconds", &labels).record(params.duration.as_secs_f64());

    if let Some(tokens) = params.input_tokens {
        counter!("llm_input_tokens_total", &labels).increment(tokens);
    }

    if let Some(tokens) = params.output_tokens {
        counter!("llm_output_tokens_total", &labels).increment(tokens);
    }

    if !params.success {
        counter!("llm_errors_total", &labels).increment(1);
    }
}

/// Parameters for LLM request metrics
pub struct LlmRequestMetricParams<'a> {
    pub provider: &'a str,
    pub model: &'a str,
    pub duration: Duration,
    pub success: bool,
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
}

/// Record the outcome of one evaluated work item
pub fn record_evaluation(result: &EvaluationResult) {
    let labels = [
        ("model", result.model_type.clone()),
        ("category", result.category.clone()),
        ("status", if result.is_failure() { "failed" } else { "completed" }.to_string()),
    ];

    counter!("llm_eval_cases_total", &labels).increment(1);
    histogram!("llm_eval_judge_score", &labels).record(result.judge_score);

    if result.pii_found {
        counter!("llm_eval_pii_flags_total", &labels).increment(1);
    }
}
