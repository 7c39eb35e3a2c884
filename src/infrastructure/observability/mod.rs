//! Observability infrastructure - Metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    init_metrics, record_evaluation, record_llm_request, LlmRequestMetricParams,
    PrometheusMetrics,
};
