//! LLM evaluation harness
//!
//! Benchmarks language models against a directory of test cases:
//! - Test cases in JSON, YAML or free-form text
//! - OpenAI, Anthropic, Gemini, Ollama and a simulated offline backend
//! - Scoring by an LLM judge with configurable personas
//! - Token cost estimation and PII detection per response
//! - JSON export of every run and a summary report

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::{DomainError, PiiScanner, RunReporter};
use infrastructure::{
    credentials::EnvCredentialProvider,
    export::JsonResultExporter,
    judge::LlmJudge,
    llm::{InvocationSettings, ProviderInvoker},
    services::{EvaluationService, EvaluationServiceDeps, EvaluationSettings},
};

/// Invocation settings derived from the evaluation and retry sections
pub fn invocation_settings(config: &AppConfig) -> InvocationSettings {
    InvocationSettings {
        max_tokens: config.evaluation.max_tokens,
        temperature: config.evaluation.temperature,
        timeout: config.evaluation.timeout(),
        retry: config.retry.clone(),
    }
}

/// Wire the evaluation service from configuration
pub fn build_evaluation_service(
    config: &AppConfig,
    reporter: Arc<dyn RunReporter>,
) -> Result<EvaluationService, DomainError> {
    let credentials = Arc::new(EnvCredentialProvider::default());
    let invoker = Arc::new(ProviderInvoker::new(credentials, invocation_settings(config)));

    let judge = LlmJudge::new(
        invoker.clone(),
        config.judge_model()?,
        config.judge.persona_registry(),
        config.judge.policy(),
    );

    let deps = EvaluationServiceDeps {
        invoker,
        judge: Arc::new(judge),
        scanner: Arc::new(PiiScanner::new(config.pii_patterns())),
        pricing: Arc::new(config.pricing_table()),
        exporter: JsonResultExporter::new(config.evaluation.results_dir.clone()),
        reporter,
    };

    let settings = EvaluationSettings {
        test_cases_dir: config.evaluation.test_cases_dir.clone(),
        max_workers: config.evaluation.max_workers,
    };

    Ok(EvaluationService::new(deps, settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrastructure::reporting::TracingReporter;

    #[test]
    fn test_invocation_settings_follow_config() {
        let mut config = AppConfig::default();
        config.evaluation.max_tokens = 512;
        config.evaluation.timeout_seconds = 5;
        config.retry.max_attempts = 7;

        let settings = invocation_settings(&config);
        assert_eq!(settings.max_tokens, 512);
        assert_eq!(settings.timeout.as_secs(), 5);
        assert_eq!(settings.retry.attempts(), 7);
    }

    #[test]
    fn test_build_service_rejects_bad_judge_model() {
        let mut config = AppConfig::default();
        config.evaluation.judge_model = "judge-without-provider".to_string();

        let result = build_evaluation_service(&config, Arc::new(TracingReporter::new()));
        assert!(result.is_err());
    }

    #[test]
    fn test_build_service_uses_configured_dirs() {
        let mut config = AppConfig::default();
        config.evaluation.test_cases_dir = "suites/smoke".into();
        config.evaluation.max_workers = 3;

        let service =
            build_evaluation_service(&config, Arc::new(TracingReporter::new())).unwrap();
        assert_eq!(service.settings().max_workers, 3);
        assert_eq!(
            service.settings().test_cases_dir,
            std::path::PathBuf::from("suites/smoke")
        );
    }
}
