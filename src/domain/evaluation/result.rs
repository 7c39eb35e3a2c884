//! Evaluation result record

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::judge::{clamp_score, JudgeVerdict};
use crate::domain::llm::Completion;
use crate::domain::pii::PiiScan;
use crate::domain::test_case::TestCase;

/// Prefix of the judge reasoning on results synthesized from a failed unit of work
const FAILURE_REASONING_PREFIX: &str = "Evaluation failed:";

/// Outcome of one (test case, model) pair. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub test_case_name: String,
    pub model_type: String,
    pub category: String,
    pub difficulty: String,
    pub prompt: String,
    pub response: String,
    pub duration_seconds: f64,
    pub tokens_input: u32,
    pub tokens_output: u32,
    pub estimated_cost: f64,
    pub judge_score: f64,
    pub judge_reasoning: String,
    pub pii_found: bool,
    pub pii_types: Vec<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
    /// Set only on results synthesized from a failed unit of work
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
}

impl EvaluationResult {
    /// Assemble a result from the pieces produced by one successful unit of work
    pub fn completed(
        test_case: &TestCase,
        model_type: impl Into<String>,
        completion: Completion,
        elapsed: Duration,
        estimated_cost: f64,
        pii: PiiScan,
        verdict: JudgeVerdict,
    ) -> Self {
        let pii_types = if pii.found { pii.types } else { Vec::new() };

        Self {
            test_case_name: test_case.name().to_string(),
            model_type: model_type.into(),
            category: test_case.category().to_string(),
            difficulty: test_case.difficulty().to_string(),
            prompt: test_case.prompt().to_string(),
            response: completion.text,
            duration_seconds: round_seconds(elapsed),
            tokens_input: completion.input_tokens,
            tokens_output: completion.output_tokens,
            estimated_cost: estimated_cost.max(0.0),
            judge_score: clamp_score(verdict.score),
            judge_reasoning: verdict.reasoning,
            pii_found: pii.found,
            pii_types,
            timestamp: Utc::now(),
            metadata: test_case.metadata().clone(),
            failed: false,
        }
    }

    /// Zero-metric result standing in for a unit of work that failed
    pub fn failed(test_case: &TestCase, model_type: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            test_case_name: test_case.name().to_string(),
            model_type: model_type.into(),
            category: test_case.category().to_string(),
            difficulty: test_case.difficulty().to_string(),
            prompt: test_case.prompt().to_string(),
            response: format!("[ERROR] {}", error),
            duration_seconds: 0.0,
            tokens_input: 0,
            tokens_output: 0,
            estimated_cost: 0.0,
            judge_score: 0.0,
            judge_reasoning: format!("{} {}", FAILURE_REASONING_PREFIX, error),
            pii_found: false,
            pii_types: Vec::new(),
            timestamp: Utc::now(),
            metadata: test_case.metadata().clone(),
            failed: true,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failed
    }

    /// Natural key within a run
    pub fn key(&self) -> (&str, &str) {
        (&self.test_case_name, &self.model_type)
    }
}

/// Wall-clock seconds rounded to two decimals
fn round_seconds(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}
