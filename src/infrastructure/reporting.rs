//! Run reporter that forwards progress to `tracing`

use tracing::{info, warn};

use crate::domain::{EvaluationResult, RunReporter, RunSummary};

#[derive(Debug, Default, Clone)]
pub struct TracingReporter;

impl TracingReporter {
    pub fn new() -> Self {
        Self
    }
}

impl RunReporter for TracingReporter {
    fn run_started(&self, test_cases: usize, models: &[String], parallel: bool) {
        info!(
            test_cases,
            models = %models.join(","),
            work_items = test_cases * models.len(),
            mode = if parallel { "parallel" } else { "sequential" },
            "Starting evaluation run"
        );
    }

    fn case_finished(&self, completed: usize, total: usize, result: &EvaluationResult) {
        if result.is_failure() {
            warn!(
                progress = %format!("{}/{}", completed, total),
                test_case = %result.test_case_name,
                model = %result.model_type,
                reason = %result.judge_reasoning,
                "Evaluation failed"
            );
        } else {
            info!(
                progress = %format!("{}/{}", completed, total),
                test_case = %result.test_case_name,
                model = %result.model_type,
                score = result.judge_score,
                duration_seconds = result.duration_seconds,
                pii_found = result.pii_found,
                "Evaluated"
            );
        }
    }

    fn warning(&self, message: &str) {
        warn!("{}", message);
    }

    fn run_finished(&self, summary: &RunSummary) {
        info!(
            total = summary.total_cases,
            failed = summary.failed_cases,
            average_score = summary.average_score,
            total_cost = summary.total_cost,
            pii_flags = summary.pii_flags,
            "Evaluation run finished"
        );
    }
}
