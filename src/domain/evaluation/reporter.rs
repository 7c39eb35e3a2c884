use super::{EvaluationResult, RunSummary};

/// Receives progress events from an evaluation run
pub trait RunReporter: Send + Sync {
    fn run_started(&self, test_cases: usize, models: &[String], parallel: bool);

    fn case_finished(&self, completed: usize, total: usize, result: &EvaluationResult);

    fn warning(&self, message: &str);

    fn run_finished(&self, summary: &RunSummary);
}
