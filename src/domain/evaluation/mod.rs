//! Evaluation results, run summaries, and progress reporting

mod reporter;
mod result;
mod summary;

pub use reporter::RunReporter;
pub use result::EvaluationResult;
pub use summary::{CategorySummary, ModelSummary, RunSummary};
