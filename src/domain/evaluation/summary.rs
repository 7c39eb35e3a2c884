//! Aggregate statistics over a result collection

use std::collections::BTreeMap;

use serde::Serialize;

use super::EvaluationResult;

/// Per-model aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub model_type: String,
    pub cases: usize,
    pub failures: usize,
    pub average_score: f64,
    pub average_duration_seconds: f64,
    pub total_cost: f64,
    pub pii_flags: usize,
}

/// Per-category aggregate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub cases: usize,
    pub average_score: f64,
}

/// Totals and breakdowns for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_cases: usize,
    pub failed_cases: usize,
    pub average_score: f64,
    pub average_duration_seconds: f64,
    pub total_cost: f64,
    pub pii_flags: usize,
    pub by_model: Vec<ModelSummary>,
    pub by_category: Vec<CategorySummary>,
}

#[derive(Default)]
struct Accumulator {
    cases: usize,
    failures: usize,
    score: f64,
    duration: f64,
    cost: f64,
    pii: usize,
}

impl Accumulator {
    fn add(&mut self, result: &EvaluationResult) {
        self.cases += 1;
        self.failures += usize::from(result.is_failure());
        self.score += result.judge_score;
        self.duration += result.duration_seconds;
        self.cost += result.estimated_cost;
        self.pii += usize::from(result.pii_found);
    }

    fn mean(&self, total: f64) -> f64 {
        if self.cases == 0 {
            0.0
        } else {
            total / self.cases as f64
        }
    }
}

impl RunSummary {
    /// Summarize results; rows are sorted by model identifier and category name
    pub fn from_results(results: &[EvaluationResult]) -> Self {
        let mut overall = Accumulator::default();
        let mut models: BTreeMap<&str, Accumulator> = BTreeMap::new();
        let mut categories: BTreeMap<&str, Accumulator> = BTreeMap::new();

        for result in results {
            overall.add(result);
            models.entry(&result.model_type).or_default().add(result);
            categories.entry(&result.category).or_default().add(result);
        }

        let by_model = models
            .into_iter()
            .map(|(model, acc)| ModelSummary {
                model_type: model.to_string(),
                cases: acc.cases,
                failures: acc.failures,
                average_score: acc.mean(acc.score),
                average_duration_seconds: acc.mean(acc.duration),
                total_cost: acc.cost,
                pii_flags: acc.pii,
            })
            .collect();

        let by_category = categories
            .into_iter()
            .map(|(category, acc)| CategorySummary {
                category: category.to_string(),
                cases: acc.cases,
                average_score: acc.mean(acc.score),
            })
            .collect();

        Self {
            total_cases: overall.cases,
            failed_cases: overall.failures,
            average_score: overall.mean(overall.score),
            average_duration_seconds: overall.mean(overall.duration),
            total_cost: overall.cost,
            pii_flags: overall.pii,
            by_model,
            by_category,
        }
    }

    /// Fixed-width text table for terminal output
    pub fn render_table(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "Total cases: {}  Failed: {}  Avg score: {:.2}  Avg latency: {:.2}s  Total cost: ${:.4}  PII flags: {}\n",
            self.total_cases,
            self.failed_cases,
            self.average_score,
            self.average_duration_seconds,
            self.total_cost,
            self.pii_flags
        ));

        out.push_str(&format!(
            "\n{:<40} {:>6} {:>6} {:>9} {:>10} {:>10} {:>5}\n",
            "MODEL", "CASES", "FAILED", "AVG SCORE", "AVG LAT(s)", "COST($)", "PII"
        ));
        for row in &self.by_model {
            out.push_str(&format!(
                "{:<40} {:>6} {:>6} {:>9.2} {:>10.2} {:>10.4} {:>5}\n",
                row.model_type,
                row.cases,
                row.failures,
                row.average_score,
                row.average_duration_seconds,
                row.total_cost,
                row.pii_flags
            ));
        }

        out.push_str(&format!("\n{:<40} {:>6} {:>9}\n", "CATEGORY", "CASES", "AVG SCORE"));
        for row in &self.by_category {
            out.push_str(&format!(
                "{:<40} {:>6} {:>9.2}\n",
                row.category, row.cases, row.average_score
            ));
        }

        out
    }
}
