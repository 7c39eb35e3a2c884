use serde::{Deserialize, Serialize};

use super::ParsedVerdict;

/// Final score and explanation for one judged response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeVerdict {
    pub score: f64,
    pub reasoning: String,
}

impl JudgeVerdict {
    pub fn new(score: f64, reasoning: impl Into<String>) -> Self {
        Self {
            score: super::clamp_score(score),
            reasoning: reasoning.into(),
        }
    }
}

/// Scores used when the judge cannot produce a real verdict.
///
/// Ordering matters more than the exact values: a simulated judge is treated as a pass,
/// unparseable judge prose as neutral, and a failed judge call as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgePolicy {
    #[serde(default = "default_simulated_score")]
    pub simulated_score: f64,
    #[serde(default = "default_unparseable_score")]
    pub unparseable_score: f64,
    #[serde(default = "default_error_score")]
    pub error_score: f64,
}

fn default_simulated_score() -> f64 {
    0.85
}

fn default_unparseable_score() -> f64 {
    0.5
}

fn default_error_score() -> f64 {
    0.0
}

impl Default for JudgePolicy {
    fn default() -> Self {
        Self {
            simulated_score: default_simulated_score(),
            unparseable_score: default_unparseable_score(),
            error_score: default_error_score(),
        }
    }
}

impl JudgePolicy {
    /// Verdict for a judge run that never reached a model
    pub fn simulated(&self, judge_model: &str) -> JudgeVerdict {
        JudgeVerdict::new(
            self.simulated_score,
            format!("Simulated judge ({}): no model was consulted", judge_model),
        )
    }

    /// Verdict for a failed judge call
    pub fn error(&self, error: impl std::fmt::Display) -> JudgeVerdict {
        JudgeVerdict::new(self.error_score, format!("Judge error: {}", error))
    }

    /// Turn parsed judge output into a verdict
    pub fn resolve(&self, parsed: ParsedVerdict) -> JudgeVerdict {
        match parsed {
            ParsedVerdict::Scored { score, reasoning } => JudgeVerdict::new(score, reasoning),
            ParsedVerdict::Unparseable => JudgeVerdict::new(
                self.unparseable_score,
                "Judge output did not contain a JSON verdict; assigned neutral score",
            ),
            ParsedVerdict::Invalid(error) => JudgeVerdict::new(
                self.error_score,
                format!("Judge returned malformed JSON verdict: {}", error),
            ),
        }
    }
}
