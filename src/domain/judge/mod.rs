//! LLM-as-judge scoring: personas, rubric prompts, and defensive verdict parsing

mod persona;
mod policy;
mod rubric;
mod verdict;

pub use persona::{default_personas, PersonaRegistry, DEFAULT_PERSONA};
pub use policy::{JudgePolicy, JudgeVerdict};
pub use rubric::{build_rubric_prompt, GENERIC_CRITERIA};
pub use verdict::{clamp_score, extract_json_object, parse_verdict, ParsedVerdict};

use async_trait::async_trait;

use crate::domain::test_case::TestCase;

/// Scores a model response against a test case. Never fails: problems degrade to a low score
/// with an explanatory reasoning string.
#[async_trait]
pub trait ResponseJudge: Send + Sync {
    async fn judge(&self, test_case: &TestCase, response: &str, persona: &str) -> JudgeVerdict;
}
