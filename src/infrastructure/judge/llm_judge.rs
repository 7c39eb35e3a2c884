//! Judge backed by a model invocation

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{
    build_rubric_prompt, parse_verdict, JudgePolicy, JudgeVerdict, ModelIdentifier, ModelInvoker,
    PersonaRegistry, ResponseJudge, TestCase,
};

/// Scores responses by asking a judge model for a JSON verdict
pub struct LlmJudge {
    invoker: Arc<dyn ModelInvoker>,
    judge_model: ModelIdentifier,
    personas: PersonaRegistry,
    policy: JudgePolicy,
}

impl LlmJudge {
    pub fn new(
        invoker: Arc<dyn ModelInvoker>,
        judge_model: ModelIdentifier,
        personas: PersonaRegistry,
        policy: JudgePolicy,
    ) -> Self {
        Self {
            invoker,
            judge_model,
            personas,
            policy,
        }
    }
}

#[async_trait]
impl ResponseJudge for LlmJudge {
    async fn judge(&self, test_case: &TestCase, response: &str, persona: &str) -> JudgeVerdict {
        if self.judge_model.is_simulated() {
            return self.policy.simulated(&self.judge_model.to_string());
        }

        let instruction = self.personas.resolve(persona);
        let rubric = build_rubric_prompt(instruction, test_case, response);

        let completion = match self.invoker.invoke(&self.judge_model, &rubric).await {
            Ok(completion) => completion,
            Err(e) => {
                warn!(
                    test_case = test_case.name(),
                    judge_model = %self.judge_model,
                    error = %e,
                    "Judge call failed"
                );
                return self.policy.error(e);
            }
        };

        let verdict = self.policy.resolve(parse_verdict(&completion.text));
        debug!(
            test_case = test_case.name(),
            score = verdict.score,
            "Judge verdict"
        );

        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockModelInvoker;
    use crate::domain::{Completion, DomainError};

    fn judge_with(invoker: MockModelInvoker) -> LlmJudge {
        LlmJudge::new(
            Arc::new(invoker),
            "openai:gpt-4o-mini".parse().unwrap(),
            PersonaRegistry::default(),
            JudgePolicy::default(),
        )
    }

    fn test_case() -> TestCase {
        TestCase::new("capital", "What is the capital of France?")
            .with_expectations(vec!["mentions Paris".to_string()])
    }

    #[tokio::test]
    async fn test_parses_verdict_wrapped_in_prose() {
        let mut invoker = MockModelInvoker::new();
        invoker
            .expect_invoke()
            .withf(|model, prompt| {
                model.to_string() == "openai:gpt-4o-mini" && prompt.contains("mentions Paris")
            })
            .times(1)
            .returning(|_, _| {
                Ok(Completion::new(
                    "Sure! {\"score\": 0.9, \"reasoning\": \"Names Paris\"} Hope that helps.",
                    50,
                    10,
                ))
            });

        let verdict = judge_with(invoker)
            .judge(&test_case(), "Paris", "strict")
            .await;

        assert_eq!(verdict, JudgeVerdict::new(0.9, "Names Paris"));
    }

    #[tokio::test]
    async fn test_out_of_range_scores_are_clamped() {
        let mut invoker = MockModelInvoker::new();
        invoker
            .expect_invoke()
            .returning(|_, _| Ok(Completion::new(r#"{"score": 1.5, "reasoning": "wow"}"#, 1, 1)));

        let verdict = judge_with(invoker).judge(&test_case(), "Paris", "default").await;
        assert_eq!(verdict.score, 1.0);
    }

    #[tokio::test]
    async fn test_prose_only_output_is_neutral() {
        let mut invoker = MockModelInvoker::new();
        invoker
            .expect_invoke()
            .returning(|_, _| Ok(Completion::new("Looks right to me.", 1, 1)));

        let verdict = judge_with(invoker).judge(&test_case(), "Paris", "default").await;
        assert_eq!(verdict.score, 0.5);
    }

    #[tokio::test]
    async fn test_judge_call_failure_scores_zero() {
        let mut invoker = MockModelInvoker::new();
        invoker
            .expect_invoke()
            .returning(|_, _| Err(DomainError::credential("OPENAI_API_KEY not set")));

        let verdict = judge_with(invoker).judge(&test_case(), "Paris", "default").await;

        assert_eq!(verdict.score, 0.0);
        assert!(verdict.reasoning.contains("OPENAI_API_KEY not set"));
    }

    #[tokio::test]
    async fn test_simulated_judge_makes_no_call() {
        let mut invoker = MockModelInvoker::new();
        invoker.expect_invoke().never();

        let judge = LlmJudge::new(
            Arc::new(invoker),
            "simulated:judge".parse().unwrap(),
            PersonaRegistry::default(),
            JudgePolicy::default(),
        );

        let verdict = judge.judge(&test_case(), "Paris", "default").await;
        assert_eq!(verdict.score, 0.85);
    }
}
