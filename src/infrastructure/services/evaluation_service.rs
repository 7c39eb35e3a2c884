//! Evaluation service - runs every test case against every requested model

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use tracing::{debug, instrument};

use crate::domain::{
    DomainError, EvaluationResult, ModelIdentifier, ModelInvoker, PiiScanner, PricingTable,
    ResponseJudge, RunReporter, RunSummary, TestCase,
};
use crate::infrastructure::export::{ExportedFiles, JsonResultExporter};
use crate::infrastructure::observability::record_evaluation;
use crate::infrastructure::test_case::{discover, parse_file};

/// Run-level settings
#[derive(Debug, Clone)]
pub struct EvaluationSettings {
    pub test_cases_dir: PathBuf,
    pub max_workers: usize,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            test_cases_dir: PathBuf::from("test_cases"),
            max_workers: 5,
        }
    }
}

/// Collaborators used by the evaluation service
pub struct EvaluationServiceDeps {
    pub invoker: Arc<dyn ModelInvoker>,
    pub judge: Arc<dyn ResponseJudge>,
    pub scanner: Arc<PiiScanner>,
    pub pricing: Arc<PricingTable>,
    pub exporter: JsonResultExporter,
    pub reporter: Arc<dyn RunReporter>,
}

/// One (test case source, model) pair
#[derive(Debug, Clone)]
struct WorkItem {
    source: PathBuf,
    model: String,
}

/// Orchestrates test case execution, scoring, and export
pub struct EvaluationService {
    deps: EvaluationServiceDeps,
    settings: EvaluationSettings,
    results: Vec<EvaluationResult>,
}

impl EvaluationService {
    pub fn new(deps: EvaluationServiceDeps, settings: EvaluationSettings) -> Self {
        Self {
            deps,
            settings,
            results: Vec::new(),
        }
    }

    pub fn settings(&self) -> &EvaluationSettings {
        &self.settings
    }

    /// Results of the most recent run
    pub fn results(&self) -> &[EvaluationResult] {
        &self.results
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_results(&self.results)
    }

    /// Evaluate every discovered test case against every model.
    ///
    /// Replaces the previous result set and returns the number of results. Only a
    /// test case directory that cannot be read is reported as an error; per-item
    /// failures become failure results.
    #[instrument(skip(self, models), fields(models = models.len()))]
    pub async fn run_suite(
        &mut self,
        models: &[String],
        persona: &str,
        parallel: bool,
    ) -> Result<usize, DomainError> {
        let sources = discover(&self.settings.test_cases_dir)?;
        let work = build_work_list(&sources, models);

        self.deps
            .reporter
            .run_started(sources.len(), models, parallel);

        if work.is_empty() {
            self.deps.reporter.warning(&format!(
                "No work to do: {} test case(s) in {} and {} model(s)",
                sources.len(),
                self.settings.test_cases_dir.display(),
                models.len()
            ));
            self.results = Vec::new();
            self.deps.reporter.run_finished(&self.summary());
            return Ok(0);
        }

        let results = if parallel {
            self.execute_parallel(work, persona).await
        } else {
            self.execute_sequential(work, persona).await
        };

        self.results = results;
        self.deps.reporter.run_finished(&self.summary());

        Ok(self.results.len())
    }

    async fn execute_sequential(&self, work: Vec<WorkItem>, persona: &str) -> Vec<EvaluationResult> {
        let total = work.len();
        let mut results = Vec::with_capacity(total);

        for item in work {
            let result = self.process_one(&item.source, &item.model, persona).await;
            self.record(results.len() + 1, total, &result);
            results.push(result);
        }

        results
    }

    async fn execute_parallel(&self, work: Vec<WorkItem>, persona: &str) -> Vec<EvaluationResult> {
        let total = work.len();
        let workers = self.settings.max_workers.max(1);
        debug!(workers, total, "Executing work list in parallel");

        let mut completed = stream::iter(work)
            .map(|item| async move { self.process_one(&item.source, &item.model, persona).await })
            .buffer_unordered(workers);

        let mut results = Vec::with_capacity(total);
        while let Some(result) = completed.next().await {
            self.record(results.len() + 1, total, &result);
            results.push(result);
        }

        results
    }

    fn record(&self, completed: usize, total: usize, result: &EvaluationResult) {
        record_evaluation(result);
        self.deps.reporter.case_finished(completed, total, result);
    }

    /// Evaluate one test case source against one model. Never fails.
    ///
    /// Results carry the canonical `provider:model` form whenever the identifier
    /// parses, so successes and failures for one model share a key.
    pub async fn process_one(&self, source: &Path, model: &str, persona: &str) -> EvaluationResult {
        let test_case = parse_file(source).await;

        let model_id = match model.parse::<ModelIdentifier>() {
            Ok(model_id) => model_id,
            Err(e) => return EvaluationResult::failed(&test_case, model.trim(), e),
        };

        match self.evaluate(&test_case, &model_id, persona).await {
            Ok(result) => result,
            Err(e) => EvaluationResult::failed(&test_case, model_id.to_string(), e),
        }
    }

    async fn evaluate(
        &self,
        test_case: &TestCase,
        model_id: &ModelIdentifier,
        persona: &str,
    ) -> Result<EvaluationResult, DomainError> {
        let start = Instant::now();
        let completion = self.deps.invoker.invoke(model_id, test_case.prompt()).await?;
        let elapsed = start.elapsed();

        let cost = self.deps.pricing.estimate_cost(
            model_id.model(),
            completion.input_tokens,
            completion.output_tokens,
        );
        let pii = self.deps.scanner.scan(&completion.text);
        let verdict = self
            .deps
            .judge
            .judge(test_case, &completion.text, persona)
            .await;

        Ok(EvaluationResult::completed(
            test_case,
            model_id.to_string(),
            completion,
            elapsed,
            cost,
            pii,
            verdict,
        ))
    }

    /// Persist the current result set; a no-op with a warning when it is empty
    pub fn export(&self) -> Result<Option<ExportedFiles>, DomainError> {
        let exported = self.deps.exporter.export(&self.results)?;

        if exported.is_none() {
            self.deps.reporter.warning("No results to export");
        }

        Ok(exported)
    }
}

fn build_work_list(sources: &[PathBuf], models: &[String]) -> Vec<WorkItem> {
    sources
        .iter()
        .flat_map(|source| {
            models.iter().map(move |model| WorkItem {
                source: source.clone(),
                model: model.trim().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credentials::mock::MockCredentialProvider;
    use crate::domain::llm::MockModelInvoker;
    use crate::domain::{
        default_pii_patterns, Completion, Credential, JudgePolicy, JudgeVerdict, ModelPricing,
        PersonaRegistry, ProviderKind,
    };
    use crate::infrastructure::export::load_results;
    use crate::infrastructure::judge::LlmJudge;
    use crate::infrastructure::llm::{InvocationSettings, ProviderInvoker};
    use crate::infrastructure::reporting::mock::RecordingReporter;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Judge that echoes the persona and always awards 0.7
    struct FixedJudge;

    #[async_trait]
    impl ResponseJudge for FixedJudge {
        async fn judge(&self, _test_case: &TestCase, _response: &str, persona: &str) -> JudgeVerdict {
            JudgeVerdict::new(0.7, format!("judged as {}", persona))
        }
    }

    struct Fixture {
        dir: TempDir,
        reporter: Arc<RecordingReporter>,
    }

    impl Fixture {
        fn new(files: &[(&str, &str)]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            std::fs::create_dir(dir.path().join("cases")).unwrap();
            for (name, content) in files {
                std::fs::write(dir.path().join("cases").join(name), content).unwrap();
            }

            Self {
                dir,
                reporter: Arc::new(RecordingReporter::new()),
            }
        }

        fn service(&self, invoker: Arc<dyn ModelInvoker>, judge: Arc<dyn ResponseJudge>) -> EvaluationService {
            let mut pricing = HashMap::new();
            pricing.insert("gpt-4o".to_string(), ModelPricing::new(2.5, 10.0));

            EvaluationService::new(
                EvaluationServiceDeps {
                    invoker,
                    judge,
                    scanner: Arc::new(PiiScanner::new(default_pii_patterns())),
                    pricing: Arc::new(PricingTable::new(pricing)),
                    exporter: JsonResultExporter::new(self.dir.path().join("results")),
                    reporter: self.reporter.clone(),
                },
                EvaluationSettings {
                    test_cases_dir: self.dir.path().join("cases"),
                    max_workers: 3,
                },
            )
        }
    }

    fn three_cases() -> Vec<(&'static str, &'static str)> {
        vec![
            ("capital.yaml", "prompt: What is the capital of France?\nexpectations: [mentions Paris]\n"),
            ("math.txt", "Category: Math\nDifficulty: Easy\nWhat is 2 + 2?"),
            ("broken.json", "{ not json"),
        ]
    }

    fn answering_invoker() -> MockModelInvoker {
        let mut invoker = MockModelInvoker::new();
        invoker.expect_invoke().returning(|model, prompt| {
            if model.provider() == ProviderKind::Anthropic {
                return Err(DomainError::credential("ANTHROPIC_API_KEY not set"));
            }
            Ok(Completion::new(format!("{} answers: {}", model, prompt.len()), 1000, 500))
        });
        invoker
    }

    fn models(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn comparable(results: &[EvaluationResult]) -> Vec<(String, String, String, f64, u32, u32, f64, String)> {
        let mut rows: Vec<_> = results
            .iter()
            .map(|r| {
                (
                    r.test_case_name.clone(),
                    r.model_type.clone(),
                    r.response.clone(),
                    r.judge_score,
                    r.tokens_input,
                    r.tokens_output,
                    r.estimated_cost,
                    r.judge_reasoning.clone(),
                )
            })
            .collect();
        rows.sort_by(|a, b| (&a.0, &a.1).cmp(&(&b.0, &b.1)));
        rows
    }

    #[tokio::test]
    async fn test_run_suite_produces_cross_product_despite_failures() {
        let fixture = Fixture::new(&three_cases());
        let mut service = fixture.service(Arc::new(answering_invoker()), Arc::new(FixedJudge));

        let ids = models(&["openai:gpt-4o", "anthropic:claude-3-5-haiku-20241022"]);
        let count = service.run_suite(&ids, "strict", true).await.unwrap();

        assert_eq!(count, 6);
        assert_eq!(service.results().len(), 6);

        let failed: Vec<_> = service.results().iter().filter(|r| r.is_failure()).collect();
        assert_eq!(failed.len(), 3);
        for result in failed {
            assert_eq!(result.model_type, "anthropic:claude-3-5-haiku-20241022");
            assert_eq!(result.judge_score, 0.0);
            assert_eq!(result.duration_seconds, 0.0);
            assert!(result.response.starts_with("[ERROR]"));
            assert!(result.judge_reasoning.contains("ANTHROPIC_API_KEY not set"));
        }

        let ok = service
            .results()
            .iter()
            .find(|r| r.key() == ("capital", "openai:gpt-4o"))
            .unwrap();
        assert_eq!(ok.judge_score, 0.7);
        assert_eq!(ok.judge_reasoning, "judged as strict");
        assert!((ok.estimated_cost - 0.0075).abs() < 1e-12);

        let reporter = &fixture.reporter;
        assert_eq!(reporter.finished_cases.lock().unwrap().len(), 6);
        assert_eq!(reporter.summaries.lock().unwrap()[0].failed_cases, 3);
    }

    #[tokio::test]
    async fn test_placeholder_test_cases_still_run() {
        let fixture = Fixture::new(&three_cases());
        let mut service = fixture.service(Arc::new(answering_invoker()), Arc::new(FixedJudge));

        service.run_suite(&models(&["openai:gpt-4o"]), "default", false).await.unwrap();

        let broken = service
            .results()
            .iter()
            .find(|r| r.test_case_name == "broken")
            .unwrap();
        assert!(broken.prompt.starts_with("Failed to parse test case 'broken'"));
        assert!(!broken.is_failure());
    }

    #[tokio::test]
    async fn test_sequential_and_parallel_produce_same_set() {
        let fixture = Fixture::new(&three_cases());
        let mut service = fixture.service(Arc::new(answering_invoker()), Arc::new(FixedJudge));
        let ids = models(&["openai:gpt-4o", "anthropic:claude-3-5-haiku-20241022", "ollama:llama3"]);

        service.run_suite(&ids, "default", false).await.unwrap();
        let sequential = service.results().to_vec();

        service.run_suite(&ids, "default", true).await.unwrap();
        let parallel = service.results().to_vec();

        assert_eq!(sequential.len(), 9);
        assert_eq!(comparable(&sequential), comparable(&parallel));
    }

    #[tokio::test]
    async fn test_sequential_preserves_submission_order() {
        let fixture = Fixture::new(&three_cases());
        let mut service = fixture.service(Arc::new(answering_invoker()), Arc::new(FixedJudge));
        let ids = models(&["openai:gpt-4o", "ollama:llama3"]);

        service.run_suite(&ids, "default", false).await.unwrap();

        let keys: Vec<_> = service.results().iter().map(|r| r.key()).collect();
        assert_eq!(
            keys,
            vec![
                ("broken", "openai:gpt-4o"),
                ("broken", "ollama:llama3"),
                ("capital", "openai:gpt-4o"),
                ("capital", "ollama:llama3"),
                ("math", "openai:gpt-4o"),
                ("math", "ollama:llama3"),
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_provider_becomes_failure_result() {
        let fixture = Fixture::new(&three_cases()[..1]);
        let mut invoker = MockModelInvoker::new();
        invoker.expect_invoke().never();
        let service = fixture.service(Arc::new(invoker), Arc::new(FixedJudge));

        let source = fixture.dir.path().join("cases").join("capital.yaml");
        let result = service.process_one(&source, "mistral:large", "default").await;

        assert!(result.is_failure());
        assert!(result.judge_reasoning.contains("Unknown model provider: mistral"));
        assert_eq!(result.category, "General");
    }

    #[tokio::test]
    async fn test_padded_model_id_keeps_one_identity() {
        let fixture = Fixture::new(&three_cases()[..2]);
        let mut invoker = MockModelInvoker::new();
        invoker.expect_invoke().returning(|_, prompt| {
            if prompt.contains("2 + 2") {
                return Err(DomainError::provider("ollama", "connection refused"));
            }
            Ok(Completion::new("Paris", 10, 1))
        });
        let mut service = fixture.service(Arc::new(invoker), Arc::new(FixedJudge));

        service
            .run_suite(&models(&[" ollama:llama3"]), "default", false)
            .await
            .unwrap();

        let results = service.results();
        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.is_failure()).count(), 1);
        assert!(results.iter().all(|r| r.model_type == "ollama:llama3"));
        assert_eq!(service.summary().by_model.len(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_model_id_is_trimmed() {
        let fixture = Fixture::new(&three_cases()[..1]);
        let mut invoker = MockModelInvoker::new();
        invoker.expect_invoke().never();
        let service = fixture.service(Arc::new(invoker), Arc::new(FixedJudge));

        let source = fixture.dir.path().join("cases").join("capital.yaml");
        let result = service.process_one(&source, "  mistral:large ", "default").await;

        assert!(result.is_failure());
        assert_eq!(result.model_type, "mistral:large");
    }

    #[tokio::test]
    async fn test_unreadable_source_becomes_placeholder() {
        let fixture = Fixture::new(&[]);
        let mut invoker = MockModelInvoker::new();
        invoker
            .expect_invoke()
            .returning(|_, _| Ok(Completion::new("I cannot see a question.", 5, 5)));
        let service = fixture.service(Arc::new(invoker), Arc::new(FixedJudge));

        let source = fixture.dir.path().join("cases").join("ghost.yaml");
        let result = service.process_one(&source, "ollama:llama3", "default").await;

        assert_eq!(result.test_case_name, "ghost");
        assert!(result.prompt.starts_with("Failed to parse test case 'ghost'"));
        assert!(!result.is_failure());
    }

    #[tokio::test]
    async fn test_pii_is_flagged() {
        let fixture = Fixture::new(&[("contact.txt", "How do I reach you?")]);
        let mut invoker = MockModelInvoker::new();
        invoker
            .expect_invoke()
            .returning(|_, _| Ok(Completion::new("Contact me at a@b.com", 5, 5)));
        let mut service = fixture.service(Arc::new(invoker), Arc::new(FixedJudge));

        service.run_suite(&models(&["ollama:llama3"]), "default", true).await.unwrap();

        let result = &service.results()[0];
        assert!(result.pii_found);
        assert_eq!(result.pii_types, vec!["email".to_string()]);
        assert_eq!(result.estimated_cost, 0.0);
    }

    #[tokio::test]
    async fn test_empty_directory_is_not_an_error() {
        let fixture = Fixture::new(&[]);
        let mut invoker = MockModelInvoker::new();
        invoker.expect_invoke().never();
        let mut service = fixture.service(Arc::new(invoker), Arc::new(FixedJudge));

        let count = service
            .run_suite(&models(&["simulated:default"]), "default", true)
            .await
            .unwrap();

        assert_eq!(count, 0);
        assert!(service.results().is_empty());
        assert!(service.export().unwrap().is_none());
        assert!(!fixture.dir.path().join("results").exists());
        assert_eq!(fixture.reporter.warnings().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_directory_surfaces() {
        let fixture = Fixture::new(&[]);
        let mut invoker = MockModelInvoker::new();
        invoker.expect_invoke().never();
        let mut service = fixture.service(Arc::new(invoker), Arc::new(FixedJudge));
        service.settings.test_cases_dir = fixture.dir.path().join("absent");

        let err = service
            .run_suite(&models(&["simulated:default"]), "default", true)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_simulated_end_to_end_with_export() {
        let fixture = Fixture::new(&[(
            "capital.yaml",
            "prompt: What is the capital of France?\nexpectations: [\"mentions Paris\"]\n",
        )]);

        let credentials = MockCredentialProvider::new()
            .with_credential(Credential::anonymous(ProviderKind::Simulated));
        let invoker: Arc<dyn ModelInvoker> = Arc::new(ProviderInvoker::new(
            Arc::new(credentials),
            InvocationSettings::default(),
        ));
        let judge = Arc::new(LlmJudge::new(
            invoker.clone(),
            "simulated:judge".parse().unwrap(),
            PersonaRegistry::default(),
            JudgePolicy::default(),
        ));
        let mut service = fixture.service(invoker, judge);

        service
            .run_suite(&models(&["simulated:default"]), "default", true)
            .await
            .unwrap();

        let result = &service.results()[0];
        assert_eq!(result.key(), ("capital", "simulated:default"));
        assert!(!result.response.is_empty());
        assert_eq!(result.judge_score, JudgePolicy::default().simulated_score);
        assert!(!result.is_failure());

        let files = service.export().unwrap().unwrap();
        let reloaded = load_results(&files.latest).unwrap();
        assert_eq!(reloaded.len(), service.results().len());
        assert_eq!(reloaded[0].test_case_name, "capital");
    }
}
