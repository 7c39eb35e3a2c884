//! Domain layer - Core evaluation entities and capabilities

pub mod credentials;
pub mod error;
pub mod evaluation;
pub mod judge;
pub mod llm;
pub mod pii;
pub mod test_case;
pub mod usage;

pub use credentials::{Credential, CredentialProvider};
pub use error::DomainError;
pub use evaluation::{CategorySummary, EvaluationResult, ModelSummary, RunReporter, RunSummary};
pub use judge::{
    build_rubric_prompt, default_personas, parse_verdict, JudgePolicy, JudgeVerdict,
    ParsedVerdict, PersonaRegistry, ResponseJudge, DEFAULT_PERSONA,
};
pub use llm::{
    Completion, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, Message, MessageRole,
    ModelIdentifier, ModelInvoker, ProviderKind, RetryPolicy, Usage,
};
pub use pii::{default_pii_patterns, PiiScan, PiiScanner};
pub use test_case::{SourceFormat, TestCase};
pub use usage::{default_model_pricing, ModelPricing, PricingTable};
