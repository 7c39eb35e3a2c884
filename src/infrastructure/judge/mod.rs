//! Response judging implementations

mod llm_judge;

pub use llm_judge::LlmJudge;
