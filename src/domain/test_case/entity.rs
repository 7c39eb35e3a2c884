//! Test case entity and related types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_DIFFICULTY: &str = "Medium";

/// Prefix carried by the prompt of a test case whose source could not be parsed
pub const PARSE_FAILURE_PREFIX: &str = "Failed to parse test case";

/// A prompt to send to each model under test, plus the criteria the judge scores against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    name: String,
    category: String,
    difficulty: String,
    prompt: String,
    expectations: Vec<String>,
    metadata: BTreeMap<String, Value>,
}

impl TestCase {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: DEFAULT_CATEGORY.to_string(),
            difficulty: DEFAULT_DIFFICULTY.to_string(),
            prompt: prompt.into(),
            expectations: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Placeholder for a source that could not be read or parsed; the error travels as the prompt
    pub fn parse_failure(name: impl Into<String>, error: impl std::fmt::Display) -> Self {
        let name = name.into();
        let prompt = format!("{} '{}': {}", PARSE_FAILURE_PREFIX, name, error);
        Self::new(name, prompt)
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = difficulty.into();
        self
    }

    pub fn with_expectations(mut self, expectations: Vec<String>) -> Self {
        self.expectations = expectations;
        self
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn expectations(&self) -> &[String] {
        &self.expectations
    }

    pub fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    pub fn is_parse_failure(&self) -> bool {
        self.prompt.starts_with(PARSE_FAILURE_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tc = TestCase::new("capital", "What is the capital of France?");

        assert_eq!(tc.name(), "capital");
        assert_eq!(tc.category(), "General");
        assert_eq!(tc.difficulty(), "Medium");
        assert!(tc.expectations().is_empty());
        assert!(tc.metadata().is_empty());
        assert!(!tc.is_parse_failure());
    }

    #[test]
    fn test_builder_fields() {
        let mut metadata = BTreeMap::new();
        metadata.insert("owner".to_string(), Value::String("qa".to_string()));

        let tc = TestCase::new("capital", "What is the capital of France?")
            .with_category("Geography")
            .with_difficulty("Easy")
            .with_expectations(vec!["mentions Paris".to_string()])
            .with_metadata(metadata);

        assert_eq!(tc.category(), "Geography");
        assert_eq!(tc.difficulty(), "Easy");
        assert_eq!(tc.expectations().to_vec(), vec!["mentions Paris".to_string()]);
        assert_eq!(tc.metadata().get("owner"), Some(&Value::String("qa".to_string())));
    }

    #[test]
    fn test_parse_failure_placeholder() {
        let tc = TestCase::parse_failure("broken", "missing field `prompt`");

        assert!(tc.is_parse_failure());
        assert_eq!(tc.name(), "broken");
        assert_eq!(tc.category(), DEFAULT_CATEGORY);
        assert!(tc.prompt().contains("missing field `prompt`"));
        assert!(tc.prompt().contains("'broken'"));
    }
}
