//! Parsing of test case sources into `TestCase` values
//!
//! Parsing never fails at the API level: any problem reading or decoding a source
//! yields a placeholder test case whose prompt carries the error.

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::{DomainError, SourceFormat, TestCase};

/// Number of leading lines scanned for freeform headers
const HEADER_SCAN_LINES: usize = 5;

static CATEGORY_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*category\s*:\s*(.*?)\s*$").unwrap());

static DIFFICULTY_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*difficulty\s*:\s*(.*?)\s*$").unwrap());

/// Structured test case document (YAML, JSON or TOML)
#[derive(Debug, Deserialize)]
struct TestCaseDocument {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default, alias = "expected_keywords")]
    expectations: Vec<String>,
    #[serde(default)]
    metadata: BTreeMap<String, Value>,
}

/// Test case name for a source path: the file stem
fn test_case_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read and parse a test case file
pub async fn parse_file(path: &Path) -> TestCase {
    let name = test_case_name(path);

    match tokio::fs::read_to_string(path).await {
        Ok(content) => parse_source(&name, SourceFormat::from_path(path), &content),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read test case");
            TestCase::parse_failure(name, format!("cannot read {}: {}", path.display(), e))
        }
    }
}

/// Parse already-loaded source text
fn parse_source(name: &str, format: Option<SourceFormat>, content: &str) -> TestCase {
    let parsed = match format {
        Some(SourceFormat::Freeform) => parse_freeform(name, content),
        Some(format) => parse_structured(name, format, content),
        None => Err(DomainError::parse("unsupported test case format")),
    };

    parsed.unwrap_or_else(|e| {
        warn!(test_case = name, error = %e, "Using placeholder for unparseable test case");
        TestCase::parse_failure(name, e)
    })
}

/// Decode a structured document
fn parse_structured(
    name: &str,
    format: SourceFormat,
    content: &str,
) -> Result<TestCase, DomainError> {
    let document: TestCaseDocument = match format {
        SourceFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| DomainError::parse(format!("invalid YAML: {}", e)))?,
        SourceFormat::Json => serde_json::from_str(content)
            .map_err(|e| DomainError::parse(format!("invalid JSON: {}", e)))?,
        SourceFormat::Toml => toml::from_str(content)
            .map_err(|e| DomainError::parse(format!("invalid TOML: {}", e)))?,
        SourceFormat::Freeform => {
            return Err(DomainError::parse("freeform text is not a structured document"));
        }
    };

    let prompt = document
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| DomainError::parse("missing required field 'prompt'"))?;

    let mut test_case = TestCase::new(name, prompt)
        .with_expectations(document.expectations)
        .with_metadata(document.metadata);

    if let Some(category) = non_blank(document.category) {
        test_case = test_case.with_category(category);
    }
    if let Some(difficulty) = non_blank(document.difficulty) {
        test_case = test_case.with_difficulty(difficulty);
    }

    Ok(test_case)
}

/// Split freeform text into optional headers and the prompt body
fn parse_freeform(name: &str, content: &str) -> Result<TestCase, DomainError> {
    let mut category = None;
    let mut difficulty = None;
    let mut body = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if index < HEADER_SCAN_LINES {
            if let Some(caps) = CATEGORY_HEADER.captures(line) {
                category = Some(caps[1].to_string());
                continue;
            }
            if let Some(caps) = DIFFICULTY_HEADER.captures(line) {
                difficulty = Some(caps[1].to_string());
                continue;
            }
        }
        body.push(line);
    }

    let prompt = body.join("\n").trim().to_string();
    if prompt.is_empty() {
        return Err(DomainError::parse("freeform test case has no prompt text"));
    }

    let mut test_case = TestCase::new(name, prompt);

    if let Some(category) = non_blank(category) {
        test_case = test_case.with_category(category);
    }
    if let Some(difficulty) = non_blank(difficulty) {
        test_case = test_case.with_difficulty(difficulty);
    }

    Ok(test_case)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
