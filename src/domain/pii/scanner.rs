use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Outcome of scanning one piece of text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiScan {
    pub found: bool,
    pub types: Vec<String>,
}

/// A set of named patterns compiled once and applied to every response
#[derive(Debug, Clone, Default)]
pub struct PiiScanner {
    patterns: Vec<(String, Regex)>,
}

impl PiiScanner {
    /// Compile the given `(category, pattern)` pairs, keeping their iteration order.
    /// Patterns that fail to compile are skipped with a warning.
    pub fn new<I, K, V>(patterns: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut compiled = Vec::new();

        for (category, pattern) in patterns {
            let category = category.into();
            match Regex::new(pattern.as_ref()) {
                Ok(regex) => compiled.push((category, regex)),
                Err(e) => {
                    warn!(category = %category, "Skipping invalid PII pattern: {}", e);
                }
            }
        }

        Self { patterns: compiled }
    }

    /// Categories with a usable pattern, in scan order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(name, _)| name.as_str())
    }

    pub fn scan(&self, text: &str) -> PiiScan {
        let mut types: Vec<String> = Vec::new();

        for (category, regex) in &self.patterns {
            if regex.is_match(text) && !types.iter().any(|t| t == category) {
                types.push(category.clone());
            }
        }

        PiiScan {
            found: !types.is_empty(),
            types,
        }
    }
}

/// Default pattern table
pub fn default_pii_patterns() -> BTreeMap<String, String> {
    let mut patterns = BTreeMap::new();

    patterns.insert(
        "credit_card".to_string(),
        r"\b(?:\d[ -]?){13,16}\b".to_string(),
    );
    patterns.insert(
        "email".to_string(),
        r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}".to_string(),
    );
    patterns.insert(
        "phone".to_string(),
        r"\b(?:\+?1[-. ]?)?\(?\d{3}\)?[-. ]?\d{3}[-. ]\d{4}\b".to_string(),
    );
    patterns.insert("ssn".to_string(), r"\b\d{3}-\d{2}-\d{4}\b".to_string());

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_only() -> PiiScanner {
        PiiScanner::new([("email", r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")])
    }

    #[test]
    fn test_detects_email() {
        let scan = email_only().scan("Contact me at a@b.com");
        assert_eq!(
            scan,
            PiiScan {
                found: true,
                types: vec!["email".to_string()],
            }
        );
    }

    #[test]
    fn test_clean_text() {
        let scan = PiiScanner::new(default_pii_patterns()).scan("The capital of France is Paris.");
        assert!(!scan.found);
        assert!(scan.types.is_empty());
    }

    #[test]
    fn test_each_category_reported_once_in_input_order() {
        let scanner = PiiScanner::new([
            ("phone", r"\d{3}-\d{3}-\d{4}"),
            ("email", r"\S+@\S+\.\w+"),
        ]);

        let scan = scanner.scan("a@b.com, c@d.org, call 555-123-4567 or 555-987-6543");
        assert_eq!(scan.types, vec!["phone".to_string(), "email".to_string()]);
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let scanner = PiiScanner::new([("broken", r"(unclosed"), ("ssn", r"\d{3}-\d{2}-\d{4}")]);

        assert_eq!(scanner.categories().collect::<Vec<_>>(), vec!["ssn"]);

        let scan = scanner.scan("SSN 123-45-6789");
        assert!(scan.found);
        assert_eq!(scan.types, vec!["ssn".to_string()]);
    }

    #[test]
    fn test_empty_table_never_matches() {
        let scanner = PiiScanner::new(Vec::<(String, String)>::new());
        assert!(!scanner.scan("a@b.com").found);
    }

    #[test]
    fn test_default_patterns() {
        let scanner = PiiScanner::new(default_pii_patterns());

        let scan = scanner.scan("Reach jane.doe@example.com or 555-867-5309, SSN 078-05-1120");
        assert!(scan.found);
        assert!(scan.types.contains(&"email".to_string()));
        assert!(scan.types.contains(&"phone".to_string()));
        assert!(scan.types.contains(&"ssn".to_string()));
    }
}
