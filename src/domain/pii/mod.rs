//! Regex-based detection of personally identifiable information in model output

mod scanner;

pub use scanner::{default_pii_patterns, PiiScan, PiiScanner};
