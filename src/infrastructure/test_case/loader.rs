//! Discovery of test case sources in a directory

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::parser::parse_file;
use crate::domain::{DomainError, SourceFormat, TestCase};

/// Recognized test case files in `dir`, sorted by file name
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>, DomainError> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        DomainError::storage(format!(
            "Cannot read test case directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let mut files = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| {
            DomainError::storage(format!("Cannot list {}: {}", dir.display(), e))
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        match SourceFormat::from_path(&path) {
            Some(_) => files.push(path),
            None => debug!(path = %path.display(), "Skipping unrecognized file"),
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Discover and parse every test case in `dir`
pub async fn load(dir: &Path) -> Result<Vec<TestCase>, DomainError> {
    let sources = discover(dir)?;
    let mut test_cases = Vec::with_capacity(sources.len());

    for source in &sources {
        test_cases.push(parse_file(source).await);
    }

    info!(
        dir = %dir.display(),
        count = test_cases.len(),
        "Loaded test cases"
    );

    Ok(test_cases)
}
