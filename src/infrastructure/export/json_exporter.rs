//! JSON persistence of evaluation results

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::{DomainError, EvaluationResult};

/// Stable name of the snapshot overwritten by every run
pub const LATEST_RESULTS_FILE: &str = "latest_results.json";

/// Files written by one export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFiles {
    pub latest: PathBuf,
    pub run: PathBuf,
}

/// Writes result sets as pretty-printed JSON arrays
#[derive(Debug, Clone)]
pub struct JsonResultExporter {
    results_dir: PathBuf,
}

impl JsonResultExporter {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    pub fn latest_path(&self) -> PathBuf {
        self.results_dir.join(LATEST_RESULTS_FILE)
    }

    /// Write the latest snapshot and a uniquely named run file.
    ///
    /// Returns `None` without touching the filesystem when there is nothing to export.
    pub fn export(&self, results: &[EvaluationResult]) -> Result<Option<ExportedFiles>, DomainError> {
        if results.is_empty() {
            return Ok(None);
        }

        let document = serde_json::to_vec_pretty(results)
            .map_err(|e| DomainError::internal(format!("Failed to serialize results: {}", e)))?;

        fs::create_dir_all(&self.results_dir).map_err(|e| {
            DomainError::storage(format!(
                "Failed to create results directory {}: {}",
                self.results_dir.display(),
                e
            ))
        })?;

        let run = self.results_dir.join(run_file_name(Utc::now()));
        write_atomically(&run, &document)?;

        let latest = self.latest_path();
        write_atomically(&latest, &document)?;

        info!(
            count = results.len(),
            latest = %latest.display(),
            run = %run.display(),
            "Exported evaluation results"
        );

        Ok(Some(ExportedFiles { latest, run }))
    }
}

/// Read a persisted result document
pub fn load_results(path: &Path) -> Result<Vec<EvaluationResult>, DomainError> {
    let content = fs::read_to_string(path).map_err(|e| {
        DomainError::storage(format!("Failed to read {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        DomainError::parse(format!("Invalid result document {}: {}", path.display(), e))
    })
}

fn run_file_name(now: DateTime<Utc>) -> String {
    let run_id = Uuid::new_v4().simple().to_string();
    format!("run_{}_{}.json", now.format("%Y%m%d_%H%M%S"), &run_id[..8])
}

/// Write to a sibling temp file, then rename over the destination
fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), DomainError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

    fs::write(&tmp, contents).map_err(|e| {
        DomainError::storage(format!("Failed to write {}: {}", tmp.display(), e))
    })?;

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        DomainError::storage(format!("Failed to replace {}: {}", path.display(), e))
    })
}
