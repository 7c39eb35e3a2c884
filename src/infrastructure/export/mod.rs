//! Result export

mod json_exporter;

pub use json_exporter::{load_results, ExportedFiles, JsonResultExporter, LATEST_RESULTS_FILE};
