//! Test case domain - definitions loaded from the test case directory

mod entity;
mod format;

pub use entity::{DEFAULT_CATEGORY, DEFAULT_DIFFICULTY, PARSE_FAILURE_PREFIX, TestCase};
pub use format::SourceFormat;
