//! Test case loading from the filesystem

mod loader;
mod parser;

pub use loader::{discover, load};
pub use parser::parse_file;
