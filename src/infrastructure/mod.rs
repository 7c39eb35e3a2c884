//! Infrastructure layer - External service implementations

pub mod credentials;
pub mod export;
pub mod judge;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod reporting;
pub mod services;
pub mod test_case;
