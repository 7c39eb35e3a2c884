//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, EvaluationConfig, JudgeConfig, LogFormat, LoggingConfig, ENV_PREFIX,
};
