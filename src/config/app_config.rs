use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::ConfigError;
use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::domain::{
    default_model_pricing, default_personas, default_pii_patterns, DomainError, JudgePolicy,
    ModelIdentifier, ModelPricing, PersonaRegistry, PricingTable, RetryPolicy, DEFAULT_PERSONA,
};
use crate::infrastructure::observability::MetricsConfig;

/// Prefix for environment overrides, e.g. `EVAL__EVALUATION__MAX_WORKERS=8`
pub const ENV_PREFIX: &str = "EVAL";

/// Optional layered files, searched with these extensions
const LAYERED_FILES: [&str; 2] = ["config/default", "config/local"];
const FILE_EXTENSIONS: [&str; 4] = ["toml", "json", "yaml", "yml"];

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub judge: JudgeConfig,
    /// Extra or overriding entries on top of the built-in pricing table
    #[serde(default)]
    pub pricing: HashMap<String, ModelPricing>,
    /// Replaces the built-in PII patterns when present
    #[serde(default)]
    pub pii_patterns: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default = "default_test_cases_dir")]
    pub test_cases_dir: PathBuf,
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    #[serde(default = "default_judge_model")]
    pub judge_model: String,
    #[serde(default = "default_persona")]
    pub default_persona: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Judge fallback scores and persona instructions
#[derive(Debug, Clone, Deserialize, Default)]
pub struct JudgeConfig {
    #[serde(default)]
    pub simulated_score: Option<f64>,
    #[serde(default)]
    pub unparseable_score: Option<f64>,
    #[serde(default)]
    pub error_score: Option<f64>,
    /// Extra or overriding personas on top of the built-in ones
    #[serde(default)]
    pub personas: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_test_cases_dir() -> PathBuf {
    PathBuf::from("test_cases")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_max_workers() -> usize {
    5
}

fn default_judge_model() -> String {
    "simulated:judge".to_string()
}

fn default_persona() -> String {
    DEFAULT_PERSONA.to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            test_cases_dir: default_test_cases_dir(),
            results_dir: default_results_dir(),
            max_workers: default_max_workers(),
            judge_model: default_judge_model(),
            default_persona: default_persona(),
            timeout_seconds: default_timeout_seconds(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl EvaluationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl JudgeConfig {
    pub fn policy(&self) -> JudgePolicy {
        let defaults = JudgePolicy::default();

        JudgePolicy {
            simulated_score: self.simulated_score.unwrap_or(defaults.simulated_score),
            unparseable_score: self.unparseable_score.unwrap_or(defaults.unparseable_score),
            error_score: self.error_score.unwrap_or(defaults.error_score),
        }
    }

    pub fn persona_registry(&self) -> PersonaRegistry {
        let mut personas = default_personas();
        personas.extend(self.personas.clone());
        PersonaRegistry::new(personas)
    }
}

impl AppConfig {
    /// Load layered configuration: defaults, `config/default`, `config/local`,
    /// an explicit file, then `EVAL__*` environment variables
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        for name in LAYERED_FILES {
            builder = builder.add_source(config::File::with_name(name).required(false));
        }

        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize()?;

        let mut names = TableKeys::default();
        for path in layered_paths(explicit) {
            names.merge(TableKeys::read(&path)?);
        }
        app_config.restore_table_key_case(&names);

        Ok(app_config)
    }

    /// The `config` crate lowercases every key; put back the spelling used in the
    /// files for tables whose keys are user-chosen names
    fn restore_table_key_case(&mut self, names: &TableKeys) {
        restore_key_case(&mut self.pricing, &names.pricing);
        restore_key_case(&mut self.judge.personas, &names.personas);
        if let Some(patterns) = self.pii_patterns.as_mut() {
            restore_key_case(patterns, &names.pii_patterns);
        }
    }

    /// Reject settings that cannot produce a meaningful run
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.evaluation.max_workers == 0 {
            return Err(DomainError::configuration("evaluation.max_workers must be at least 1"));
        }

        if self.evaluation.timeout_seconds == 0 {
            return Err(DomainError::configuration(
                "evaluation.timeout_seconds must be at least 1",
            ));
        }

        self.judge_model()?;

        for (name, score) in [
            ("simulated_score", self.judge.simulated_score),
            ("unparseable_score", self.judge.unparseable_score),
            ("error_score", self.judge.error_score),
        ] {
            if let Some(score) = score {
                if !(0.0..=1.0).contains(&score) {
                    return Err(DomainError::configuration(format!(
                        "judge.{} must be between 0.0 and 1.0, got {}",
                        name, score
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn judge_model(&self) -> Result<ModelIdentifier, DomainError> {
        self.evaluation.judge_model.parse()
    }

    pub fn pricing_table(&self) -> PricingTable {
        let mut entries = default_model_pricing();
        entries.extend(self.pricing.clone());
        PricingTable::new(entries)
    }

    pub fn pii_patterns(&self) -> BTreeMap<String, String> {
        self.pii_patterns
            .clone()
            .unwrap_or_else(default_pii_patterns)
    }
}

/// Key spellings of the user-named tables, as written in the config files
#[derive(Debug, Default)]
struct TableKeys {
    pricing: BTreeSet<String>,
    personas: BTreeSet<String>,
    pii_patterns: BTreeSet<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NamedTables {
    #[serde(default)]
    pricing: BTreeMap<String, IgnoredAny>,
    #[serde(default)]
    pii_patterns: BTreeMap<String, IgnoredAny>,
    #[serde(default)]
    judge: NamedJudgeTables,
}

#[derive(Debug, Default, Deserialize)]
struct NamedJudgeTables {
    #[serde(default)]
    personas: BTreeMap<String, IgnoredAny>,
}

impl TableKeys {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Foreign(Box::new(e)))?;

        let tables: NamedTables = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| ConfigError::Foreign(Box::new(e)))?,
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| ConfigError::Foreign(Box::new(e)))?
            }
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| ConfigError::Foreign(Box::new(e)))?
            }
            _ => NamedTables::default(),
        };

        Ok(Self {
            pricing: tables.pricing.into_keys().collect(),
            personas: tables.judge.personas.into_keys().collect(),
            pii_patterns: tables.pii_patterns.into_keys().collect(),
        })
    }

    fn merge(&mut self, other: TableKeys) {
        self.pricing.extend(other.pricing);
        self.personas.extend(other.personas);
        self.pii_patterns.extend(other.pii_patterns);
    }
}

/// Existing config files in layering order
fn layered_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = LAYERED_FILES
        .iter()
        .flat_map(|name| {
            FILE_EXTENSIONS
                .iter()
                .map(move |ext| PathBuf::from(format!("{}.{}", name, ext)))
        })
        .filter(|path| path.is_file())
        .collect();

    paths.extend(explicit.map(Path::to_path_buf));
    paths
}

fn restore_key_case<M, V>(map: &mut M, spellings: &BTreeSet<String>)
where
    M: Default + IntoIterator<Item = (String, V)> + FromIterator<(String, V)>,
{
    *map = std::mem::take(map)
        .into_iter()
        .map(|(key, value)| {
            let key = spellings
                .iter()
                .find(|spelling| spelling.to_lowercase() == key)
                .cloned()
                .unwrap_or(key);
            (key, value)
        })
        .collect();
}
