use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use tracing::warn;

pub const DEFAULT_BRANDS: [&str; 6] = ["pepsi", "lays", "doritos", "gatorade", "tropicana", "quaker"];
pub const DEFAULT_CATEGORIES: [&str; 5] = [
    "carbonated drinks",
    "snacks",
    "sports drinks",
    "juices",
    "cereals",
];

/// Upper bound for `scoring.max_candidates`.
pub const MAX_CANDIDATES_LIMIT: usize = 5;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".into(),
            model: "llama3-8b-8192".into(),
            api_key: None,
            temperature: 0.1,
            max_tokens: 300,
            timeout_seconds: 30,
        }
    }
}

/// Weights and cut-offs used by the match scorer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub brand_weight: f64,
    pub category_weight: f64,
    pub size_weight: f64,
    pub flavor_weight: f64,
    pub product_type_weight: f64,
    pub token_weight: f64,
    /// Name tokens must be strictly longer than this to count.
    pub min_token_chars: usize,
    /// Candidates need a score strictly above this.
    pub threshold: f64,
    pub max_candidates: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            brand_weight: 0.3,
            category_weight: 0.3,
            size_weight: 0.2,
            flavor_weight: 0.2,
            product_type_weight: 0.2,
            token_weight: 0.1,
            min_token_chars: 2,
            threshold: 0.3,
            max_candidates: 5,
        }
    }
}

impl ScoringConfig {
    /// Weights and threshold must be finite and non-negative so scores only
    /// grow; the candidate cap must lie in `1..=MAX_CANDIDATES_LIMIT`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("brand_weight", self.brand_weight),
            ("category_weight", self.category_weight),
            ("size_weight", self.size_weight),
            ("flavor_weight", self.flavor_weight),
            ("product_type_weight", self.product_type_weight),
            ("token_weight", self.token_weight),
            ("threshold", self.threshold),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "scoring.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if !(1..=MAX_CANDIDATES_LIMIT).contains(&self.max_candidates) {
            return Err(ConfigError::Invalid(format!(
                "scoring.max_candidates must be between 1 and {}, got {}",
                MAX_CANDIDATES_LIMIT, self.max_candidates
            )));
        }
        Ok(())
    }
}

/// Ordered keyword lists for the deterministic fallback. Order matters: the
/// first hit wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub brands: Vec<String>,
    pub categories: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            brands: DEFAULT_BRANDS.iter().map(|s| s.to_string()).collect(),
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_path: String,
    pub llm: LlmConfig,
    pub scoring: ScoringConfig,
    pub vocabulary: Vocabulary,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: "sample_data.json".into(),
            llm: LlmConfig::default(),
            scoring: ScoringConfig::default(),
            vocabulary: Vocabulary::default(),
        }
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    config.scoring.validate()?;
    Ok(config)
}

/// Picks the API key: a non-blank environment value wins over a non-blank
/// config value; blank keys count as missing.
pub fn resolve_api_key(config_key: Option<String>, env_key: Option<String>) -> Option<String> {
    let non_blank = |key: Option<String>| key.filter(|k| !k.trim().is_empty());
    non_blank(env_key).or_else(|| non_blank(config_key))
}

/// Loads the config file, falling back to defaults when it does not exist.
/// `GROQ_API_KEY` takes precedence over `llm.api_key`.
pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let mut config = match fs::read_to_string(path) {
        Ok(content) => parse_config(&content)?,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Config file {} not found, using defaults", path);
            AppConfig::default()
        }
        Err(e) => return Err(e.into()),
    };

    config.llm.api_key = resolve_api_key(config.llm.api_key.take(), std::env::var("GROQ_API_KEY").ok());
    Ok(config)
}
