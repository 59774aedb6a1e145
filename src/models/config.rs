use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_EMBEDDING_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_EMBEDDING_DIMENSION: u32 = 1536;
pub const DEFAULT_PINECONE_URL: &str = "https://api.pinecone.io";
pub const DEFAULT_INDEX: &str = "combined-index";
pub const DEFAULT_METRIC: &str = "euclidean";
pub const DEFAULT_CLOUD: &str = "aws";
pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_BATCH_SIZE: u32 = 100;

/// Environment variables consulted at startup. API keys are never read from
/// the config file.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_PINECONE_API_KEY: &str = "PINECONE_API_KEY";
pub const ENV_PINECONE_REGION: &str = "PINECONE_REGION";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    #[serde(default)]
    pub indexing: IndexingConfig,

    #[serde(default)]
    pub retry: RetrySettings,
}

impl Config {
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join("oppindex").join("config.toml"))
    }

    /// Load from the config file if present, otherwise defaults, then apply
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = Self::config_path()
            && path.exists()
        {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str::<Config>(&content)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(region) = std::env::var(ENV_PINECONE_REGION)
            && !region.is_empty()
        {
            self.vector_store.region = region;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indexing.batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.embedding.dimension == 0 {
            return Err(ConfigError::ValidationError(
                "embedding dimension must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read a required API key from the environment.
pub fn require_env(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv(name)),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_url")]
    pub api_url: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    #[serde(default = "default_dimension")]
    pub dimension: u32,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_embedding_url() -> String {
    DEFAULT_EMBEDDING_URL.to_string()
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_dimension() -> u32 {
    DEFAULT_EMBEDDING_DIMENSION
}

fn default_timeout() -> u64 {
    120
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_url: default_embedding_url(),
            model: default_embedding_model(),
            dimension: default_dimension(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default = "default_pinecone_url")]
    pub api_url: String,

    #[serde(default = "default_index")]
    pub index: String,

    #[serde(default = "default_metric")]
    pub metric: String,

    #[serde(default = "default_cloud")]
    pub cloud: String,

    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_pinecone_url() -> String {
    DEFAULT_PINECONE_URL.to_string()
}

fn default_index() -> String {
    DEFAULT_INDEX.to_string()
}

fn default_metric() -> String {
    DEFAULT_METRIC.to_string()
}

fn default_cloud() -> String {
    DEFAULT_CLOUD.to_string()
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            api_url: default_pinecone_url(),
            index: default_index(),
            metric: default_metric(),
            cloud: default_cloud(),
            region: default_region(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    #[serde(default = "default_jobs_path")]
    pub jobs_path: String,

    #[serde(default = "default_opportunities_path")]
    pub opportunities_path: String,
}

fn default_batch_size() -> u32 {
    DEFAULT_BATCH_SIZE
}

fn default_jobs_path() -> String {
    "./data/tmcf_jobs.json".to_string()
}

fn default_opportunities_path() -> String {
    "./data/uncf_opportunities.json".to_string()
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            jobs_path: default_jobs_path(),
            opportunities_path: default_opportunities_path(),
        }
    }
}

/// Retry behavior for network calls. Disabled by default: every embedding or
/// upsert call gets exactly one attempt and the first failure aborts the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default)]
    pub max_retries: u32,

    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10_000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.embedding.api_url, DEFAULT_EMBEDDING_URL);
        assert_eq!(config.embedding.model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(config.embedding.dimension, 1536);
        assert_eq!(config.vector_store.index, DEFAULT_INDEX);
        assert_eq!(config.vector_store.metric, "euclidean");
        assert_eq!(config.indexing.batch_size, 100);
        assert_eq!(config.retry.max_retries, 0);
    }

    #[test]
    fn test_config_parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [vector_store]
            index = "staging-index"
            region = "us-east-1"

            [indexing]
            batch_size = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.vector_store.index, "staging-index");
        assert_eq!(config.vector_store.region, "us-east-1");
        assert_eq!(config.vector_store.cloud, "aws");
        assert_eq!(config.indexing.batch_size, 25);
        assert_eq!(config.embedding.model, DEFAULT_EMBEDDING_MODEL);
    }

    #[test]
    fn test_validate_rejects_zero_batch_size() {
        let mut config = Config::default();
        config.indexing.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_require_env_missing() {
        assert!(require_env("OPPINDEX_TEST_UNSET_VAR").is_err());
    }
}
