//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `CODECACHE_*` environment
//! variables; the OpenAI key is read from the conventional `OPENAI_API_KEY`.

pub mod error;


pub use error::ConfigError;

use std::env;

use crate::constants::{
    DEFAULT_COLLECTION_NAME, DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_MODEL,
};

/// Default qdrant URL used when `CODECACHE_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default OpenAI API base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Cache service configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CODECACHE_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Collection holding cached snippets. Default: `cached_code`.
    pub collection_name: String,

    /// Embedding model identity. Default: `text-embedding-3-small`.
    ///
    /// Must stay fixed for the lifetime of a collection: vectors produced by
    /// different models are not comparable.
    pub embedding_model: String,

    /// Embedding dimension. Default: `1536`.
    pub embedding_dim: usize,

    /// OpenAI API base URL. Default: `https://api.openai.com`.
    pub openai_base_url: String,

    /// OpenAI API key (`OPENAI_API_KEY`). No default.
    pub openai_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection_name: DEFAULT_COLLECTION_NAME.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_api_key: None,
        }
    }
}

impl Config {
    const ENV_QDRANT_URL: &'static str = "CODECACHE_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "CODECACHE_COLLECTION";
    const ENV_EMBEDDING_MODEL: &'static str = "CODECACHE_EMBEDDING_MODEL";
    const ENV_EMBEDDING_DIM: &'static str = "CODECACHE_EMBEDDING_DIM";
    const ENV_OPENAI_BASE_URL: &'static str = "CODECACHE_OPENAI_BASE_URL";
    const ENV_OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let collection_name =
            Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection_name);
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let embedding_dim = Self::parse_dim_from_env(defaults.embedding_dim)?;
        let openai_base_url =
            Self::parse_string_from_env(Self::ENV_OPENAI_BASE_URL, defaults.openai_base_url);
        let openai_api_key = Self::parse_optional_string_from_env(Self::ENV_OPENAI_API_KEY);

        Ok(Self {
            qdrant_url,
            collection_name,
            embedding_model,
            embedding_dim,
            openai_base_url,
            openai_api_key,
        })
    }

    /// Validates basic invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(ConfigError::EmptyQdrantUrl);
        }

        if self.collection_name.trim().is_empty() {
            return Err(ConfigError::EmptyCollectionName);
        }

        if self.embedding_dim == 0 {
            return Err(ConfigError::InvalidDim {
                value: self.embedding_dim.to_string(),
            });
        }

        Ok(())
    }

    /// Returns the API key or a [`ConfigError::MissingEnvVar`] if unset.
    pub fn require_openai_api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .ok_or(ConfigError::MissingEnvVar {
                name: Self::ENV_OPENAI_API_KEY,
            })
    }

    fn parse_dim_from_env(default: usize) -> Result<usize, ConfigError> {
        match env::var(Self::ENV_EMBEDDING_DIM) {
            Ok(value) => {
                let dim: usize = value.parse().map_err(|e| ConfigError::DimParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if dim == 0 {
                    return Err(ConfigError::InvalidDim { value });
                }

                Ok(dim)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
