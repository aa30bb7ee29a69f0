use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for tos-digest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub completion: CompletionConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the bearer credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,

    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Sanitized length above which results are flagged as truncation risk
    #[serde(default = "default_soft_limit")]
    pub soft_limit_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_completion_timeout(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: default_max_chunk_chars(),
            max_concurrency: default_max_concurrency(),
            soft_limit_chars: default_soft_limit(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api.together.xyz/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "meta-llama/Llama-3-70b-chat-hf".to_string()
}

fn default_api_key_env() -> String {
    "TOGETHER_API_KEY".to_string()
}

fn default_completion_timeout() -> u64 {
    60
}

fn default_max_chunk_chars() -> usize {
    12_000
}

fn default_max_concurrency() -> usize {
    4
}

fn default_soft_limit() -> usize {
    60_000
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("tos-digest/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_max_upload() -> usize {
    10 * 1024 * 1024
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Environment variable {0} is not set")]
    MissingApiKey(String),
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, writing the defaults there if it does not exist
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(io_err)?;
            toml::from_str(&content)?
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(path, content).map_err(io_err)?;
            config
        };

        config.validate()?;
        Ok(config)
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "tos-digest", "tos-digest") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.tos-digest/config.toml")
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.max_chunk_chars == 0 {
            return Err(ConfigError::Invalid(
                "pipeline.max_chunk_chars must be greater than zero".to_string(),
            ));
        }
        if self.pipeline.max_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "pipeline.max_concurrency must be greater than zero".to_string(),
            ));
        }
        if self.completion.timeout_secs == 0 || self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Read the completion credential from the configured environment variable
    pub fn api_key(&self) -> Result<String, ConfigError> {
        std::env::var(&self.completion.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(self.completion.api_key_env.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.pipeline.max_chunk_chars, 12_000);
        assert_eq!(config.pipeline.soft_limit_chars, 60_000);
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.completion.api_key_env, "TOGETHER_API_KEY");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.completion.model, config.completion.model);
        assert_eq!(parsed.pipeline.max_concurrency, config.pipeline.max_concurrency);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: Config = toml::from_str("[pipeline]\nmax_concurrency = 2\n").unwrap();
        assert_eq!(parsed.pipeline.max_concurrency, 2);
        assert_eq!(parsed.pipeline.max_chunk_chars, 12_000);
        assert_eq!(parsed.fetch.timeout_secs, 30);
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.server.host, "127.0.0.1");
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.completion.endpoint, config.completion.endpoint);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pipeline]\nmax_chunk_chars = 0\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_api_key_env() {
        let mut config = Config::default();
        config.completion.api_key_env = "TOS_DIGEST_TEST_UNSET_KEY_VAR".to_string();

        assert!(matches!(
            config.api_key(),
            Err(ConfigError::MissingApiKey(_))
        ));
    }
}
