//! Configuration management for GEOS-Agent
//!
//! Supports environment variables, config files, and CLI overrides.
//!
//! Config file location: ~/.config/geos-agent/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::error::{AgentError, Result};

/// Environment variable holding the API key for the chat endpoint
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Main configuration for GEOS-Agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chat completions endpoint configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Agent behavior configuration
    #[serde(default)]
    pub agent: AgentSettings,
}

/// Chat completions endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Agent behavior configuration
///
/// Immutable per agent instance: the loop reads these once at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Model identifier sent with every request
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum reply token count
    pub max_tokens: u32,
    /// Maximum model calls per run
    pub max_steps: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            agent: AgentSettings::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            timeout_secs: 120,
        }
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: env::var("GEOS_AGENT_MODEL").unwrap_or_else(|_| "gpt-5.1-mini".to_string()),
            temperature: 0.1,
            max_tokens: 2048,
            max_steps: 10,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("geos-agent")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > config file > env vars > defaults
    pub fn load() -> Self {
        // Pick up a .env file if one exists (API key, base URL overrides)
        let _ = dotenvy::dotenv();

        if let Ok(config) = Self::load_from_file() {
            return config;
        }

        // Fall back to defaults (which respect env vars)
        Self::default()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(AgentError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| AgentError::config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| AgentError::config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| AgentError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AgentError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| AgentError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Read the API key from the environment
    pub fn api_key() -> Result<String> {
        env::var(API_KEY_VAR).map_err(|_| AgentError::MissingApiKey(API_KEY_VAR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.agent.model, "gpt-5.1-mini");
        assert_eq!(config.agent.max_steps, 10);
        assert_eq!(config.agent.max_tokens, 2048);
        assert!((config.agent.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("max_steps"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.agent.model, config.agent.model);
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("geos-agent"));
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let parsed: Config = toml::from_str("[agent]\nmodel = \"gpt-test\"\ntemperature = 0.2\nmax_tokens = 512\nmax_steps = 3\n").unwrap();
        assert_eq!(parsed.agent.model, "gpt-test");
        assert_eq!(parsed.agent.max_steps, 3);
        assert_eq!(parsed.api.timeout_secs, 120);
    }
}
