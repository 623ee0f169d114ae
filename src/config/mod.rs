//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `QUIZMILL_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `QUIZMILL_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `5001`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory holding the extractive QA model
    /// (`config.json`, `model.safetensors`, `tokenizer.json`).
    pub qa_model_path: Option<PathBuf>,

    /// Directory holding the sentence-embedding model.
    pub embedder_path: Option<PathBuf>,

    /// Directory holding the seq2seq question-generation model.
    pub generator_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5001,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            qa_model_path: None,
            embedder_path: None,
            generator_path: None,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "QUIZMILL_PORT";
    const ENV_BIND_ADDR: &'static str = "QUIZMILL_BIND_ADDR";
    const ENV_QA_MODEL_PATH: &'static str = "QUIZMILL_QA_MODEL_PATH";
    const ENV_EMBEDDER_PATH: &'static str = "QUIZMILL_EMBEDDER_PATH";
    const ENV_GENERATOR_PATH: &'static str = "QUIZMILL_GENERATOR_PATH";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let qa_model_path = Self::parse_optional_path_from_env(Self::ENV_QA_MODEL_PATH);
        let embedder_path = Self::parse_optional_path_from_env(Self::ENV_EMBEDDER_PATH);
        let generator_path = Self::parse_optional_path_from_env(Self::ENV_GENERATOR_PATH);

        Ok(Self {
            port,
            bind_addr,
            qa_model_path,
            embedder_path,
            generator_path,
        })
    }

    /// Validates configured model paths (does not load anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [
            self.qa_model_path.as_ref(),
            self.embedder_path.as_ref(),
            self.generator_path.as_ref(),
        ]
        .into_iter()
        .flatten()
        {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}
