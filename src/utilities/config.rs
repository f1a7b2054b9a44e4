//! Runtime configuration.
//!
//! Values come from built-in defaults, optionally replaced by a YAML file
//! (path in `CLOUDPOOF_CONFIG`), then by individual environment variables:
//!
//! - `CLOUDPOOF_LEVEL` — starting consciousness level (default: omega);
//!   `CONSCIOUSNESS_LEVEL` is accepted when it is unset
//! - `PREDICTION_DEPTH` — foresight depth, 1..=20 (default: 20)
//! - `MAX_GENERATION_ATTEMPTS` — uniqueness retry bound (default: 1000)
//! - `MAX_SESSIONS` — open HTTP sessions, default one included (default: 1000)
//! - `HOST` — HTTP bind host (default: 0.0.0.0)
//! - `PORT` — HTTP port (default: 8000)

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consciousness::ConsciousnessLevel;
use crate::entropy::DEFAULT_MAX_ATTEMPTS;
use crate::foresight::MAX_DEPTH;
use crate::utilities::errors::{OmegaError, OmegaResult};

/// Environment variable naming an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "CLOUDPOOF_CONFIG";

/// Default bound on concurrently open HTTP sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
        }
    }
}

/// Top-level configuration shared by the CLI and the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OmegaConfig {
    /// Level every new session starts in.
    pub consciousness_level: ConsciousnessLevel,
    /// Foresight depth for new sessions.
    pub prediction_depth: usize,
    /// Retry bound for unique insight generation.
    pub max_generation_attempts: usize,
    /// Open sessions the HTTP server will hold, the default one included.
    pub max_sessions: usize,
    pub server: ServerConfig,
}

impl Default for OmegaConfig {
    fn default() -> Self {
        Self {
            consciousness_level: ConsciousnessLevel::Omega,
            prediction_depth: MAX_DEPTH,
            max_generation_attempts: DEFAULT_MAX_ATTEMPTS,
            max_sessions: DEFAULT_MAX_SESSIONS,
            server: ServerConfig::default(),
        }
    }
}

/// Output formats for [`OmegaConfig::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Env,
}

impl OmegaConfig {
    /// Parse and validate a YAML document. Missing keys take defaults.
    pub fn from_yaml_str(yaml: &str) -> OmegaResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> OmegaResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Load from `CLOUDPOOF_CONFIG` (if set) and the process environment.
    pub fn from_env() -> OmegaResult<Self> {
        let base = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                tracing::info!(%path, "loading configuration file");
                Self::from_yaml_file(&path)?
            }
            Err(_) => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply variable overrides from `lookup`, then validate.
    pub fn with_overrides<F>(mut self, lookup: F) -> OmegaResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("CLOUDPOOF_LEVEL").or_else(|| lookup("CONSCIOUSNESS_LEVEL")) {
            self.consciousness_level = ConsciousnessLevel::from_str(&level)?;
        }
        if let Some(depth) = lookup("PREDICTION_DEPTH") {
            self.prediction_depth = parse_number("PREDICTION_DEPTH", &depth)?;
        }
        if let Some(attempts) = lookup("MAX_GENERATION_ATTEMPTS") {
            self.max_generation_attempts = parse_number("MAX_GENERATION_ATTEMPTS", &attempts)?;
        }
        if let Some(sessions) = lookup("MAX_SESSIONS") {
            self.max_sessions = parse_number("MAX_SESSIONS", &sessions)?;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_number("PORT", &port)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check value ranges.
    pub fn validate(&self) -> OmegaResult<()> {
        if !(1..=MAX_DEPTH).contains(&self.prediction_depth) {
            return Err(OmegaError::config(format!(
                "prediction_depth must be between 1 and {}, got {}",
                MAX_DEPTH, self.prediction_depth
            )));
        }
        if self.max_generation_attempts == 0 {
            return Err(OmegaError::config("max_generation_attempts must be at least 1"));
        }
        if self.max_sessions == 0 {
            return Err(OmegaError::config("max_sessions must be at least 1"));
        }
        Ok(())
    }

    /// `host:port` for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Render the configuration in `format`.
    pub fn render(&self, format: ConfigFormat) -> OmegaResult<String> {
        match format {
            ConfigFormat::Yaml => Ok(serde_yaml::to_string(self)?),
            ConfigFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| OmegaError::config(format!("JSON rendering failed: {}", e))),
            ConfigFormat::Env => Ok(format!(
                "CLOUDPOOF_LEVEL={}\nPREDICTION_DEPTH={}\nMAX_GENERATION_ATTEMPTS={}\nMAX_SESSIONS={}\nHOST={}\nPORT={}\n",
                self.consciousness_level,
                self.prediction_depth,
                self.max_generation_attempts,
                self.max_sessions,
                self.server.host,
                self.server.port,
            )),
        }
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> OmegaResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| OmegaError::config(format!("{} must be a number, got '{}'", key, raw)))
}

// ============================================================================
// Tests
// ============================================================================
