// src/config/qa.rs
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

pub const DEFAULT_QA_CONFIG_PATH: &str = "config/qa.json";
pub const ENV_QA_CONFIG_PATH: &str = "QA_CONFIG_PATH";
pub const DEFAULT_QA_MODEL: &str = "distilbert-base-cased-distilled-squad";
pub const ENV_QA_TEST_MODE: &str = "QA_TEST_MODE";

/// `QA_TEST_MODE=mock` forces the offline model; no API key is needed then.
pub fn mock_mode_forced() -> bool {
    env::var(ENV_QA_TEST_MODE)
        .map(|v| v == "mock")
        .unwrap_or(false)
}

fn default_provider() -> String {
    "huggingface".to_string()
}
fn default_model() -> String {
    DEFAULT_QA_MODEL.to_string()
}
fn default_timeout_secs() -> u64 {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QaConfig {
    pub enabled: bool,
    /// "huggingface" | "mock" (case-insensitive)
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// "ENV" means: read from HF_API_TOKEN
    #[serde(default)]
    pub api_key: String,
    /// Optional endpoint override (self-hosted inference servers).
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_provider(),
            model: default_model(),
            api_key: String::new(),
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl QaConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(data: &str) -> anyhow::Result<Self> {
        let mut cfg: QaConfig = serde_json::from_str(data)?;

        cfg.provider = cfg.provider.trim().to_lowercase();

        if cfg.api_key.trim().eq_ignore_ascii_case("env") {
            cfg.api_key = match cfg.provider.as_str() {
                _ if mock_mode_forced() => String::new(),
                "huggingface" => env::var("HF_API_TOKEN")
                    .map_err(|_| anyhow::anyhow!("Missing HF_API_TOKEN env var"))?,
                "mock" => String::new(),
                other => anyhow::bail!("Unsupported provider in config: {other}"),
            };
        }

        if cfg.timeout_secs == 0 {
            cfg.timeout_secs = default_timeout_secs();
        }

        Ok(cfg)
    }

    /// `$QA_CONFIG_PATH`, then `config/qa.json`; a missing file means disabled.
    pub fn load_default() -> anyhow::Result<Self> {
        let path = env::var(ENV_QA_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_QA_CONFIG_PATH.into());
        if !Path::new(&path).exists() {
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_json_fills_defaults() {
        let cfg = QaConfig::from_json_str(r#"{"enabled": true, "provider": " HuggingFace "}"#)
            .unwrap();
        assert!(cfg.enabled);
        assert_eq!(cfg.provider, "huggingface");
        assert_eq!(cfg.model, DEFAULT_QA_MODEL);
        assert_eq!(cfg.timeout_secs, 20);
        assert!(cfg.endpoint.is_none());
    }

    #[test]
    fn unknown_provider_with_env_key_is_rejected() {
        let err = QaConfig::from_json_str(r#"{"enabled": true, "provider": "acme", "api_key": "ENV"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("acme"));
    }
}
