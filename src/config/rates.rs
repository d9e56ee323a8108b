// src/config/rates.rs
//! Domain knobs for the extraction pipeline: price band, pre-check shape,
//! QA question, feed scan bounds, HTTP timeouts, and the source list.
//! Everything that ties the crate to "gold in PKR per tola" lives here.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::price::PriceRange;

pub const DEFAULT_RATES_CONFIG_PATH: &str = "config/rates.toml";
pub const ENV_RATES_CONFIG_PATH: &str = "RATES_CONFIG_PATH";
pub const ENV_PRICE_MIN: &str = "RATES_PRICE_MIN";
pub const ENV_PRICE_MAX: &str = "RATES_PRICE_MAX";

pub const DEFAULT_QUESTION: &str = "What is the gold price?";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";
pub const DEFAULT_PATTERN: &str = r"Rs\.\s*\d{3},\d{3}\b";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatesConfig {
    #[serde(default)]
    pub range: PriceRange,
    #[serde(default)]
    pub candidates: CandidateConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceSpec>,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            range: PriceRange::default(),
            candidates: CandidateConfig::default(),
            extraction: ExtractionConfig::default(),
            feed: FeedConfig::default(),
            http: HttpConfig::default(),
            sources: default_sources(),
        }
    }
}

/// Length bounds of the `[\d,]{min,max}` pre-check run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CandidateConfig {
    pub min_digits: usize,
    pub max_digits: usize,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            min_digits: 6,
            max_digits: 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExtractionConfig {
    pub question: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            question: DEFAULT_QUESTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FeedConfig {
    /// Max feed entries inspected per request.
    pub scan_cap: usize,
    /// Case-insensitive substring an entry title must contain.
    pub keyword: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            scan_cap: 5,
            keyword: "gold".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// One configured source. `kind` selects the navigation strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceSpec {
    StaticPage {
        name: String,
        url: String,
    },
    FeedArticle {
        name: String,
        url: String,
    },
    Pattern {
        name: String,
        url: String,
        #[serde(default = "default_pattern")]
        pattern: String,
    },
}

impl SourceSpec {
    pub fn name(&self) -> &str {
        match self {
            SourceSpec::StaticPage { name, .. }
            | SourceSpec::FeedArticle { name, .. }
            | SourceSpec::Pattern { name, .. } => name,
        }
    }
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

pub fn default_sources() -> Vec<SourceSpec> {
    vec![
        SourceSpec::StaticPage {
            name: "Business Recorder".to_string(),
            url: "https://www.brecorder.com/live/gold-rates".to_string(),
        },
        SourceSpec::FeedArticle {
            name: "Dawn News".to_string(),
            url: "https://www.dawn.com/feeds/business".to_string(),
        },
        SourceSpec::Pattern {
            name: "Hamariweb".to_string(),
            url: "https://hamariweb.com/finance/gold_rate/".to_string(),
            pattern: default_pattern(),
        },
    ]
}

impl RatesConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: RatesConfig = toml::from_str(s).context("parsing rates config toml")?;
        cfg.sanitize();
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading rates config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Resolution order:
    /// 1) $RATES_CONFIG_PATH (must exist)
    /// 2) config/rates.toml
    /// 3) built-in defaults
    ///
    /// Price bound env overrides are applied last.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_RATES_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("RATES_CONFIG_PATH points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let default_p = PathBuf::from(DEFAULT_RATES_CONFIG_PATH);
            if default_p.exists() {
                Self::load_from(&default_p)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = parse_u64_env(std::env::var(ENV_PRICE_MIN).ok()) {
            self.range.min = v;
        }
        if let Some(v) = parse_u64_env(std::env::var(ENV_PRICE_MAX).ok()) {
            self.range.max = v;
        }
        self.sanitize();
    }

    fn sanitize(&mut self) {
        self.range.sanitize();
        if self.candidates.min_digits == 0 {
            self.candidates.min_digits = CandidateConfig::default().min_digits;
        }
        if self.candidates.max_digits < self.candidates.min_digits {
            self.candidates.max_digits = self.candidates.min_digits;
        }
        if self.extraction.question.trim().is_empty() {
            self.extraction.question = DEFAULT_QUESTION.to_string();
        }
        self.feed.keyword = self.feed.keyword.trim().to_lowercase();
        if self.http.timeout_secs == 0 {
            self.http.timeout_secs = HttpConfig::default().timeout_secs;
        }
    }
}

fn parse_u64_env(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().replace(['_', ','], "").parse::<u64>().ok())
}
