//! QA adapter: extractive question-answering provider abstraction.
//! The model is built once at startup and shared as `Arc<dyn QaModel>`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::qa::{mock_mode_forced, QaConfig};
use crate::price::clean_price;

// ------------------------------------------------------------
// Public surface
// ------------------------------------------------------------

/// Answer span returned by a QA model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QaAnswer {
    pub answer: String,
    /// Model confidence when the provider reports one.
    #[serde(default)]
    pub score: Option<f32>,
}

impl QaAnswer {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            score: None,
        }
    }
}

/// Trait object used by the extraction engine and tests.
pub trait QaModel: Send + Sync {
    /// Ask `question` about `context`; the answer is a substring of `context`.
    fn answer<'a>(
        &'a self,
        question: &'a str,
        context: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<QaAnswer>> + Send + 'a>>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

pub type DynQaModel = Arc<dyn QaModel>;

/// Factory: build a model according to config and environment variables.
///
/// * If `QA_TEST_MODE=mock`, returns the deterministic [`MockQa`].
/// * Else if `config.enabled==false`, returns [`DisabledQa`].
/// * Else builds the configured provider.
pub fn build_qa_model(config: &QaConfig) -> Result<DynQaModel> {
    if mock_mode_forced() {
        return Ok(Arc::new(MockQa));
    }

    if !config.enabled {
        return Ok(Arc::new(DisabledQa));
    }

    match config.provider.as_str() {
        "huggingface" => Ok(Arc::new(HfInferenceModel::from_config(config)?)),
        "mock" => Ok(Arc::new(MockQa)),
        other => bail!("unsupported qa provider: {other}"),
    }
}

// ------------------------------------------------------------
// Hugging Face Inference API
// ------------------------------------------------------------

const HF_INFERENCE_BASE: &str = "https://api-inference.huggingface.co/models";

/// Extractive QA over the hosted inference endpoint of a SQuAD-style model.
pub struct HfInferenceModel {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HfInferenceModel {
    pub fn from_config(config: &QaConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("gold-rate-finder/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building qa http client")?;
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("{HF_INFERENCE_BASE}/{}", config.model));
        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }
}

impl QaModel for HfInferenceModel {
    fn answer<'a>(
        &'a self,
        question: &'a str,
        context: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<QaAnswer>> + Send + 'a>> {
        Box::pin(async move {
            #[derive(Serialize)]
            struct Inputs<'a> {
                question: &'a str,
                context: &'a str,
            }
            #[derive(Serialize)]
            struct Req<'a> {
                inputs: Inputs<'a>,
            }
            #[derive(Deserialize)]
            struct Resp {
                answer: String,
                score: Option<f32>,
            }

            let mut req = self.http.post(&self.endpoint).json(&Req {
                inputs: Inputs { question, context },
            });
            if !self.api_key.is_empty() {
                req = req.bearer_auth(&self.api_key);
            }

            let resp = req.send().await.context("qa inference request")?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                bail!("qa inference http {status}: {}", truncate(&body, 200));
            }
            let body: Resp = resp.json().await.context("decoding qa inference response")?;
            Ok(QaAnswer {
                answer: body.answer,
                score: body.score,
            })
        })
    }

    fn provider_name(&self) -> &'static str {
        "huggingface"
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ------------------------------------------------------------
// Offline models
// ------------------------------------------------------------

/// Always fails; used when QA is disabled.
pub struct DisabledQa;

impl QaModel for DisabledQa {
    fn answer<'a>(
        &'a self,
        _question: &'a str,
        _context: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<QaAnswer>> + Send + 'a>> {
        Box::pin(async { Err(anyhow!("qa disabled")) })
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Deterministic stand-in: answers with the largest money-shaped number in
/// the context (comma-grouped, or four or more plain digits), or an empty span.
pub struct MockQa;

fn money_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"\d{1,3}(?:,\d{2,3})+|\d{4,}").expect("money regex"))
}

impl QaModel for MockQa {
    fn answer<'a>(
        &'a self,
        _question: &'a str,
        context: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<QaAnswer>> + Send + 'a>> {
        let span = money_re()
            .find_iter(context)
            .max_by_key(|m| clean_price(Some(m.as_str())))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        Box::pin(async move {
            Ok(QaAnswer {
                answer: span,
                score: Some(1.0),
            })
        })
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
