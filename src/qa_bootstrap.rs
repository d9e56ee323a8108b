// src/qa_bootstrap.rs
use crate::config::qa::QaConfig;
use crate::extract::qa_adapter::{build_qa_model, DynQaModel};
use tracing::{info, warn};

/// The QA model is expensive to set up; build it once at process start and
/// hand `client` to the extraction engine.
pub struct QaRuntime {
    pub cfg: QaConfig,
    pub client: DynQaModel,
}

impl QaRuntime {
    pub fn from_config(cfg: QaConfig) -> anyhow::Result<Self> {
        // Safe diagnostics: only provider + enabled + key length
        info!(
            "QA cfg loaded: provider={}, model={}, enabled={}, key_len={}",
            cfg.provider,
            cfg.model,
            cfg.enabled,
            cfg.api_key.len()
        );
        let client = build_qa_model(&cfg)?;
        Ok(Self { cfg, client })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_config(QaConfig::load_default()?)
    }

    /// Asks `question` about one sample sentence; logs the outcome, never fails.
    pub async fn quick_probe(&self, question: &str) {
        if !self.cfg.enabled && self.client.provider_name() == "disabled" {
            warn!("QA quick_probe skipped: QA is disabled in config");
            return;
        }
        let sample = "Gold price per tola rose by Rs 2,100 to Rs 532,400 in the local market.";
        match self.client.answer(question, sample).await {
            Ok(a) => info!(answer = %a.answer, score = ?a.score, "QA quick_probe ok"),
            Err(e) => warn!(error = ?e, "QA quick_probe failed"),
        }
    }
}
