// tests/common/mod.rs
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use gold_rate_finder::qa_adapter::{QaAnswer, QaModel};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Answers by substring lookup on the context: the first rule whose key is
/// contained in the context wins. `Err` rules simulate inference failures.
/// Unmatched contexts get an empty answer.
pub struct ScriptedQa {
    rules: Vec<(&'static str, Result<&'static str, &'static str>)>,
    pub calls: AtomicUsize,
    pub contexts: Mutex<Vec<String>>,
}

impl ScriptedQa {
    pub fn new(rules: Vec<(&'static str, Result<&'static str, &'static str>)>) -> Self {
        Self {
            rules,
            calls: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl QaModel for ScriptedQa {
    fn answer<'a>(
        &'a self,
        _question: &'a str,
        context: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<QaAnswer>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.contexts.lock().unwrap().push(context.to_string());
            for (key, out) in &self.rules {
                if context.contains(key) {
                    return match out {
                        Ok(a) => Ok(QaAnswer::new(*a)),
                        Err(e) => Err(anyhow!("{e}")),
                    };
                }
            }
            Ok(QaAnswer::new(""))
        })
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}
