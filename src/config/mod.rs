// src/config/mod.rs
pub mod qa;
pub mod rates;

pub use qa::QaConfig;
pub use rates::{RatesConfig, SourceSpec};
