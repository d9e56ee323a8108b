// src/price.rs
//! Price primitives: digit-only normalization, display formatting and the
//! plausibility band every extracted value must fall into.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PRICE_MIN: u64 = 400_000;
pub const DEFAULT_PRICE_MAX: u64 = 900_000;

/// Strip every non-digit character and parse the rest.
/// Returns 0 (never a valid price) for absent input, no digits, or overflow.
pub fn clean_price(text: Option<&str>) -> u64 {
    let Some(text) = text else {
        return 0;
    };
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<u64>().unwrap_or(0)
}

/// `532400` -> `"532,400"`.
pub fn format_price(price: u64) -> String {
    let raw = price.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Open interval `(min, max)` of plausible prices for one currency/unit regime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_PRICE_MIN,
            max: DEFAULT_PRICE_MAX,
        }
    }
}

impl PriceRange {
    pub fn new(min: u64, max: u64) -> Self {
        let mut r = Self { min, max };
        r.sanitize();
        r
    }

    /// Bounds are exclusive.
    pub fn contains(&self, value: u64) -> bool {
        self.min < value && value < self.max
    }

    /// `Some(value)` only if inside the band.
    pub fn accept(&self, value: u64) -> Option<u64> {
        self.contains(value).then_some(value)
    }

    pub(crate) fn sanitize(&mut self) {
        if self.min > self.max {
            // swap to keep a valid interval
            std::mem::swap(&mut self.min, &mut self.max);
        }
    }
}
