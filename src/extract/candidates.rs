// src/extract/candidates.rs
//! Cheap pre-filter in front of QA inference.
//!
//! Text is cut into sentence-like units at `.`, `!` or `?` followed by
//! whitespace. Abbreviations and decimals make this imprecise; the range
//! check after extraction is the authoritative gate, this one only saves
//! inference calls.

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::config::rates::CandidateConfig;
use crate::price::{clean_price, PriceRange};

fn boundary_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"[.!?]\s+").expect("sentence boundary regex"))
}

/// Split into sentence-like units. Terminal punctuation stays with its unit,
/// the whitespace after it is dropped. Empty units are skipped.
pub fn split_units(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut last = 0usize;
    let mut bounds = boundary_re().find_iter(text);
    let mut done = false;
    std::iter::from_fn(move || loop {
        if done {
            return None;
        }
        let unit = match bounds.next() {
            Some(m) => {
                // punctuation is a single ASCII byte
                let unit = &text[last..m.start() + 1];
                last = m.end();
                unit
            }
            None => {
                done = true;
                &text[last..]
            }
        };
        let unit = unit.trim();
        if !unit.is_empty() {
            return Some(unit);
        }
    })
}

/// Keeps units holding at least one digit run that normalizes into the range.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    run_re: Regex,
    range: PriceRange,
}

impl CandidateFilter {
    pub fn new(cfg: &CandidateConfig, range: PriceRange) -> Result<Self> {
        let pattern = format!(r"[\d,]{{{},{}}}", cfg.min_digits, cfg.max_digits);
        let run_re = Regex::new(&pattern).context("compiling digit-run pre-check")?;
        Ok(Self { run_re, range })
    }

    /// True if any pre-check run in `unit` lands strictly inside the range.
    pub fn is_candidate(&self, unit: &str) -> bool {
        self.run_re
            .find_iter(unit)
            .any(|m| self.range.contains(clean_price(Some(m.as_str()))))
    }

    /// Lazily yields the units of `text` worth sending to QA.
    pub fn candidates<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        split_units(text).filter(move |u| self.is_candidate(u))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> CandidateFilter {
        CandidateFilter::new(&CandidateConfig::default(), PriceRange::default()).unwrap()
    }

    #[test]
    fn splits_on_terminal_punctuation_followed_by_space() {
        let units: Vec<_> = split_units("Gold rose. Silver fell!  Why?\nNobody knows").collect();
        assert_eq!(units, vec!["Gold rose.", "Silver fell!", "Why?", "Nobody knows"]);
    }

    #[test]
    fn decimals_without_space_do_not_split() {
        let units: Vec<_> = split_units("Rate is 2.5 percent. Done").collect();
        assert_eq!(units, vec!["Rate is 2.5 percent.", "Done"]);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert_eq!(split_units("").count(), 0);
        assert_eq!(split_units("   ").count(), 0);
    }

    #[test]
    fn keeps_unit_with_in_range_run() {
        let f = filter();
        assert!(f.is_candidate("Gold is now 532400 per tola"));
        assert!(f.is_candidate("Gold is now Rs532,400 per tola"));
    }

    #[test]
    fn drops_short_and_out_of_range_runs() {
        let f = filter();
        assert!(!f.is_candidate("Gold up 12 points"));
        assert!(!f.is_candidate("Reserves at 999999999"));
        assert!(!f.is_candidate("Reserves at 1,234,567,890"));
    }

    #[test]
    fn candidates_are_filtered_in_order() {
        let f = filter();
        let text = "Markets opened. Gold traded at 532,400 today. Silver at 5,100. Tola rate 610000!";
        let got: Vec<_> = f.candidates(text).collect();
        assert_eq!(got, vec!["Gold traded at 532,400 today.", "Tola rate 610000!"]);
    }
}
