//! Parsing of free-text crater age strings.
//!
//! Crater catalogues record ages (in millions of years) as free text such as
//! `"35 ± 0.5"`, `"50-100"`, `"<1"` or `">2500"`. The parser keeps the form it
//! recognised so that callers can decide how to fill open ends.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Upper age bound (Myr) substituted when an age string leaves its maximum
/// open or cannot be parsed.
pub const DEFAULT_AGE_CEILING_MYR: f64 = 2500.0;

const NUMBER: &str = r"(\d+(?:\.\d+)?)";

static UNCERTAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{NUMBER}\s*(?:±|\+/-|\+-)\s*{NUMBER}")).expect("valid regex")
});
static RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"{NUMBER}\s*[-–]\s*{NUMBER}")).expect("valid regex"));
static UPPER_BOUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"<\s*{NUMBER}")).expect("valid regex"));
static LOWER_BOUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r">\s*{NUMBER}")).expect("valid regex"));
static BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"~?\s*{NUMBER}")).expect("valid regex"));

/// The recognised shape of an age string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgeEstimate {
    /// A single value, e.g. `"65"` or `"~300"`.
    Exact { value: f64 },
    /// `N±U`
    Uncertain { value: f64, uncertainty: f64 },
    /// `A-B`
    Range { min: f64, max: f64 },
    /// `<B`
    UpperBound { max: f64 },
    /// `>A`
    LowerBound { min: f64 },
    Unparsed,
}

impl AgeEstimate {
    /// The bounds stated by the string itself; open ends are `None`.
    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        match *self {
            AgeEstimate::Exact { value } => (Some(value), Some(value)),
            AgeEstimate::Uncertain { value, uncertainty } => {
                (Some((value - uncertainty).max(0.0)), Some(value + uncertainty))
            }
            AgeEstimate::Range { min, max } => (Some(min), Some(max)),
            AgeEstimate::UpperBound { max } => (None, Some(max)),
            AgeEstimate::LowerBound { min } => (Some(min), None),
            AgeEstimate::Unparsed => (None, None),
        }
    }

    /// Bounds with open ends filled as `(0, ceiling)`.
    pub fn resolve(&self, ceiling: f64) -> (f64, f64) {
        let (min, max) = self.bounds();
        let min = min.unwrap_or(0.0);
        let max = max.unwrap_or_else(|| ceiling.max(min));
        (min, max)
    }

    pub fn is_parsed(&self) -> bool {
        !matches!(self, AgeEstimate::Unparsed)
    }
}

/// Parse an age string. Patterns are tried in order (`N±U`, `A-B`, `<B`,
/// `>A`, bare number) and the first match wins.
pub fn parse_age_string(raw: &str) -> AgeEstimate {
    let text = raw.trim();
    if text.is_empty() {
        return AgeEstimate::Unparsed;
    }

    if let Some(caps) = UNCERTAIN.captures(text) {
        if let (Some(value), Some(uncertainty)) = (capture(&caps, 1), capture(&caps, 2)) {
            return AgeEstimate::Uncertain { value, uncertainty };
        }
    }
    if let Some(caps) = RANGE.captures(text) {
        if let (Some(a), Some(b)) = (capture(&caps, 1), capture(&caps, 2)) {
            return AgeEstimate::Range {
                min: a.min(b),
                max: a.max(b),
            };
        }
    }
    if let Some(max) = UPPER_BOUND.captures(text).and_then(|c| capture(&c, 1)) {
        return AgeEstimate::UpperBound { max };
    }
    if let Some(min) = LOWER_BOUND.captures(text).and_then(|c| capture(&c, 1)) {
        return AgeEstimate::LowerBound { min };
    }
    if let Some(value) = BARE.captures(text).and_then(|c| capture(&c, 1)) {
        return AgeEstimate::Exact { value };
    }

    AgeEstimate::Unparsed
}

fn capture(caps: &regex::Captures<'_>, idx: usize) -> Option<f64> {
    caps.get(idx)?.as_str().parse().ok()
}
