//! Threshold colour scales and the named colour schemes.
//!
//! A scale is an ordered list of buckets with strictly descending
//! thresholds; a magnitude takes the colour of the first bucket whose
//! threshold it reaches. The lowest bucket has threshold `0`, so every
//! non-negative magnitude lands in exactly one bucket and only absent
//! values fall through to the `unknown` colour.

use impact_common::ImpactError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Opacity of meteorite markers.
pub const METEORITE_ALPHA: f32 = 0.6;
/// Opacity of crater markers.
pub const CRATER_ALPHA: f32 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBucket {
    pub threshold: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdScale {
    pub buckets: Vec<ThresholdBucket>,
    #[serde(default = "default_unknown")]
    pub unknown: Color,
}

fn default_unknown() -> Color {
    Color::gray().with_alpha(METEORITE_ALPHA)
}

/// One legend row, in ascending magnitude order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

impl ThresholdScale {
    /// Colour for a magnitude. Absent and NaN values get `unknown`; values
    /// below the floor (negative) get the lowest bucket.
    pub fn classify(&self, value: Option<f64>) -> Color {
        let Some(v) = value.filter(|v| !v.is_nan()) else {
            return self.unknown;
        };
        self.buckets
            .iter()
            .find(|b| v >= b.threshold)
            .or_else(|| self.buckets.last())
            .map(|b| b.color)
            .unwrap_or(self.unknown)
    }

    /// Index of the bucket a value falls into.
    pub fn bucket_index(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        self.buckets
            .iter()
            .position(|b| value >= b.threshold)
            .or_else(|| self.buckets.len().checked_sub(1))
    }

    pub fn validate(&self) -> Result<(), String> {
        let Some(last) = self.buckets.last() else {
            return Err("scale must have at least 1 bucket".to_string());
        };
        if self.buckets.iter().any(|b| !b.threshold.is_finite()) {
            return Err("thresholds must be finite".to_string());
        }
        if self
            .buckets
            .windows(2)
            .any(|pair| pair[0].threshold <= pair[1].threshold)
        {
            return Err("thresholds must be strictly descending".to_string());
        }
        if last.threshold != 0.0 {
            return Err(format!(
                "lowest threshold must be 0 so every magnitude is covered, found {}",
                last.threshold
            ));
        }
        Ok(())
    }

    /// Legend rows: the floor bucket as `< next`, the rest as `≥ threshold`.
    pub fn legend(&self, describe: impl Fn(f64) -> String) -> Vec<LegendEntry> {
        let ascending: Vec<&ThresholdBucket> = self.buckets.iter().rev().collect();
        ascending
            .iter()
            .enumerate()
            .map(|(i, bucket)| {
                let label = if i == 0 {
                    match ascending.get(1) {
                        Some(next) => format!("< {}", describe(next.threshold)),
                        None => "All".to_string(),
                    }
                } else {
                    format!("≥ {}", describe(bucket.threshold))
                };
                LegendEntry {
                    label,
                    color: bucket.color,
                }
            })
            .collect()
    }
}

/// A named pair of scales: meteorites by mass (g), craters by diameter (km).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub meteorite: ThresholdScale,
    pub crater: ThresholdScale,
}

impl ColorScheme {
    pub fn validate(&self) -> Result<(), SchemeError> {
        if self.name.trim().is_empty() {
            return Err(SchemeError::Unnamed);
        }
        self.meteorite
            .validate()
            .map_err(|message| SchemeError::InvalidScale {
                scheme: self.name.clone(),
                scale: "meteorite",
                message,
            })?;
        self.crater
            .validate()
            .map_err(|message| SchemeError::InvalidScale {
                scheme: self.name.clone(),
                scale: "crater",
                message,
            })
    }
}

/// Colour scheme errors.
#[derive(Debug, thiserror::Error)]
pub enum SchemeError {
    #[error("Colour scheme has no name")]
    Unnamed,

    #[error("Colour scheme '{scheme}' has an invalid {scale} scale: {message}")]
    InvalidScale {
        scheme: String,
        scale: &'static str,
        message: String,
    },
}

/// The schemes offered to the page, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemeSet {
    schemes: Vec<ColorScheme>,
}

impl Default for SchemeSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SchemeSet {
    pub fn builtin() -> Self {
        Self {
            schemes: BUILTIN_SCHEMES.clone(),
        }
    }

    /// Add schemes, replacing built-ins with the same name. Every scheme is
    /// validated before any is applied.
    pub fn extend(&mut self, extra: Vec<ColorScheme>) -> Result<(), SchemeError> {
        for scheme in &extra {
            scheme.validate()?;
        }
        for scheme in extra {
            match self.schemes.iter_mut().find(|s| s.name == scheme.name) {
                Some(existing) => *existing = scheme,
                None => self.schemes.push(scheme),
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&ColorScheme, ImpactError> {
        self.schemes
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ImpactError::SchemeNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemes.iter().any(|s| s.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.schemes.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColorScheme> {
        self.schemes.iter()
    }
}

const MASS_THRESHOLDS: [f64; 5] = [500_000.0, 100_000.0, 50_000.0, 10_000.0, 0.0];
const DIAMETER_THRESHOLDS: [f64; 5] = [200.0, 100.0, 50.0, 10.0, 0.0];

fn scale(thresholds: [f64; 5], colors: [&str; 5], alpha: f32) -> ThresholdScale {
    ThresholdScale {
        buckets: thresholds
            .iter()
            .zip(colors)
            .map(|(threshold, color)| ThresholdBucket {
                threshold: *threshold,
                color: Color::parse(color).expect("built-in colour").with_alpha(alpha),
            })
            .collect(),
        unknown: Color::gray().with_alpha(alpha),
    }
}

fn scheme(name: &str, description: &str, meteorite: [&str; 5], crater: [&str; 5]) -> ColorScheme {
    ColorScheme {
        name: name.to_string(),
        description: description.to_string(),
        meteorite: scale(MASS_THRESHOLDS, meteorite, METEORITE_ALPHA),
        crater: scale(DIAMETER_THRESHOLDS, crater, CRATER_ALPHA),
    }
}

static BUILTIN_SCHEMES: Lazy<Vec<ColorScheme>> = Lazy::new(|| {
    vec![
        scheme(
            "Classic",
            "Red to Cyan by magnitude",
            ["red", "orange", "yellow", "green", "cyan"],
            ["red", "orange", "yellow", "green", "cyan"],
        ),
        scheme(
            "Default",
            "Red to Yellow Scale",
            ["red", "orange", "yellow", "lightyellow", "white"],
            ["red", "orange", "yellow", "lightyellow", "mintcream"],
        ),
        scheme(
            "Blue Scale",
            "Dark Blue to Light Blue",
            ["darkblue", "blue", "skyblue", "cyan", "lightcyan"],
            ["darkblue", "blue", "skyblue", "lightblue", "mintcream"],
        ),
        scheme(
            "Green Scale",
            "Dark Green to Light Green",
            ["darkgreen", "green", "lime", "lightgreen", "yellowgreen"],
            ["darkgreen", "green", "lime", "lightgreen", "mintcream"],
        ),
        scheme(
            "Purple Scale",
            "Dark Purple to Light Purple",
            ["darkviolet", "blueviolet", "violet", "plum", "lavender"],
            ["darkviolet", "blueviolet", "violet", "plum", "mintcream"],
        ),
        scheme(
            "Brown Scale",
            "Dark Brown to Light Brown",
            ["sienna", "saddlebrown", "peru", "burlywood", "wheat"],
            ["sienna", "saddlebrown", "peru", "burlywood", "mintcream"],
        ),
        scheme(
            "Colorblind-Friendly (Deutan)",
            "Accessible palette for deuteranomaly",
            ["#CC79A7", "#0072B2", "#009E73", "#D55E00", "#F0E442"],
            ["#CC79A7", "#0072B2", "#009E73", "#D55E00", "mintcream"],
        ),
        scheme(
            "Colorblind-Friendly (Protan)",
            "Accessible palette for protanomaly",
            ["#117733", "#332288", "#44AA99", "#88CCEE", "#DDCC77"],
            ["#117733", "#332288", "#44AA99", "#88CCEE", "mintcream"],
        ),
    ]
});
