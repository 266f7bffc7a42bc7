//! Range and set predicates used by the filters.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Order a slider pair so that `min <= max`.
pub fn normalize(a: f64, b: f64) -> (f64, f64) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// How records without a value for a filtered field are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingValues {
    /// Unknown values pass every range filter.
    #[default]
    Include,
    Exclude,
}

/// A closed numeric interval. Construction always normalises the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericRange {
    min: f64,
    max: f64,
}

impl NumericRange {
    pub fn new(a: f64, b: f64) -> Self {
        let (min, max) = normalize(a, b);
        Self { min, max }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Range test with the missing-value policy applied to `None` and NaN.
    pub fn admits(&self, value: Option<f64>, missing: MissingValues) -> bool {
        match value.filter(|v| !v.is_nan()) {
            Some(v) => self.contains(v),
            None => missing == MissingValues::Include,
        }
    }

    /// Interval overlap: `[lo, hi]` touches this range anywhere.
    pub fn overlaps(&self, lo: f64, hi: f64) -> bool {
        hi >= self.min && lo <= self.max
    }
}

#[derive(Deserialize)]
struct RawRange {
    min: f64,
    max: f64,
}

impl<'de> Deserialize<'de> for NumericRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawRange::deserialize(deserializer)?;
        Ok(NumericRange::new(raw.min, raw.max))
    }
}

/// A categorical filter. An empty selection admits everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection<T: Ord> {
    values: BTreeSet<T>,
}

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Self {
            values: BTreeSet::new(),
        }
    }
}

impl<T: Ord> Selection<T> {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn admits<Q>(&self, value: &Q) -> bool
    where
        T: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.values.is_empty() || self.values.contains(value)
    }
}

impl<T: Ord> FromIterator<T> for Selection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
