//! Filter engine: pure functions from records and filter state to the
//! filtered subset.
//!
//! Filters return references in input order; the position of a record in
//! the returned vector is its index for markers, rankings and table rows.

use impact_common::{CraterRecord, FallStatus, MeteoriteRecord};
use serde::{Deserialize, Serialize};

use crate::range::{MissingValues, NumericRange, Selection};

/// Meteorite filter state. Absent ranges are unbounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteoriteFilter {
    pub year: Option<NumericRange>,
    /// Grams.
    pub mass: Option<NumericRange>,
    pub classes: Selection<String>,
    pub falls: Selection<FallStatus>,
    pub name_query: Option<String>,
}

/// Crater filter state. Absent ranges are unbounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraterFilter {
    /// Kilometres.
    pub diameter: Option<NumericRange>,
    /// Millions of years; matched by interval overlap.
    pub age: Option<NumericRange>,
    pub target_rocks: Selection<String>,
    pub crater_types: Selection<String>,
    pub name_query: Option<String>,
}

impl MeteoriteFilter {
    pub fn matches(&self, record: &MeteoriteRecord, missing: MissingValues) -> bool {
        let in_range = |range: &Option<NumericRange>, value: Option<f64>| {
            range.map_or(true, |r| r.admits(value, missing))
        };

        in_range(&self.year, record.year().map(f64::from))
            && in_range(&self.mass, record.mass_grams())
            && self.classes.admits(record.class_name())
            && self.falls_admit(record.fall_status())
            && name_matches(self.name_query.as_deref(), record.display_name())
    }

    fn falls_admit(&self, fall: Option<FallStatus>) -> bool {
        match fall {
            Some(status) => self.falls.admits(&status),
            None => self.falls.is_empty(),
        }
    }
}

impl CraterFilter {
    /// `missing` applies to diameters only: every crater has a resolved age
    /// band, open ends included.
    pub fn matches(&self, crater: &CraterRecord, missing: MissingValues) -> bool {
        let diameter_ok = self
            .diameter
            .map_or(true, |r| r.admits(crater.diameter_km, missing));
        let age_ok = self
            .age
            .map_or(true, |r| r.overlaps(crater.age_min, crater.age_max));

        diameter_ok
            && age_ok
            && self.target_rocks.admits(crater.target_rock_or_unknown())
            && self.crater_types.admits(crater.crater_type_or_unknown())
            && name_matches(self.name_query.as_deref(), crater.display_name())
    }
}

fn name_matches(query: Option<&str>, name: &str) -> bool {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => name.to_lowercase().contains(&q.to_lowercase()),
        None => true,
    }
}

pub fn filter_meteorites<'a>(
    records: &'a [MeteoriteRecord],
    filter: &MeteoriteFilter,
    missing: MissingValues,
) -> Vec<&'a MeteoriteRecord> {
    records
        .iter()
        .filter(|m| filter.matches(m, missing))
        .collect()
}

/// Missing diameters follow `missing`; ages are compared by overlap with
/// the crater's resolved `[age_min, age_max]` band.
pub fn filter_craters<'a>(
    craters: &'a [CraterRecord],
    filter: &CraterFilter,
    missing: MissingValues,
) -> Vec<&'a CraterRecord> {
    craters.iter().filter(|c| filter.matches(c, missing)).collect()
}

/// Records whose position resolves. Unplottable records are still listed
/// in tables.
pub fn plottable<'a, 'r>(records: &'r [&'a MeteoriteRecord]) -> impl Iterator<Item = &'a MeteoriteRecord> + 'r {
    records.iter().copied().filter(|m| m.is_plottable())
}
