//! Dropdown option lists and data-driven slider bounds.

use impact_common::{CraterRecord, MeteoriteRecord};
use serde::Serialize;
use std::collections::BTreeSet;

/// Inclusive extent of a numeric field over a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// Extent of the finite values, or `None` when there are none.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some(Bounds { min: v, max: v }),
                Some(b) => Some(Bounds {
                    min: b.min.min(v),
                    max: b.max.max(v),
                }),
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SliderBounds {
    pub year: Option<Bounds>,
    pub mass: Option<Bounds>,
    pub diameter: Option<Bounds>,
    pub age: Option<Bounds>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub classes: Vec<String>,
    pub target_rocks: Vec<String>,
    pub crater_types: Vec<String>,
    pub sliders: SliderBounds,
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl FilterOptions {
    pub fn collect(meteorites: &[MeteoriteRecord], craters: &[CraterRecord]) -> Self {
        Self {
            classes: distinct(meteorites.iter().map(MeteoriteRecord::class_name)),
            target_rocks: distinct(craters.iter().map(CraterRecord::target_rock_or_unknown)),
            crater_types: distinct(craters.iter().map(CraterRecord::crater_type_or_unknown)),
            sliders: SliderBounds {
                year: Bounds::of(meteorites.iter().filter_map(|m| m.year().map(f64::from))),
                mass: Bounds::of(meteorites.iter().filter_map(MeteoriteRecord::mass_grams)),
                diameter: Bounds::of(craters.iter().filter_map(|c| c.diameter_km)),
                age: Bounds::of(
                    craters
                        .iter()
                        .filter(|c| c.age.is_parsed())
                        .flat_map(|c| [c.age_min, c.age_max]),
                ),
            },
        }
    }
}
