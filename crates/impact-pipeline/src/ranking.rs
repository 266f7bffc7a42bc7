//! Top-N ranking and totals.

use impact_common::{Coordinates, CraterRecord, MeteoriteRecord};
use serde::Serialize;
use std::cmp::Ordering;

use crate::marker::format_mass;

/// Length of the "top" bar.
pub const TOP_N: usize = 10;

/// Sort descending by magnitude and keep the first `n`.
///
/// Records without a magnitude are skipped. The sort is stable, so ties keep
/// their input order. Returned indices refer to `records`.
pub fn top_n<'a, T, F>(records: &[&'a T], magnitude: F, n: usize) -> Vec<(usize, &'a T, f64)>
where
    F: Fn(&T) -> Option<f64>,
{
    let mut ranked: Vec<(usize, &'a T, f64)> = records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| magnitude(r).filter(|m| !m.is_nan()).map(|m| (i, *r, m)))
        .collect();
    ranked.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal));
    ranked.truncate(n);
    ranked
}

/// One item of the top bar; clicking it re-centres the globe on `position`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub index: usize,
    pub label: String,
    pub magnitude: f64,
    pub display: String,
    pub position: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Records passing the filters.
    pub total: usize,
    /// Of those, records with a resolvable position.
    pub plotted: usize,
    pub top: Vec<RankedEntry>,
}

pub fn meteorite_summary(filtered: &[&MeteoriteRecord]) -> Summary {
    let top = top_n(filtered, MeteoriteRecord::mass_grams, TOP_N)
        .into_iter()
        .map(|(index, m, mass)| RankedEntry {
            index,
            label: m.display_name().to_string(),
            magnitude: mass,
            display: format_mass(Some(mass)),
            position: m.coordinates(),
        })
        .collect();

    Summary {
        total: filtered.len(),
        plotted: filtered.iter().filter(|m| m.is_plottable()).count(),
        top,
    }
}

pub fn crater_summary(filtered: &[&CraterRecord]) -> Summary {
    let top = top_n(filtered, |c: &CraterRecord| c.diameter_km, TOP_N)
        .into_iter()
        .map(|(index, c, diameter)| RankedEntry {
            index,
            label: c.display_name().to_string(),
            magnitude: diameter,
            display: format!("{} km", diameter),
            position: c.position,
        })
        .collect();

    Summary {
        total: filtered.len(),
        plotted: filtered.iter().filter(|c| c.is_plottable()).count(),
        top,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meteorites(masses: &[Option<&str>]) -> Vec<MeteoriteRecord> {
        masses
            .iter()
            .enumerate()
            .map(|(i, mass)| {
                let mut v = json!({"name": format!("M{}", i), "reclat": "1", "reclong": "1"});
                if let Some(m) = mass {
                    v["mass"] = json!(m);
                }
                serde_json::from_value(v).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_top_n_descending_skips_missing() {
        let records = meteorites(&[Some("10"), None, Some("300"), Some("20")]);
        let refs: Vec<&MeteoriteRecord> = records.iter().collect();
        let top = top_n(&refs, MeteoriteRecord::mass_grams, 10);
        let indices: Vec<usize> = top.iter().map(|(i, _, _)| *i).collect();
        assert_eq!(indices, vec![2, 3, 0]);
    }

    #[test]
    fn test_top_n_truncates_and_keeps_tie_order() {
        let masses: Vec<Option<&str>> = std::iter::repeat(Some("5")).take(15).collect();
        let records = meteorites(&masses);
        let refs: Vec<&MeteoriteRecord> = records.iter().collect();
        let top = top_n(&refs, MeteoriteRecord::mass_grams, TOP_N);
        assert_eq!(top.len(), 10);
        let indices: Vec<usize> = top.iter().map(|(i, _, _)| *i).collect();
        assert_eq!(indices, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_meteorite_summary() {
        let mut records = meteorites(&[Some("1500"), Some("2500000")]);
        records.push(serde_json::from_value(json!({"name": "Lost", "mass": "7"})).unwrap());
        let refs: Vec<&MeteoriteRecord> = records.iter().collect();

        let summary = meteorite_summary(&refs);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.plotted, 2);
        assert_eq!(summary.top[0].label, "M1");
        assert_eq!(summary.top[0].display, "2.50 tonnes");
        assert_eq!(summary.top[2].label, "Lost");
        assert!(summary.top[2].position.is_none());
    }
}
