//! End-to-end pipeline tests: decode, filter, map, rank.

use impact_common::{CraterCollection, MeteoriteRecord, DEFAULT_AGE_CEILING_MYR};
use impact_pipeline::{
    class_frequencies, filter_craters, filter_meteorites, normalize, CraterFilter, CraterQuery,
    MeteoriteFilter, MeteoriteQuery, MissingValues, NumericRange, SchemeSet, SizeRule,
    ViewSettings, ViewStore,
};
use test_utils::{
    assert_approx_eq, crater_collection_json, crater_feature, craters, meteorite_set,
    meteorites_with_masses,
};

fn decode(rows: Vec<serde_json::Value>) -> Vec<MeteoriteRecord> {
    rows.into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
}

fn legacy_craters() -> CraterCollection {
    CraterCollection::from_geojson_str(craters::LEGACY_COLLECTION, DEFAULT_AGE_CEILING_MYR).unwrap()
}

// ============================================================================
// Bucketing and sizing
// ============================================================================

#[test]
fn test_three_masses_classic_colors_and_sizes() {
    let records = decode(meteorites_with_masses(&[500.0, 15_000.0, 600_000.0]));
    let mut store = ViewStore::new(CraterCollection::empty(), ViewSettings::default());
    store.commit_meteorites(records, 1);

    let view = store.meteorite_view(&MeteoriteQuery::default()).unwrap();
    let colors: Vec<(u8, u8, u8)> = view
        .markers
        .iter()
        .map(|m| (m.color.r, m.color.g, m.color.b))
        .collect();
    assert_eq!(colors, vec![(0, 255, 255), (0, 128, 0), (255, 0, 0)]);

    let sizes: Vec<f64> = view.markers.iter().map(|m| m.size_px).collect();
    assert_eq!(sizes, vec![5.0, 15.0, 25.0]);
    assert!(sizes.iter().all(|s| (5.0..=25.0).contains(s)));
}

#[test]
fn test_every_builtin_scale_is_exhaustive_and_monotonic() {
    let schemes = SchemeSet::builtin();
    let magnitudes: Vec<f64> = (0..=2000).map(|i| (i as f64).powf(2.0)).collect();

    for scheme in schemes.iter() {
        for scale in [&scheme.meteorite, &scheme.crater] {
            let mut last = usize::MAX;
            for m in &magnitudes {
                let idx = scale
                    .bucket_index(*m)
                    .unwrap_or_else(|| panic!("{}: {} fell through", scheme.name, m));
                // Buckets are ordered high to low, so the index never grows.
                assert!(idx <= last, "{}: not monotonic at {}", scheme.name, m);
                last = idx;
            }
        }
    }
}

#[test]
fn test_size_rules_stay_in_bounds() {
    let rule = SizeRule::meteorite_default();
    for record in decode(meteorite_set(200)) {
        let size = rule.size(record.mass_grams());
        assert!((5.0..=25.0).contains(&size));
    }
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_range_normalization() {
    assert_eq!(normalize(5.0, 1.0), (1.0, 5.0));
    let r = NumericRange::new(5000.0, 1000.0);
    assert_eq!((r.min(), r.max()), (1000.0, 5000.0));
}

#[test]
fn test_missing_mass_passes_by_default() {
    let records = decode(vec![
        serde_json::json!({"name": "No Mass", "reclat": "1", "reclong": "1"}),
        serde_json::json!({"name": "Heavy", "mass": "90000", "reclat": "1", "reclong": "1"}),
    ]);
    let filter = MeteoriteFilter {
        mass: Some(NumericRange::new(1000.0, 5000.0)),
        ..Default::default()
    };

    let included = filter_meteorites(&records, &filter, MissingValues::Include);
    assert_eq!(included.len(), 1);
    assert_eq!(included[0].display_name(), "No Mass");

    assert!(filter_meteorites(&records, &filter, MissingValues::Exclude).is_empty());
}

#[test]
fn test_exclude_policy_drops_unknown_masses() {
    let records = decode(meteorite_set(50));
    let filter = MeteoriteFilter {
        mass: Some(NumericRange::new(0.0, 1e9)),
        ..Default::default()
    };
    let kept = filter_meteorites(&records, &filter, MissingValues::Exclude);
    // Every fifth generated record has no mass.
    assert_eq!(kept.len(), 40);
    assert!(kept.iter().all(|m| m.mass_grams().is_some()));
}

#[test]
fn test_age_overlap_regression() {
    let json = crater_collection_json(vec![crater_feature("Wide", 20.0, "10-50", 0.0, 0.0)]);
    let collection = CraterCollection::from_geojson_str(&json, DEFAULT_AGE_CEILING_MYR).unwrap();

    let window = |a: f64, b: f64| CraterFilter {
        age: Some(NumericRange::new(a, b)),
        ..Default::default()
    };
    assert_eq!(filter_craters(&collection.features, &window(40.0, 60.0), MissingValues::Include).len(), 1);
    assert_eq!(filter_craters(&collection.features, &window(60.0, 40.0), MissingValues::Include).len(), 1);
    assert_eq!(filter_craters(&collection.features, &window(51.0, 60.0), MissingValues::Include).len(), 0);
}

// ============================================================================
// Crater views
// ============================================================================

#[test]
fn test_crater_view_over_legacy_file() {
    let store = ViewStore::new(legacy_craters(), ViewSettings::default());
    let query = CraterQuery {
        filter: CraterFilter {
            diameter: Some(NumericRange::new(100.0, 400.0)),
            ..Default::default()
        },
        ..Default::default()
    };

    let view = store.crater_view(&query).unwrap();
    // Missing diameter passes; the unlocated crater stays in the table only.
    assert_eq!(view.summary.total, 3);
    assert_eq!(view.summary.plotted, 2);
    assert_eq!(view.markers.len(), 2);
    assert_eq!(view.table.len(), 3);

    let top: Vec<&str> = view.summary.top.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(top, vec!["Vredefort", "Chicxulub"]);
    assert_eq!(view.summary.top[0].display, "300 km");
}

#[test]
fn test_crater_view_exclude_policy_drops_missing_diameter() {
    let settings = ViewSettings {
        missing_values: MissingValues::Exclude,
        ..ViewSettings::default()
    };
    let store = ViewStore::new(legacy_craters(), settings);
    let query = CraterQuery {
        filter: CraterFilter {
            diameter: Some(NumericRange::new(100.0, 400.0)),
            ..Default::default()
        },
        ..Default::default()
    };
    assert_eq!(store.crater_view(&query).unwrap().summary.total, 2);

    // A per-request override wins over the configured policy.
    let include = CraterQuery {
        missing: Some(MissingValues::Include),
        ..query
    };
    assert_eq!(store.crater_view(&include).unwrap().summary.total, 3);
}

#[test]
fn test_crater_age_window_keeps_unparsed() {
    let store = ViewStore::new(legacy_craters(), ViewSettings::default());
    let query = CraterQuery {
        filter: CraterFilter {
            age: Some(NumericRange::new(60.0, 70.0)),
            ..Default::default()
        },
        ..Default::default()
    };
    let view = store.crater_view(&query).unwrap();
    let names: Vec<&str> = view
        .table
        .rows
        .iter()
        .map(|r| r.cells[0].text.as_str())
        .collect();
    // "garbage text" resolves to the open default band.
    assert_eq!(names, vec!["Chicxulub", "Unlocated"]);
}

#[test]
fn test_crater_marker_sizes_follow_steps() {
    let store = ViewStore::new(legacy_craters(), ViewSettings::default());
    let view = store.crater_view(&CraterQuery::default()).unwrap();
    let sizes: Vec<f64> = view.markers.iter().map(|m| m.size_px).collect();
    assert_eq!(sizes, vec![7.0, 20.0, 25.0]);
    assert_approx_eq!(view.markers[0].color.a as f64, 0.8, 1e-6);
}

// ============================================================================
// Class groups
// ============================================================================

#[test]
fn test_class_frequencies_over_generated_set() {
    let records = decode(meteorite_set(60));
    let freq = class_frequencies(&records);

    let total: usize = freq.iter().map(|c| c.count).sum();
    assert_eq!(total, 60);
    let pct: f64 = freq.iter().map(|c| c.percentage).sum();
    assert_approx_eq!(pct, 100.0, 0.05);
    assert!(freq.windows(2).all(|w| w[0].count >= w[1].count));
}
