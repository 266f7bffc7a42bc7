//! Coarse grouping of meteorite classes and their frequencies.

use impact_common::MeteoriteRecord;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Group used for classes missing from [`FUSION_GROUPS`].
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Group name and the `recclass` values it absorbs.
pub const FUSION_GROUPS: &[(&str, &[&str])] = &[
    (
        "L-type",
        &[
            "L", "L4", "L5", "L6", "L5/6", "L4-6", "L6/7", "L~5", "L~6", "L3.0", "L3.2", "L3.4",
            "L3.6", "L3.7", "L3.8", "L3.9", "L3.7-6", "L3-4", "L3-5", "L3-6", "L3-7", "L3.9-6",
            "L3.7-4", "L3.0-3.9", "L3.3-3.7", "L3.3-3.5", "L4/5",
        ],
    ),
    (
        "H-type",
        &[
            "H", "H4", "H5", "H6", "H5/6", "H4-6", "H3", "H3.4", "H3.5", "H3.6", "H3.7", "H3.8",
            "H3.9", "H3-4", "H3-5", "H3-6", "H3.7-6", "H3.8-5", "H3.9-5", "H3.9/4", "H4/5",
            "H4-5", "H~4", "H~5", "H~6",
        ],
    ),
    (
        "LL-type",
        &[
            "LL", "LL4", "LL5", "LL6", "LL7", "LL3", "LL3.2", "LL3.4", "LL3.6", "LL3.8", "LL3.9",
            "LL4-5", "LL4-6", "LL5-6", "LL5/6", "LL3-4", "LL3-5", "LL3-6", "LL3.8-6", "LL3.1-3.5",
        ],
    ),
    (
        "Carbonaceous",
        &[
            "CI1", "CM1", "CM2", "CR2", "CO3", "CO3.2", "CO3.3", "CO3.4", "CO3.5", "CO3.6", "CV3",
            "CK4", "CK5", "CK6", "CK3", "CM-an", "CV3-an",
        ],
    ),
    (
        "Enstatite",
        &[
            "EH", "EH3", "EH4", "EH5", "EH6", "EH7-an", "EL3", "EL4", "EL5", "EL6", "EL7",
            "EH3/4-an",
        ],
    ),
    (
        "Achondrite",
        &[
            "Howardite", "Eucrite", "Diogenite", "Angrite", "Aubrite", "Acapulcoite", "Ureilite",
            "Winonaite", "Brachinite", "Lodranite",
        ],
    ),
    (
        "Iron",
        &[
            "Iron", "Iron?", "Iron, IAB", "Iron, IAB-MG", "Iron, IAB-ung", "Iron, IIAB",
            "Iron, IIE", "Iron, IIIAB", "Iron, IVA", "Iron, IVB", "Iron, IID", "Iron, IIC",
            "Iron, IC", "Iron, IC-an",
        ],
    ),
    (
        "Mesosiderite",
        &[
            "Mesosiderite", "Mesosiderite-A1", "Mesosiderite-A3", "Mesosiderite-B",
            "Mesosiderite-C", "Mesosiderite-an",
        ],
    ),
    (
        "Martian",
        &[
            "Martian (shergottite)", "Martian (chassignite)", "Martian (nakhlite)",
            "Martian (basaltic breccia)", "Martian",
        ],
    ),
    (
        "Lunar",
        &[
            "Lunar", "Lunar (anorth)", "Lunar (gabbro)", "Lunar (norite)", "Lunar (basalt)",
            "Lunar (bas. breccia)", "Lunar (feldsp. breccia)",
        ],
    ),
    (
        "Pallasite",
        &["Pallasite", "Pallasite, PMG", "Pallasite, PMG-an", "Pallasite, ungrouped"],
    ),
    (UNKNOWN_GROUP, &["Unknown", "Stone-uncl", "Chondrite-ung"]),
];

/// Flattened `recclass -> group` lookup.
pub static FUSION_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    FUSION_GROUPS
        .iter()
        .flat_map(|(group, classes)| classes.iter().map(move |c| (*c, *group)))
        .collect()
});

/// Exact-match lookup; anything unlisted is [`UNKNOWN_GROUP`].
pub fn class_group(recclass: Option<&str>) -> &'static str {
    recclass
        .and_then(|c| FUSION_MAP.get(c).copied())
        .unwrap_or(UNKNOWN_GROUP)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassCount {
    pub group: String,
    pub count: usize,
    /// Share of all records, rounded to two decimals.
    pub percentage: f64,
}

/// Group counts sorted by count descending, ties by group name.
pub fn class_frequencies<'a>(records: impl IntoIterator<Item = &'a MeteoriteRecord>) -> Vec<ClassCount> {
    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    let mut total = 0usize;
    for record in records {
        *counts.entry(class_group(record.recclass.as_deref())).or_default() += 1;
        total += 1;
    }

    let mut out: Vec<ClassCount> = counts
        .into_iter()
        .map(|(group, count)| ClassCount {
            group: group.to_string(),
            count,
            percentage: round2(count as f64 * 100.0 / total as f64),
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.group.cmp(&b.group)));
    out
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
