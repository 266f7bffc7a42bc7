//! One-time crater file load.

use std::path::Path;

use impact_common::CraterCollection;
use tracing::{error, info, instrument, warn};

/// Read the crater GeoJSON file. Never fails: a missing or unusable file
/// degrades to an empty collection.
#[instrument(fields(path = %path.display()))]
pub fn load_craters(path: &Path, age_ceiling_myr: f64) -> CraterCollection {
    if !path.exists() {
        warn!("Crater file not found, continuing without craters");
        return CraterCollection::empty();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to read crater file");
            return CraterCollection::empty();
        }
    };

    match CraterCollection::from_geojson_str(&content, age_ceiling_myr) {
        Ok(collection) => {
            let unparsed = collection.iter().filter(|c| !c.age.is_parsed()).count();
            info!(
                craters = collection.len(),
                plottable = collection.iter().filter(|c| c.is_plottable()).count(),
                unparsed_ages = unparsed,
                "Loaded crater file"
            );
            collection
        }
        Err(e) => {
            error!(error = %e, "Invalid crater file");
            CraterCollection::empty()
        }
    }
}
