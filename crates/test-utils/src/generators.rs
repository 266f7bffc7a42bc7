//! Test data generators for synthetic meteorites and craters.
//!
//! Generated records are `serde_json::Value`s shaped like the upstream
//! sources, so they go through the same decoding path as real data.

use serde_json::{json, Value};

/// Creates one meteorite row in the Socrata shape.
///
/// The mass is encoded as a string, as the API does; `None` omits the
/// field entirely.
pub fn synthetic_meteorite(name: &str, mass_grams: Option<f64>, lat: f64, lon: f64) -> Value {
    let mut row = json!({
        "name": name,
        "id": name.len().to_string(),
        "nametype": "Valid",
        "recclass": "L6",
        "fall": "Found",
        "year": "2000-01-01T00:00:00.000",
        "reclat": lat.to_string(),
        "reclong": lon.to_string(),
        "geolocation": {"type": "Point", "coordinates": [lon, lat]}
    });
    if let Some(mass) = mass_grams {
        row["mass"] = Value::String(mass.to_string());
    }
    row
}

/// Creates one meteorite per mass, spread along the equator.
///
/// # Example
///
/// ```
/// use test_utils::meteorites_with_masses;
///
/// let rows = meteorites_with_masses(&[500.0, 15000.0, 600000.0]);
/// assert_eq!(rows.len(), 3);
/// assert_eq!(rows[1]["mass"], "15000");
/// ```
pub fn meteorites_with_masses(masses: &[f64]) -> Vec<Value> {
    masses
        .iter()
        .enumerate()
        .map(|(i, mass)| {
            synthetic_meteorite(
                &format!("Synthetic {}", i + 1),
                Some(*mass),
                0.0,
                (i as f64 * 10.0) - 170.0,
            )
        })
        .collect()
}

/// Creates `count` meteorites with deterministic, varied attributes.
///
/// Every fifth record has no mass and every seventh has no position, so
/// missing-value handling is exercised alongside the normal path.
pub fn meteorite_set(count: usize) -> Vec<Value> {
    const CLASSES: [&str; 6] = ["L6", "H5", "LL5", "CM2", "Iron, IIIAB", "Eucrite"];

    (0..count)
        .map(|i| {
            let lat = ((i * 37) % 170) as f64 - 85.0;
            let lon = ((i * 73) % 350) as f64 - 175.0;
            let mass = (i % 5 != 0).then(|| ((i * 7919) % 1_000_000) as f64);
            let mut row = synthetic_meteorite(&format!("Meteorite {}", i), mass, lat, lon);
            row["recclass"] = Value::String(CLASSES[i % CLASSES.len()].to_string());
            row["fall"] = Value::String(if i % 3 == 0 { "Fell" } else { "Found" }.to_string());
            row["year"] = Value::String(format!("{}-01-01T00:00:00.000", 1800 + (i % 220)));
            if i % 7 == 0 {
                let obj = row.as_object_mut().expect("row is an object");
                obj.remove("geolocation");
                obj.remove("reclat");
                obj.remove("reclong");
            }
            row
        })
        .collect()
}

/// Serialises rows as an API response body.
pub fn meteorite_array_json(rows: &[Value]) -> String {
    Value::Array(rows.to_vec()).to_string()
}

/// Creates one crater feature using the later-file property names.
pub fn crater_feature(name: &str, diameter_km: f64, age: &str, lon: f64, lat: f64) -> Value {
    json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [lon, lat]},
        "properties": {
            "Name": name,
            "Continent": "Europe",
            "Country": "Testland",
            "Age [Myr]": age,
            "Crater diamter [km]": diameter_km.to_string(),
            "Crater type": "Complex",
            "Target": "Crystalline"
        }
    })
}

/// Wraps features in a `FeatureCollection` document.
pub fn crater_collection_json(features: Vec<Value>) -> String {
    json!({"type": "FeatureCollection", "features": features}).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_meteorite_without_mass() {
        let row = synthetic_meteorite("X", None, 1.0, 2.0);
        assert!(row.get("mass").is_none());
        assert_eq!(row["geolocation"]["coordinates"][0], 2.0);
    }

    #[test]
    fn test_meteorite_set_variety() {
        let rows = meteorite_set(35);
        assert_eq!(rows.len(), 35);
        assert!(rows[0].get("mass").is_none());
        assert!(rows[7].get("reclat").is_none());
        assert!(rows[1].get("mass").is_some());
    }

    #[test]
    fn test_crater_collection_json() {
        let doc = crater_collection_json(vec![crater_feature("A", 10.0, "5", 1.0, 2.0)]);
        let value: Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(value["features"][0]["properties"]["Name"], "A");
    }
}
