//! Impact craters read from a GeoJSON `FeatureCollection`.
//!
//! Crater data files have gone through several revisions and the property
//! names drifted between them (including a misspelt diameter column), so
//! every field is resolved through a list of accepted aliases.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::age::{parse_age_string, AgeEstimate};
use crate::error::{ImpactError, ImpactResult};
use crate::geo::{number_from_value, Coordinates};

const NAME_KEYS: &[&str] = &["crater_name", "Name"];
const DIAMETER_KEYS: &[&str] = &["diameter_km", "Crater diamter [km]", "Crater diameter [km]"];
const AGE_KEYS: &[&str] = &["age_millions_years_ago", "Age [Myr]"];
const TARGET_KEYS: &[&str] = &["target_rock", "Target"];
const COUNTRY_KEYS: &[&str] = &["country", "Country"];
const CONTINENT_KEYS: &[&str] = &["Continent", "continent"];
const TYPE_KEYS: &[&str] = &["Crater type", "crater_type"];
const REFERENCE_KEYS: &[&str] = &["No"];
const URL_KEYS: &[&str] = &["url", "URL"];

/// Property names written by the age pass; never shown as table columns.
pub const DERIVED_AGE_KEYS: &[&str] = &["age_min", "age_max"];

/// Whether `key` is one of the spellings behind the leading table columns
/// (name, continent, country, age, diameter, crater type).
pub fn is_leading_column_key(key: &str) -> bool {
    [NAME_KEYS, CONTINENT_KEYS, COUNTRY_KEYS, AGE_KEYS, DIAMETER_KEYS, TYPE_KEYS]
        .iter()
        .any(|keys| keys.contains(&key))
}

/// One impact crater.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CraterRecord {
    pub name: Option<String>,
    pub diameter_km: Option<f64>,
    /// Age as written in the source file.
    pub age_text: Option<String>,
    pub age: AgeEstimate,
    pub age_min: f64,
    pub age_max: f64,
    pub target_rock: Option<String>,
    pub country: Option<String>,
    pub continent: Option<String>,
    pub crater_type: Option<String>,
    /// Identifier in the external crater database.
    pub reference_id: Option<String>,
    pub url: Option<String>,
    pub position: Option<Coordinates>,
    /// Source properties, in file order.
    pub properties: Map<String, Value>,
}

impl CraterRecord {
    /// Build a record from a decoded feature and run the age pass.
    pub fn from_parts(
        geometry: Option<&Value>,
        properties: Map<String, Value>,
        age_ceiling: f64,
    ) -> Self {
        let age_text = text_property(&properties, AGE_KEYS);
        let age = age_text
            .as_deref()
            .map(parse_age_string)
            .unwrap_or(AgeEstimate::Unparsed);
        let (age_min, age_max) = age.resolve(age_ceiling);

        Self {
            name: text_property(&properties, NAME_KEYS),
            diameter_km: number_property(&properties, DIAMETER_KEYS),
            age_text,
            age,
            age_min,
            age_max,
            target_rock: text_property(&properties, TARGET_KEYS),
            country: text_property(&properties, COUNTRY_KEYS),
            continent: text_property(&properties, CONTINENT_KEYS),
            crater_type: text_property(&properties, TYPE_KEYS),
            reference_id: text_property(&properties, REFERENCE_KEYS),
            url: text_property(&properties, URL_KEYS),
            position: geometry
                .and_then(point_position)
                .or_else(|| property_position(&properties)),
            properties,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    pub fn target_rock_or_unknown(&self) -> &str {
        self.target_rock.as_deref().unwrap_or("Unknown")
    }

    pub fn crater_type_or_unknown(&self) -> &str {
        self.crater_type.as_deref().unwrap_or("Unknown")
    }

    pub fn is_plottable(&self) -> bool {
        self.position.is_some()
    }

    /// Link to the crater's page in the external database, if it has an id.
    pub fn reference_url(&self) -> Option<String> {
        if let Some(url) = &self.url {
            return Some(url.clone());
        }
        self.reference_id
            .as_ref()
            .map(|id| format!("https://impact-craters.com/craters_id{}", id))
    }
}

/// The crater dataset loaded at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CraterCollection {
    pub features: Vec<CraterRecord>,
}

#[derive(Deserialize)]
struct RawCollection {
    #[serde(rename = "type", default)]
    type_: Option<String>,
    #[serde(default)]
    features: Vec<Value>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

impl CraterCollection {
    /// The collection used when no crater file is available.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a GeoJSON `FeatureCollection`.
    ///
    /// Features that cannot be decoded are skipped with a warning; only a
    /// document that is not a feature collection at all is an error.
    pub fn from_geojson_str(json: &str, age_ceiling: f64) -> ImpactResult<Self> {
        let raw: RawCollection =
            serde_json::from_str(json).map_err(|e| ImpactError::GeoJson(e.to_string()))?;

        if let Some(kind) = raw.type_.as_deref() {
            if kind != "FeatureCollection" {
                return Err(ImpactError::GeoJson(format!(
                    "expected FeatureCollection, found {}",
                    kind
                )));
            }
        }

        let mut features = Vec::with_capacity(raw.features.len());
        for (index, value) in raw.features.into_iter().enumerate() {
            match serde_json::from_value::<RawFeature>(value) {
                Ok(feature) => features.push(CraterRecord::from_parts(
                    feature.geometry.as_ref(),
                    feature.properties.unwrap_or_default(),
                    age_ceiling,
                )),
                Err(e) => warn!(index = index, error = %e, "Skipping undecodable crater feature"),
            }
        }

        Ok(Self { features })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CraterRecord> {
        self.features.iter()
    }

    /// Property names in first-seen order across all features, excluding the
    /// derived age bounds.
    pub fn property_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for feature in &self.features {
            for key in feature.properties.keys() {
                if !DERIVED_AGE_KEYS.contains(&key.as_str()) && !names.contains(key) {
                    names.push(key.clone());
                }
            }
        }
        names
    }
}

impl<'a> IntoIterator for &'a CraterCollection {
    type Item = &'a CraterRecord;
    type IntoIter = std::slice::Iter<'a, CraterRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

/// Render a property value as display text. Blank strings and nulls are
/// treated as absent.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_property(properties: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| properties.get(*k))
        .find_map(value_text)
}

fn number_property(properties: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|k| properties.get(*k))
        .find_map(number_from_value)
}

fn point_position(geometry: &Value) -> Option<Coordinates> {
    if geometry.get("type")?.as_str()? != "Point" {
        return None;
    }
    match geometry.get("coordinates")?.as_array()?.as_slice() {
        [lon, lat, ..] => Coordinates::new(number_from_value(lat)?, number_from_value(lon)?),
        _ => None,
    }
}

fn property_position(properties: &Map<String, Value>) -> Option<Coordinates> {
    let lon = number_property(properties, &["Longitude", "longitude"])?;
    let lat = number_property(properties, &["Latitude", "latitude"])?;
    Coordinates::new(lat, lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::age::DEFAULT_AGE_CEILING_MYR;
    use serde_json::json;

    fn collection(value: Value) -> CraterCollection {
        CraterCollection::from_geojson_str(&value.to_string(), DEFAULT_AGE_CEILING_MYR).unwrap()
    }

    #[test]
    fn test_legacy_property_names() {
        let c = collection(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-111.02, 35.03]},
                "properties": {
                    "Name": "Barringer",
                    "Crater diamter [km]": "1.19",
                    "Age [Myr]": "0.049±0.003",
                    "Target": "Sedimentary",
                    "Country": "USA",
                    "Continent": "North America",
                    "Crater type": "Simple",
                    "No": 12
                }
            }]
        }));

        let crater = &c.features[0];
        assert_eq!(crater.display_name(), "Barringer");
        assert_eq!(crater.diameter_km, Some(1.19));
        assert_eq!(crater.target_rock.as_deref(), Some("Sedimentary"));
        assert_eq!(crater.country.as_deref(), Some("USA"));
        assert_eq!(crater.crater_type.as_deref(), Some("Simple"));
        assert_eq!(crater.reference_id.as_deref(), Some("12"));
        assert_eq!(
            crater.reference_url().as_deref(),
            Some("https://impact-craters.com/craters_id12")
        );
        assert!(matches!(crater.age, AgeEstimate::Uncertain { .. }));
        let pos = crater.position.unwrap();
        assert_eq!((pos.lat, pos.lon), (35.03, -111.02));
    }

    #[test]
    fn test_snake_case_property_names() {
        let c = collection(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-89.5, 21.3]},
                "properties": {
                    "crater_name": "Chicxulub",
                    "diameter_km": 150,
                    "age_millions_years_ago": "66",
                    "target_rock": "Mixed",
                    "country": "Mexico",
                    "url": "https://example.org/chicxulub"
                }
            }]
        }));

        let crater = &c.features[0];
        assert_eq!(crater.display_name(), "Chicxulub");
        assert_eq!(crater.diameter_km, Some(150.0));
        assert_eq!((crater.age_min, crater.age_max), (66.0, 66.0));
        assert_eq!(
            crater.reference_url().as_deref(),
            Some("https://example.org/chicxulub")
        );
    }

    #[test]
    fn test_unparsed_age_uses_ceiling() {
        let c = CraterCollection::from_geojson_str(
            &json!({
                "type": "FeatureCollection",
                "features": [{"type": "Feature", "geometry": null,
                              "properties": {"Name": "X", "Age [Myr]": "unknown"}}]
            })
            .to_string(),
            3000.0,
        )
        .unwrap();

        let crater = &c.features[0];
        assert_eq!(crater.age, AgeEstimate::Unparsed);
        assert_eq!((crater.age_min, crater.age_max), (0.0, 3000.0));
    }

    #[test]
    fn test_position_from_properties() {
        let c = collection(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": null,
                "properties": {"Name": "Props", "Longitude": "23.5", "Latitude": "-12.25"}
            }]
        }));
        let pos = c.features[0].position.unwrap();
        assert_eq!((pos.lat, pos.lon), (-12.25, 23.5));
    }

    #[test]
    fn test_unplottable_crater_is_kept() {
        let c = collection(json!({
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "properties": {"Name": "Lost"}}]
        }));
        assert_eq!(c.len(), 1);
        assert!(!c.features[0].is_plottable());
        assert_eq!(c.features[0].target_rock_or_unknown(), "Unknown");
    }

    #[test]
    fn test_skips_bad_features() {
        let c = collection(json!({
            "type": "FeatureCollection",
            "features": [
                "not a feature",
                {"type": "Feature", "properties": {"Name": "Good"}}
            ]
        }));
        assert_eq!(c.len(), 1);
        assert_eq!(c.features[0].display_name(), "Good");
    }

    #[test]
    fn test_rejects_non_collection() {
        let err = CraterCollection::from_geojson_str(
            r#"{"type": "Feature", "properties": {}}"#,
            DEFAULT_AGE_CEILING_MYR,
        )
        .unwrap_err();
        assert!(matches!(err, ImpactError::GeoJson(_)));

        assert!(CraterCollection::from_geojson_str("not json", 2500.0).is_err());
    }

    #[test]
    fn test_property_names_order() {
        let c = collection(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"Name": "A", "Country": "X", "age_min": 1}},
                {"type": "Feature", "properties": {"Name": "B", "Target": "Y", "age_max": 2}}
            ]
        }));
        assert_eq!(c.property_names(), vec!["Name", "Country", "Target"]);
    }

    #[test]
    fn test_leading_column_keys() {
        assert!(is_leading_column_key("Crater diamter [km]"));
        assert!(is_leading_column_key("crater_name"));
        assert!(!is_leading_column_key("Target"));
        assert!(!is_leading_column_key("No"));
    }

    #[test]
    fn test_empty_collection() {
        let c = CraterCollection::empty();
        assert!(c.is_empty());
        assert_eq!(c.iter().count(), 0);
    }
}
