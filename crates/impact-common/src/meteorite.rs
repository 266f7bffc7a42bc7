//! Meteorite landing records as served by the Socrata meteorite-landings API.
//!
//! The upstream shape is not controlled by this codebase: numeric fields
//! arrive as strings, and the position has three inconsistent encodings.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::geo::Coordinates;

/// A number that may be encoded as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Numeric::Number(n) => Some(*n),
            Numeric::Text(s) => s.trim().parse::<f64>().ok(),
        }
        .filter(|v| v.is_finite())
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Numeric::Number(value)
    }
}

/// The `geolocation` object, which appears either as a GeoJSON point or as
/// a `{latitude, longitude}` pair depending on the dataset export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// `[lon, lat]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Vec<Numeric>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Numeric>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Numeric>,
}

impl Geolocation {
    fn point_position(&self) -> Option<Coordinates> {
        match self.coordinates.as_deref() {
            Some([lon, lat]) => Coordinates::new(lat.as_f64()?, lon.as_f64()?),
            _ => None,
        }
    }

    fn lat_lon_position(&self) -> Option<Coordinates> {
        let lat = self.latitude.as_ref()?.as_f64()?;
        let lon = self.longitude.as_ref()?.as_f64()?;
        Coordinates::new(lat, lon)
    }
}

/// Whether the meteorite was observed falling or found later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FallStatus {
    Fell,
    Found,
}

impl FallStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "Fell" => Some(FallStatus::Fell),
            "Found" => Some(FallStatus::Found),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FallStatus::Fell => "Fell",
            FallStatus::Found => "Found",
        }
    }
}

impl std::fmt::Display for FallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the meteorite landings dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeteoriteRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub nametype: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub recclass: Option<String>,

    /// Mass in grams.
    #[serde(default)]
    pub mass: Option<Numeric>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub fall: Option<String>,

    /// ISO timestamp, e.g. `1880-01-01T00:00:00.000`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: Option<String>,

    #[serde(default)]
    pub reclat: Option<Numeric>,

    #[serde(default)]
    pub reclong: Option<Numeric>,

    #[serde(default)]
    pub geolocation: Option<Geolocation>,
}

impl MeteoriteRecord {
    /// Resolve the landing position.
    ///
    /// Encodings are tried in order: `geolocation.coordinates`,
    /// `geolocation.{latitude,longitude}`, then `reclat`/`reclong`. The first
    /// one that yields a valid pair wins.
    pub fn coordinates(&self) -> Option<Coordinates> {
        if let Some(geo) = &self.geolocation {
            if let Some(c) = geo.point_position().or_else(|| geo.lat_lon_position()) {
                return Some(c);
            }
        }
        let lat = self.reclat.as_ref()?.as_f64()?;
        let lon = self.reclong.as_ref()?.as_f64()?;
        Coordinates::new(lat, lon)
    }

    pub fn is_plottable(&self) -> bool {
        self.coordinates().is_some()
    }

    pub fn mass_grams(&self) -> Option<f64> {
        self.mass.as_ref().and_then(Numeric::as_f64)
    }

    /// Calendar year of the `year` field.
    pub fn year(&self) -> Option<i32> {
        self.year.as_deref().and_then(parse_year)
    }

    pub fn fall_status(&self) -> Option<FallStatus> {
        self.fall.as_deref().and_then(FallStatus::parse)
    }

    pub fn display_name(&self) -> &str {
        non_empty(self.name.as_deref()).unwrap_or("Unknown")
    }

    pub fn class_name(&self) -> &str {
        non_empty(self.recclass.as_deref()).unwrap_or("Unknown")
    }
}

/// Text fields occasionally arrive as bare numbers (`"id": 2`,
/// `"year": 1880`); keep their textual form.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Float(f64),
        Flag(bool),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Integer(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
        Raw::Flag(b) => b.to_string(),
    }))
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.year());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.year());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.year());
    }
    raw.parse::<i32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> MeteoriteRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_socrata_row() {
        let m = record(json!({
            "name": "Aachen",
            "id": "1",
            "nametype": "Valid",
            "recclass": "L5",
            "mass": "21",
            "fall": "Fell",
            "year": "1880-01-01T00:00:00.000",
            "reclat": "50.775000",
            "reclong": "6.083330",
            "geolocation": {"type": "Point", "coordinates": [6.08333, 50.775]},
            ":@computed_region_cbhk_fwbd": "1"
        }));

        assert_eq!(m.display_name(), "Aachen");
        assert_eq!(m.mass_grams(), Some(21.0));
        assert_eq!(m.year(), Some(1880));
        assert_eq!(m.fall_status(), Some(FallStatus::Fell));
        assert_eq!(m.class_name(), "L5");
        let c = m.coordinates().unwrap();
        assert_eq!(c.lat, 50.775);
        assert_eq!(c.lon, 6.08333);
    }

    #[test]
    fn test_geolocation_coordinates_take_precedence() {
        let m = record(json!({
            "name": "Conflict",
            "reclat": "10.0",
            "reclong": "20.0",
            "geolocation": {
                "type": "Point",
                "coordinates": [-70.5, -30.25],
                "latitude": "1.0",
                "longitude": "2.0"
            }
        }));

        let c = m.coordinates().unwrap();
        assert_eq!(c.lat, -30.25);
        assert_eq!(c.lon, -70.5);
    }

    #[test]
    fn test_geolocation_lat_lon_fallback() {
        let m = record(json!({
            "geolocation": {"latitude": "12.5", "longitude": "-3.5"},
            "reclat": "0", "reclong": "0"
        }));
        let c = m.coordinates().unwrap();
        assert_eq!((c.lat, c.lon), (12.5, -3.5));
    }

    #[test]
    fn test_reclat_fallback_when_geolocation_invalid() {
        let m = record(json!({
            "geolocation": {"type": "Point", "coordinates": ["abc", "def"]},
            "reclat": "45.0",
            "reclong": "90.0"
        }));
        let c = m.coordinates().unwrap();
        assert_eq!((c.lat, c.lon), (45.0, 90.0));
    }

    #[test]
    fn test_unplottable_record() {
        let m = record(json!({"name": "Nowhere", "mass": "100"}));
        assert!(m.coordinates().is_none());
        assert!(!m.is_plottable());

        let partial = record(json!({"reclat": "45.0"}));
        assert!(partial.coordinates().is_none());
    }

    #[test]
    fn test_missing_fields_default() {
        let m = record(json!({}));
        assert_eq!(m.display_name(), "Unknown");
        assert_eq!(m.class_name(), "Unknown");
        assert_eq!(m.mass_grams(), None);
        assert_eq!(m.year(), None);
        assert_eq!(m.fall_status(), None);
    }

    #[test]
    fn test_year_formats() {
        assert_eq!(parse_year("1952-01-01T00:00:00.000"), Some(1952));
        assert_eq!(parse_year("2001-06-15T12:00:00Z"), Some(2001));
        assert_eq!(parse_year("1999-03-02"), Some(1999));
        assert_eq!(parse_year("1861"), Some(1861));
        assert_eq!(parse_year("unknown"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn test_numeric_mass_as_number() {
        let m = record(json!({"mass": 1500.5}));
        assert_eq!(m.mass_grams(), Some(1500.5));
    }

    #[test]
    fn test_numeric_id_and_year_accepted() {
        let m = record(json!({"name": "Odd", "id": 2, "year": 1880, "recclass": null}));
        assert_eq!(m.id.as_deref(), Some("2"));
        assert_eq!(m.year(), Some(1880));
        assert_eq!(m.class_name(), "Unknown");
    }

    #[test]
    fn test_unknown_fall_value() {
        let m = record(json!({"fall": "Maybe"}));
        assert_eq!(m.fall_status(), None);
    }
}
