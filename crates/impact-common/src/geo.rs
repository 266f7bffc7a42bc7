//! Geographic positions for map markers.

use serde::{Deserialize, Serialize};

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Build a position, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let coords = Self { lat, lon };
        coords.is_valid().then_some(coords)
    }

    /// Build from a GeoJSON `[lon, lat]` pair.
    pub fn from_lon_lat(pair: [f64; 2]) -> Option<Self> {
        Self::new(pair[1], pair[0])
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// GeoJSON ordering.
    pub fn to_lon_lat(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

/// Parse a number that the upstream API may encode either as a JSON number
/// or as a numeric string.
pub(crate) fn number_from_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_coordinates() {
        let c = Coordinates::new(45.5, -122.6).unwrap();
        assert_eq!(c.to_lon_lat(), [-122.6, 45.5]);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(Coordinates::new(91.0, 0.0).is_none());
        assert!(Coordinates::new(0.0, 180.5).is_none());
        assert!(Coordinates::new(f64::NAN, 0.0).is_none());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn test_from_lon_lat_order() {
        let c = Coordinates::from_lon_lat([10.0, 20.0]).unwrap();
        assert_eq!(c.lat, 20.0);
        assert_eq!(c.lon, 10.0);
    }

    #[test]
    fn test_number_from_value() {
        assert_eq!(number_from_value(&json!("12.5")), Some(12.5));
        assert_eq!(number_from_value(&json!(" 7 ")), Some(7.0));
        assert_eq!(number_from_value(&json!(3)), Some(3.0));
        assert_eq!(number_from_value(&json!("abc")), None);
        assert_eq!(number_from_value(&json!(null)), None);
        assert_eq!(number_from_value(&json!("NaN")), None);
    }
}
