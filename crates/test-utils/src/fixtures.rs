//! Common test fixtures for impact viewer tests.
//!
//! Payloads mirror what the upstream sources actually return: Socrata rows
//! with numbers encoded as strings, and crater files using both generations
//! of property names (including the misspelt diameter column).

/// Rows from the meteorite landings API.
pub mod meteorites {
    /// A typical row: every position encoding present and consistent.
    pub const AACHEN: &str = r#"{
        "name": "Aachen",
        "id": "1",
        "nametype": "Valid",
        "recclass": "L5",
        "mass": "21",
        "fall": "Fell",
        "year": "1880-01-01T00:00:00.000",
        "reclat": "50.775000",
        "reclong": "6.083330",
        "geolocation": {"type": "Point", "coordinates": [6.08333, 50.775]}
    }"#;

    /// Position only available as `geolocation.{latitude,longitude}`.
    pub const LAT_LON_GEOLOCATION: &str = r#"{
        "name": "Abee",
        "id": "6",
        "recclass": "EH4",
        "mass": "107000",
        "fall": "Fell",
        "year": "1952-01-01T00:00:00.000",
        "geolocation": {"latitude": "54.21667", "longitude": "-113.0"}
    }"#;

    /// Position only available as `reclat`/`reclong`.
    pub const RECLAT_ONLY: &str = r#"{
        "name": "Acapulco",
        "id": "10",
        "recclass": "Acapulcoite",
        "mass": "1914",
        "fall": "Fell",
        "year": "1976-01-01T00:00:00.000",
        "reclat": "16.883330",
        "reclong": "-99.900000"
    }"#;

    /// No usable position and no mass.
    pub const UNPLOTTABLE: &str = r#"{
        "name": "Lost Stone",
        "id": "99999",
        "recclass": "Stone-uncl",
        "fall": "Found"
    }"#;

    /// A small API response containing the rows above.
    pub fn api_response() -> String {
        format!(
            "[{},{},{},{}]",
            AACHEN, LAT_LON_GEOLOCATION, RECLAT_ONLY, UNPLOTTABLE
        )
    }
}

/// Crater GeoJSON documents.
pub mod craters {
    /// Property names used by the later data files (misspelt diameter).
    pub const LEGACY_COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-111.0225, 35.0278]},
                "properties": {
                    "No": 1,
                    "Name": "Barringer",
                    "Continent": "North America",
                    "Country": "USA",
                    "Age [Myr]": "0.049±0.003",
                    "Crater diamter [km]": "1.19",
                    "Crater type": "Simple",
                    "Target": "Sedimentary"
                }
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-89.5167, 21.4]},
                "properties": {
                    "No": 2,
                    "Name": "Chicxulub",
                    "Continent": "North America",
                    "Country": "Mexico",
                    "Age [Myr]": "66",
                    "Crater diamter [km]": "150",
                    "Crater type": "Complex",
                    "Target": "Mixed"
                }
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [27.1, -27.0]},
                "properties": {
                    "No": 3,
                    "Name": "Vredefort",
                    "Continent": "Africa",
                    "Country": "South Africa",
                    "Age [Myr]": "2023 ± 4",
                    "Crater diamter [km]": "300",
                    "Crater type": "Complex",
                    "Target": "Crystalline"
                }
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": {
                    "No": 4,
                    "Name": "Unlocated",
                    "Country": "Unknown",
                    "Age [Myr]": "garbage text",
                    "Crater diamter [km]": "",
                    "Target": "Crystalline"
                }
            }
        ]
    }"#;

    /// Property names used by the earlier data files.
    pub const SNAKE_CASE_COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [-73.6667, 51.3833]},
                "properties": {
                    "crater_name": "Manicouagan",
                    "diameter_km": 100,
                    "age_millions_years_ago": "214±1",
                    "target_rock": "Crystalline",
                    "country": "Canada",
                    "url": "https://example.org/manicouagan"
                }
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [14.8, 48.9]},
                "properties": {
                    "crater_name": "Ries",
                    "diameter_km": "24",
                    "age_millions_years_ago": "14.8-15.1",
                    "target_rock": "Mixed",
                    "country": "Germany"
                }
            }
        ]
    }"#;

    /// A valid JSON document that is not a feature collection.
    pub const NOT_A_COLLECTION: &str =
        r#"{"type": "Feature", "geometry": null, "properties": {"Name": "Solo"}}"#;
}

/// Built-in colour scheme names.
pub mod schemes {
    pub const CLASSIC: &str = "Classic";
    pub const DEFAULT: &str = "Default";
    pub const BLUE_SCALE: &str = "Blue Scale";
    pub const UNKNOWN: &str = "Neon Dreams";
}

/// Values used by service tests.
pub mod service {
    /// A token value that is obviously not a real credential.
    pub const TEST_TOKEN: &str = "test-cesium-token";

    /// A minimal viewer configuration file.
    pub const VIEWER_YAML: &str = r#"
title: "Test Impacts"
features:
  clustering: false
  crater_filters: true
  heatmap: false
  search: true
default_meteorite_scheme: Classic
default_crater_scheme: Blue Scale
age_ceiling_myr: 3000
missing_values: exclude
"#;
}
