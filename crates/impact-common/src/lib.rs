//! Common types shared by the impact viewer crates.
//!
//! Two record shapes flow through the system: meteorite landings, decoded
//! from the Socrata JSON API, and impact craters, decoded from a bundled
//! GeoJSON `FeatureCollection`. Neither has identity beyond one load.

pub mod age;
pub mod crater;
pub mod error;
pub mod geo;
pub mod meteorite;

pub use age::{parse_age_string, AgeEstimate, DEFAULT_AGE_CEILING_MYR};
pub use crater::{is_leading_column_key, value_text, CraterCollection, CraterRecord};
pub use error::{ImpactError, ImpactResult};
pub use geo::Coordinates;
pub use meteorite::{FallStatus, Geolocation, MeteoriteRecord};
