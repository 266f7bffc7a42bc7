//! Presentation mapper: one record to one map marker.

use impact_common::{Coordinates, CraterRecord, MeteoriteRecord};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::color::Color;
use crate::scheme::ThresholdScale;

/// Marker pixel size as a function of magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SizeRule {
    /// `clamp(magnitude / divisor, min_px, max_px)`.
    Linear {
        divisor: f64,
        min_px: f64,
        max_px: f64,
        unknown_px: f64,
    },
    /// Discrete sizes: the first step whose `min` the magnitude reaches.
    Stepped {
        steps: Vec<SizeStep>,
        floor_px: f64,
        unknown_px: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeStep {
    pub min: f64,
    pub px: f64,
}

impl SizeRule {
    /// Meteorites: mass/1000 clamped to [5, 25] px, unknown mass 10 px.
    pub fn meteorite_default() -> Self {
        SizeRule::Linear {
            divisor: 1000.0,
            min_px: 5.0,
            max_px: 25.0,
            unknown_px: 10.0,
        }
    }

    /// Craters: ≥200 km 25 px, ≥100 20, ≥50 15, ≥10 10, otherwise 7.
    pub fn crater_default() -> Self {
        SizeRule::Stepped {
            steps: [(200.0, 25.0), (100.0, 20.0), (50.0, 15.0), (10.0, 10.0)]
                .into_iter()
                .map(|(min, px)| SizeStep { min, px })
                .collect(),
            floor_px: 7.0,
            unknown_px: 7.0,
        }
    }

    pub fn size(&self, magnitude: Option<f64>) -> f64 {
        let magnitude = magnitude.filter(|m| m.is_finite());
        match self {
            SizeRule::Linear {
                divisor,
                min_px,
                max_px,
                unknown_px,
            } => match magnitude {
                Some(m) if *divisor > 0.0 => (m / divisor).clamp(*min_px, *max_px),
                Some(_) => *min_px,
                None => *unknown_px,
            },
            SizeRule::Stepped {
                steps,
                floor_px,
                unknown_px,
            } => match magnitude {
                Some(m) => steps
                    .iter()
                    .find(|s| m >= s.min)
                    .map_or(*floor_px, |s| s.px),
                None => *unknown_px,
            },
        }
    }
}

/// Ordered label/value lines for tooltips and table rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Description {
    lines: Vec<(String, String)>,
}

impl Description {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(mut self, label: &str, value: impl Into<String>) -> Self {
        self.lines.push((label.to_string(), value.into()));
        self
    }

    pub fn lines(&self) -> &[(String, String)] {
        &self.lines
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    /// `<b>Label:</b> value<br>` per line, with values escaped.
    pub fn to_html(&self) -> String {
        self.lines
            .iter()
            .map(|(label, value)| {
                format!("<b>{}:</b> {}", escape_html(label), escape_html(value))
            })
            .collect::<Vec<_>>()
            .join("<br>")
    }

    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Serialize for Description {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Description", 2)?;
        state.serialize_field("lines", &self.lines)?;
        state.serialize_field("html", &self.to_html())?;
        state.end()
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A map marker. `index` is the record's position in the filtered list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub index: usize,
    pub position: Coordinates,
    pub size_px: f64,
    pub color: Color,
    pub description: Description,
}

/// Mass for display: tonnes from 1e6 g, kilograms from 1000 g, else grams.
pub fn format_mass(grams: Option<f64>) -> String {
    match grams.filter(|g| g.is_finite()) {
        None => "Unknown".to_string(),
        Some(g) if g >= 1_000_000.0 => format!("{:.2} tonnes", g / 1_000_000.0),
        Some(g) if g >= 1000.0 => format!("{:.2} kg", g / 1000.0),
        Some(g) => format!("{} g", g),
    }
}

pub fn meteorite_description(record: &MeteoriteRecord) -> Description {
    Description::new()
        .line("Name", record.display_name())
        .line("ID", record.id.as_deref().unwrap_or("Unknown"))
        .line("Mass", format_mass(record.mass_grams()))
        .line("Class", record.class_name())
        .line(
            "Year",
            record
                .year()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
        )
        .line(
            "Fall/Find",
            record
                .fall_status()
                .map(|f| f.as_str())
                .unwrap_or("Unknown"),
        )
}

pub fn crater_description(crater: &CraterRecord) -> Description {
    let or_unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| "Unknown".to_string());
    Description::new()
        .line("Name", crater.display_name())
        .line(
            "Age",
            crater
                .age_text
                .as_ref()
                .map(|a| format!("{} Myr", a))
                .unwrap_or_else(|| "Unknown".to_string()),
        )
        .line(
            "Diameter",
            crater
                .diameter_km
                .map(|d| format!("{} km", d))
                .unwrap_or_else(|| "Unknown".to_string()),
        )
        .line("Country", or_unknown(&crater.country))
        .line("Target", or_unknown(&crater.target_rock))
        .line("Type", or_unknown(&crater.crater_type))
}

pub fn meteorite_marker(
    index: usize,
    record: &MeteoriteRecord,
    colors: &ThresholdScale,
    sizes: &SizeRule,
) -> Option<Marker> {
    let position = record.coordinates()?;
    let mass = record.mass_grams();
    Some(Marker {
        index,
        position,
        size_px: sizes.size(mass),
        color: colors.classify(mass),
        description: meteorite_description(record),
    })
}

pub fn crater_marker(
    index: usize,
    crater: &CraterRecord,
    colors: &ThresholdScale,
    sizes: &SizeRule,
) -> Option<Marker> {
    let position = crater.position?;
    Some(Marker {
        index,
        position,
        size_px: sizes.size(crater.diameter_km),
        color: colors.classify(crater.diameter_km),
        description: crater_description(crater),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::SchemeSet;
    use serde_json::json;

    #[test]
    fn test_linear_size_clamped() {
        let rule = SizeRule::meteorite_default();
        assert_eq!(rule.size(Some(500.0)), 5.0);
        assert_eq!(rule.size(Some(15_000.0)), 15.0);
        assert_eq!(rule.size(Some(600_000.0)), 25.0);
        assert_eq!(rule.size(None), 10.0);
        assert_eq!(rule.size(Some(f64::INFINITY)), 10.0);
    }

    #[test]
    fn test_stepped_crater_sizes() {
        let rule = SizeRule::crater_default();
        let sizes: Vec<f64> = [300.0, 200.0, 150.0, 60.0, 10.0, 9.9, 0.5]
            .iter()
            .map(|d| rule.size(Some(*d)))
            .collect();
        assert_eq!(sizes, vec![25.0, 25.0, 20.0, 15.0, 10.0, 7.0, 7.0]);
        assert_eq!(rule.size(None), 7.0);
    }

    #[test]
    fn test_format_mass() {
        assert_eq!(format_mass(None), "Unknown");
        assert_eq!(format_mass(Some(21.0)), "21 g");
        assert_eq!(format_mass(Some(1914.0)), "1.91 kg");
        assert_eq!(format_mass(Some(60_000_000.0)), "60.00 tonnes");
    }

    #[test]
    fn test_description_escapes_html() {
        let d = Description::new().line("Name", "<script>x</script>");
        assert_eq!(d.to_html(), "<b>Name:</b> &lt;script&gt;x&lt;/script&gt;");
        assert_eq!(d.to_text(), "Name: <script>x</script>");
    }

    #[test]
    fn test_meteorite_marker() {
        let record: MeteoriteRecord = serde_json::from_value(json!({
            "name": "Aachen", "id": "1", "recclass": "L5", "mass": "21",
            "fall": "Fell", "year": "1880-01-01T00:00:00.000",
            "reclat": "50.775", "reclong": "6.08333"
        }))
        .unwrap();
        let schemes = SchemeSet::builtin();
        let scale = &schemes.get("Classic").unwrap().meteorite;

        let marker = meteorite_marker(3, &record, scale, &SizeRule::meteorite_default()).unwrap();
        assert_eq!(marker.index, 3);
        assert_eq!(marker.size_px, 5.0);
        assert_eq!((marker.color.r, marker.color.g, marker.color.b), (0, 255, 255));
        assert_eq!(marker.description.get("Mass"), Some("21 g"));
        assert_eq!(marker.description.get("Year"), Some("1880"));
        assert_eq!(marker.description.get("Fall/Find"), Some("Fell"));

        let value = serde_json::to_value(&marker).unwrap();
        assert!(value["description"]["html"]
            .as_str()
            .unwrap()
            .starts_with("<b>Name:</b> Aachen"));
    }

    #[test]
    fn test_unplottable_has_no_marker() {
        let record: MeteoriteRecord = serde_json::from_value(json!({"name": "X"})).unwrap();
        let schemes = SchemeSet::builtin();
        let scale = &schemes.get("Classic").unwrap().meteorite;
        assert!(meteorite_marker(0, &record, scale, &SizeRule::meteorite_default()).is_none());
    }

    #[test]
    fn test_size_rule_from_json() {
        let rule: SizeRule = serde_json::from_value(json!({
            "type": "linear", "divisor": 10000, "min_px": 5, "max_px": 20, "unknown_px": 5
        }))
        .unwrap();
        assert_eq!(rule.size(Some(100_000.0)), 10.0);
    }
}
