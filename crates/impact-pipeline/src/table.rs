//! "View all" tables with search and numeric-aware sorting.

use impact_common::{is_leading_column_key, value_text, CraterRecord, ImpactError, MeteoriteRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::marker::format_mass;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub label: String,
    pub sortable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Raw magnitude behind a formatted cell, e.g. grams for "1.91 kg".
    #[serde(skip)]
    pub sort_key: Option<f64>,
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
            sort_key: None,
        }
    }

    pub fn link(text: impl Into<String>, href: Option<String>) -> Self {
        Self {
            text: text.into(),
            link: href,
            sort_key: None,
        }
    }

    fn keyed(text: impl Into<String>, key: Option<f64>) -> Self {
        Self {
            sort_key: key,
            ..Self::text(text)
        }
    }
}

/// A table row; `index` is the record's position in the filtered list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub index: usize,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep rows whose first (name) column contains `query`, ignoring case.
    pub fn search(&mut self, query: &str) {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return;
        }
        self.rows.retain(|row| {
            row.cells
                .first()
                .is_some_and(|c| c.text.to_lowercase().contains(&query))
        });
    }

    /// Sort rows by the column labelled `column`. Sorting a link-only column
    /// leaves the order unchanged.
    pub fn sort(&mut self, column: &str, direction: SortDirection) -> Result<(), ImpactError> {
        let idx = self
            .columns
            .iter()
            .position(|c| c.label == column)
            .ok_or_else(|| ImpactError::UnknownColumn(column.to_string()))?;
        if !self.columns[idx].sortable {
            return Ok(());
        }

        self.rows.sort_by(|a, b| {
            let ord = compare_cells(&a.cells[idx], &b.cells[idx]);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
        Ok(())
    }
}

/// How a cell sorts. Kinds never interleave: keyed cells come first, then
/// cells whose text parses as a number, then plain text.
enum SortValue {
    Keyed(f64),
    Numeric(f64),
    Text(String),
}

impl SortValue {
    fn of(cell: &Cell) -> Self {
        if let Some(key) = cell.sort_key {
            return SortValue::Keyed(key);
        }
        match numeric_part(&cell.text) {
            Some(n) => SortValue::Numeric(n),
            None => SortValue::Text(cell.text.to_lowercase()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortValue::Keyed(_) => 0,
            SortValue::Numeric(_) => 1,
            SortValue::Text(_) => 2,
        }
    }
}

fn compare_cells(a: &Cell, b: &Cell) -> Ordering {
    match (SortValue::of(a), SortValue::of(b)) {
        (SortValue::Keyed(x), SortValue::Keyed(y)) | (SortValue::Numeric(x), SortValue::Numeric(y)) => {
            x.total_cmp(&y)
        }
        (SortValue::Text(x), SortValue::Text(y)) => x.cmp(&y),
        (x, y) => x.rank().cmp(&y.rank()),
    }
}

/// Strip everything but digits, `.` and `-`, then parse.
fn numeric_part(text: &str) -> Option<f64> {
    let stripped: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    stripped.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn meteorite_table(filtered: &[&MeteoriteRecord]) -> Table {
    let columns = [
        ("Name", true),
        ("Mass", true),
        ("Class", true),
        ("Year", true),
        ("Fall", true),
        ("MetBull", false),
    ]
    .into_iter()
    .map(|(label, sortable)| Column {
        label: label.to_string(),
        sortable,
    })
    .collect();

    let rows = filtered
        .iter()
        .enumerate()
        .map(|(index, m)| {
            let metbull = match m.id.as_deref() {
                Some(id) => Cell::link(
                    "View",
                    Some(format!(
                        "https://www.lpi.usra.edu/meteor/metbull.php?code={}",
                        id
                    )),
                ),
                None => Cell::text("N/A"),
            };
            let year = m.year();
            Row {
                index,
                cells: vec![
                    Cell::text(m.display_name()),
                    Cell::keyed(format_mass(m.mass_grams()), m.mass_grams()),
                    Cell::text(m.class_name()),
                    Cell::keyed(
                        year.map_or_else(|| "Unknown".to_string(), |y| y.to_string()),
                        year.map(f64::from),
                    ),
                    Cell::text(m.fall.as_deref().unwrap_or("Unknown")),
                    metbull,
                ],
            }
        })
        .collect();

    Table { columns, rows }
}

const CRATER_LEADING_COLUMNS: [&str; 6] = [
    "Name",
    "Continent",
    "Country",
    "Age [Myr]",
    "Crater diameter [km]",
    "Crater type",
];

/// Crater table: the leading columns, then every other source property in
/// first-seen order. `property_names` is usually
/// [`CraterCollection::property_names`](impact_common::CraterCollection::property_names).
pub fn crater_table(filtered: &[&CraterRecord], property_names: &[String]) -> Table {
    let extra: Vec<&String> = property_names
        .iter()
        .filter(|k| !is_leading_column_key(k))
        .collect();

    let columns = CRATER_LEADING_COLUMNS
        .iter()
        .map(|l| l.to_string())
        .chain(extra.iter().map(|k| k.to_string()))
        .map(|label| Column {
            label,
            sortable: true,
        })
        .collect();

    let unknown = || "Unknown".to_string();
    let rows = filtered
        .iter()
        .enumerate()
        .map(|(index, c)| {
            let mut cells = vec![
                Cell::link(c.display_name(), c.reference_url()),
                Cell::text(c.continent.clone().unwrap_or_else(unknown)),
                Cell::text(c.country.clone().unwrap_or_else(unknown)),
                Cell::keyed(
                    c.age_text.clone().unwrap_or_else(unknown),
                    c.age.is_parsed().then_some(c.age_min),
                ),
                Cell::keyed(
                    c.diameter_km.map_or_else(unknown, |d| d.to_string()),
                    c.diameter_km,
                ),
                Cell::text(c.crater_type.clone().unwrap_or_else(unknown)),
            ];
            cells.extend(extra.iter().map(|key| {
                Cell::text(
                    c.properties
                        .get(key.as_str())
                        .and_then(value_text)
                        .unwrap_or_else(unknown),
                )
            }));
            Row { index, cells }
        })
        .collect();

    Table { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meteorites() -> Vec<MeteoriteRecord> {
        [
            json!({"name": "Zagora", "id": "3", "mass": "2500", "year": "1990-01-01T00:00:00.000"}),
            json!({"name": "allende", "id": "2", "mass": "2000000", "year": "1969-01-01T00:00:00.000"}),
            json!({"name": "Bali", "mass": "900"}),
        ]
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
    }

    fn names(table: &Table) -> Vec<&str> {
        table.rows.iter().map(|r| r.cells[0].text.as_str()).collect()
    }

    #[test]
    fn test_meteorite_table_cells() {
        let records = meteorites();
        let refs: Vec<&MeteoriteRecord> = records.iter().collect();
        let table = meteorite_table(&refs);

        assert_eq!(table.columns.len(), 6);
        assert_eq!(table.rows[0].cells[1].text, "2.50 kg");
        assert_eq!(
            table.rows[0].cells[5].link.as_deref(),
            Some("https://www.lpi.usra.edu/meteor/metbull.php?code=3")
        );
        assert_eq!(table.rows[2].cells[5].text, "N/A");
        assert_eq!(table.rows[2].cells[3].text, "Unknown");
    }

    #[test]
    fn test_sort_mass_by_magnitude() {
        let records = meteorites();
        let refs: Vec<&MeteoriteRecord> = records.iter().collect();
        let mut table = meteorite_table(&refs);

        table.sort("Mass", SortDirection::Desc).unwrap();
        assert_eq!(names(&table), vec!["allende", "Zagora", "Bali"]);
        // Row indices still point into the filtered list.
        assert_eq!(table.rows[0].index, 1);
    }

    #[test]
    fn test_sort_text_case_insensitive() {
        let records = meteorites();
        let refs: Vec<&MeteoriteRecord> = records.iter().collect();
        let mut table = meteorite_table(&refs);

        table.sort("Name", SortDirection::Asc).unwrap();
        assert_eq!(names(&table), vec!["allende", "Bali", "Zagora"]);
    }

    #[test]
    fn test_sort_link_column_is_noop() {
        let records = meteorites();
        let refs: Vec<&MeteoriteRecord> = records.iter().collect();
        let mut table = meteorite_table(&refs);
        table.sort("MetBull", SortDirection::Desc).unwrap();
        assert_eq!(names(&table), vec!["Zagora", "allende", "Bali"]);
    }

    #[test]
    fn test_sort_unknown_column() {
        let mut table = meteorite_table(&[]);
        let err = table.sort("Colour", SortDirection::Asc).unwrap_err();
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_search() {
        let records = meteorites();
        let refs: Vec<&MeteoriteRecord> = records.iter().collect();
        let mut table = meteorite_table(&refs);
        table.search("ALL");
        assert_eq!(names(&table), vec!["allende"]);
    }

    #[test]
    fn test_sort_mixed_column_is_consistent() {
        let texts = ["10", "abc", "2.5.1", "9", "Unknown", "-3 km"];
        let mut table = Table {
            columns: vec![Column {
                label: "Notes".to_string(),
                sortable: true,
            }],
            rows: texts
                .iter()
                .enumerate()
                .map(|(index, t)| Row {
                    index,
                    cells: vec![Cell::text(*t)],
                })
                .collect(),
        };

        table.sort("Notes", SortDirection::Asc).unwrap();
        assert_eq!(names(&table), vec!["-3 km", "9", "10", "2.5.1", "abc", "Unknown"]);

        table.sort("Notes", SortDirection::Desc).unwrap();
        assert_eq!(names(&table), vec!["Unknown", "abc", "2.5.1", "10", "9", "-3 km"]);

        // Every pair agrees with its reverse.
        let cells: Vec<Cell> = texts.iter().map(|t| Cell::text(*t)).collect();
        for a in &cells {
            for b in &cells {
                assert_eq!(compare_cells(a, b), compare_cells(b, a).reverse());
            }
        }
    }

    #[test]
    fn test_keyed_cells_sort_before_unkeyed() {
        let a = Cell::keyed("1.00 kg", Some(1000.0));
        let b = Cell::text("Unknown");
        let c = Cell::text("5");
        assert_eq!(compare_cells(&a, &b), Ordering::Less);
        assert_eq!(compare_cells(&a, &c), Ordering::Less);
        assert_eq!(compare_cells(&c, &b), Ordering::Less);
    }

    #[test]
    fn test_numeric_part() {
        assert_eq!(numeric_part("1.91 kg"), Some(1.91));
        assert_eq!(numeric_part("-12 km"), Some(-12.0));
        assert_eq!(numeric_part("Unknown"), None);
    }

    #[test]
    fn test_crater_table_columns() {
        let collection = impact_common::CraterCollection::from_geojson_str(
            &json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [1.0, 2.0]},
                    "properties": {"No": 7, "Name": "Test", "Age [Myr]": "5±1",
                                   "Crater diamter [km]": "12", "Target": "Mixed",
                                   "age_min": 4, "age_max": 6}
                }]
            })
            .to_string(),
            2500.0,
        )
        .unwrap();
        let refs: Vec<&CraterRecord> = collection.iter().collect();
        let table = crater_table(&refs, &collection.property_names());

        let labels: Vec<&str> = table.columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Name",
                "Continent",
                "Country",
                "Age [Myr]",
                "Crater diameter [km]",
                "Crater type",
                "No",
                "Target"
            ]
        );
        let row = &table.rows[0];
        assert_eq!(
            row.cells[0].link.as_deref(),
            Some("https://impact-craters.com/craters_id7")
        );
        assert_eq!(row.cells[1].text, "Unknown");
        assert_eq!(row.cells[4].text, "12");
        assert_eq!(row.cells[7].text, "Mixed");
    }
}
