//! The viewer's data pipeline.
//!
//! Loader output flows through the filter engine into the presentation
//! mapper (markers, legends) and the ranking/table builders. Everything here
//! is a pure function over in-memory records; [`ViewStore`] holds the state
//! those functions run against.

pub mod chart;
pub mod classes;
pub mod color;
pub mod filter;
pub mod marker;
pub mod options;
pub mod range;
pub mod ranking;
pub mod scheme;
pub mod store;
pub mod table;

pub use chart::{PolarChart, CHART_TITLE};
pub use classes::{class_frequencies, class_group, ClassCount};
pub use color::Color;
pub use filter::{filter_craters, filter_meteorites, plottable, CraterFilter, MeteoriteFilter};
pub use marker::{crater_marker, format_mass, meteorite_marker, Description, Marker, SizeRule};
pub use options::{Bounds, FilterOptions, SliderBounds};
pub use range::{normalize, MissingValues, NumericRange, Selection};
pub use ranking::{crater_summary, meteorite_summary, top_n, RankedEntry, Summary, TOP_N};
pub use scheme::{ColorScheme, LegendEntry, SchemeError, SchemeSet, ThresholdScale};
pub use store::{CraterQuery, MeteoriteQuery, TableQuery, View, ViewSettings, ViewStore};
pub use table::{crater_table, meteorite_table, SortDirection, Table};
