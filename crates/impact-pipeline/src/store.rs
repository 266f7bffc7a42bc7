//! Explicit state container for the viewer.
//!
//! `ViewStore` owns the loaded datasets and the presentation settings. Every
//! view is a pure recomputation over a snapshot: filter, map to markers,
//! rank, tabulate. Meteorite snapshots are tagged with the generation of the
//! load that produced them; an older load can never replace a newer one.

use std::sync::Arc;

use impact_common::{CraterCollection, ImpactError, MeteoriteRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::filter::{filter_craters, filter_meteorites, CraterFilter, MeteoriteFilter};
use crate::marker::{crater_marker, meteorite_marker, Marker, SizeRule};
use crate::options::FilterOptions;
use crate::range::MissingValues;
use crate::ranking::{crater_summary, meteorite_summary, Summary};
use crate::scheme::{ColorScheme, LegendEntry, SchemeSet};
use crate::table::{crater_table, meteorite_table, SortDirection, Table};

/// Search and sort applied to the "view all" table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub direction: SortDirection,
}

impl TableQuery {
    fn apply(&self, table: &mut Table) -> Result<(), ImpactError> {
        if let Some(query) = &self.search {
            table.search(query);
        }
        if let Some(column) = &self.sort {
            table.sort(column, self.direction)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteoriteQuery {
    pub filter: MeteoriteFilter,
    /// Scheme name; the store default when absent.
    pub scheme: Option<String>,
    /// Overrides the configured missing-value policy.
    pub missing: Option<MissingValues>,
    pub table: TableQuery,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CraterQuery {
    pub filter: CraterFilter,
    pub scheme: Option<String>,
    /// Overrides the configured missing-value policy for diameters.
    pub missing: Option<MissingValues>,
    pub table: TableQuery,
}

/// Everything the page needs to redraw one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    /// Load generation of the data this view was computed from.
    pub generation: u64,
    pub scheme: String,
    pub markers: Vec<Marker>,
    pub summary: Summary,
    pub table: Table,
    pub legend: Vec<LegendEntry>,
}

/// Presentation settings shared by every view.
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub schemes: SchemeSet,
    pub default_meteorite_scheme: String,
    pub default_crater_scheme: String,
    pub missing_values: MissingValues,
    pub meteorite_sizes: SizeRule,
    pub crater_sizes: SizeRule,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            schemes: SchemeSet::builtin(),
            default_meteorite_scheme: "Classic".to_string(),
            default_crater_scheme: "Classic".to_string(),
            missing_values: MissingValues::default(),
            meteorite_sizes: SizeRule::meteorite_default(),
            crater_sizes: SizeRule::crater_default(),
        }
    }
}

impl ViewSettings {
    /// Both default schemes must exist in the scheme set.
    pub fn validate(&self) -> Result<(), ImpactError> {
        self.schemes.get(&self.default_meteorite_scheme)?;
        self.schemes.get(&self.default_crater_scheme)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ViewStore {
    meteorites: Arc<[MeteoriteRecord]>,
    generation: u64,
    craters: Arc<CraterCollection>,
    crater_columns: Arc<[String]>,
    settings: Arc<ViewSettings>,
}

impl ViewStore {
    /// An empty meteorite set at generation 0 plus the given craters.
    pub fn new(craters: CraterCollection, settings: ViewSettings) -> Self {
        let crater_columns = craters.property_names().into();
        Self {
            meteorites: Arc::from(Vec::new()),
            generation: 0,
            craters: Arc::new(craters),
            crater_columns,
            settings: Arc::new(settings),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn meteorites(&self) -> &[MeteoriteRecord] {
        &self.meteorites
    }

    pub fn craters(&self) -> &CraterCollection {
        &self.craters
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    /// Replace the meteorites if `generation` is newer than the committed
    /// one. Returns whether the records were committed.
    pub fn commit_meteorites(&mut self, records: Vec<MeteoriteRecord>, generation: u64) -> bool {
        if generation <= self.generation {
            debug!(
                generation,
                committed = self.generation,
                "Discarding stale meteorite load"
            );
            return false;
        }
        info!(generation, records = records.len(), "Committing meteorite load");
        self.meteorites = records.into();
        self.generation = generation;
        true
    }

    fn scheme(&self, requested: Option<&str>, fallback: &str) -> Result<&ColorScheme, ImpactError> {
        self.settings.schemes.get(requested.unwrap_or(fallback))
    }

    pub fn meteorite_view(&self, query: &MeteoriteQuery) -> Result<View, ImpactError> {
        let settings = &self.settings;
        let scheme = self.scheme(query.scheme.as_deref(), &settings.default_meteorite_scheme)?;
        let missing = query.missing.unwrap_or(settings.missing_values);

        let filtered = filter_meteorites(&self.meteorites, &query.filter, missing);
        let markers = filtered
            .iter()
            .enumerate()
            .filter_map(|(i, m)| meteorite_marker(i, m, &scheme.meteorite, &settings.meteorite_sizes))
            .collect();

        let mut table = meteorite_table(&filtered);
        query.table.apply(&mut table)?;

        Ok(View {
            generation: self.generation,
            scheme: scheme.name.clone(),
            markers,
            summary: meteorite_summary(&filtered),
            table,
            legend: scheme.meteorite.legend(|g| format!("{} kg", g / 1000.0)),
        })
    }

    pub fn crater_view(&self, query: &CraterQuery) -> Result<View, ImpactError> {
        let settings = &self.settings;
        let scheme = self.scheme(query.scheme.as_deref(), &settings.default_crater_scheme)?;

        let missing = query.missing.unwrap_or(settings.missing_values);

        let filtered = filter_craters(&self.craters.features, &query.filter, missing);
        let markers = filtered
            .iter()
            .enumerate()
            .filter_map(|(i, c)| crater_marker(i, c, &scheme.crater, &settings.crater_sizes))
            .collect();

        let mut table = crater_table(&filtered, &self.crater_columns);
        query.table.apply(&mut table)?;

        Ok(View {
            generation: self.generation,
            scheme: scheme.name.clone(),
            markers,
            summary: crater_summary(&filtered),
            table,
            legend: scheme.crater.legend(|d| format!("{} km", d)),
        })
    }

    pub fn options(&self) -> FilterOptions {
        FilterOptions::collect(&self.meteorites, &self.craters.features)
    }
}
