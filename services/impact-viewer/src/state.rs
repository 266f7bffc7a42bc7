//! Application state for the viewer service.

use std::sync::Arc;

use anyhow::Result;
use impact_common::CraterCollection;
use impact_pipeline::ViewStore;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::{ServerConfig, ViewerConfig};
use crate::craters::load_craters;
use crate::loader::{MeteoriteLoader, MeteoriteStore};

/// Shared application state.
pub struct AppState {
    pub server: ServerConfig,

    /// Page title, toggles and presentation defaults.
    pub viewer: ViewerConfig,

    /// Loaded data behind the view endpoints.
    pub store: Arc<MeteoriteStore>,

    pub loader: Arc<MeteoriteLoader>,

    /// Renders `/metrics`; absent when no recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Load the viewer config and the crater file named by `server`.
    pub fn new(server: ServerConfig, prometheus: Option<PrometheusHandle>) -> Result<Self> {
        let viewer = ViewerConfig::load_from_path(&server.viewer_config_path)?;
        let craters = load_craters(&server.crater_path, viewer.age_ceiling_myr);
        Self::with_parts(server, viewer, craters, prometheus)
    }

    /// Assemble state from already-loaded pieces.
    pub fn with_parts(
        server: ServerConfig,
        viewer: ViewerConfig,
        craters: CraterCollection,
        prometheus: Option<PrometheusHandle>,
    ) -> Result<Self> {
        let settings = viewer.view_settings()?;
        let store = MeteoriteStore::new(ViewStore::new(craters, settings));
        let loader = MeteoriteLoader::new(server.meteorite_url.clone(), server.meteorite_limit)?;

        Ok(Self {
            server,
            viewer,
            store: Arc::new(store),
            loader: Arc::new(loader),
            prometheus,
        })
    }
}
