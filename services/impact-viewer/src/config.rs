//! Service configuration: environment variables plus an optional YAML file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use impact_common::DEFAULT_AGE_CEILING_MYR;
use impact_pipeline::{ColorScheme, MissingValues, SchemeSet, ViewSettings};
use serde::{Deserialize, Serialize};

pub const TOKEN_VAR: &str = "CESIUM_ION_ACCESS_TOKEN";
pub const DEFAULT_CRATER_PATH: &str = "data/impact_craters.geojson";
pub const DEFAULT_METEORITE_URL: &str = "https://data.nasa.gov/resource/gh4g-9sfh.json";
pub const DEFAULT_METEORITE_LIMIT: usize = 50_000;
pub const DEFAULT_VIEWER_CONFIG: &str = "config/viewer.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("CESIUM_ION_ACCESS_TOKEN is not set")]
    MissingToken,

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: &'static str, message: String },
}

/// Settings read from the process environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub cesium_token: String,
    pub crater_path: PathBuf,
    pub meteorite_url: String,
    pub meteorite_limit: usize,
    pub refresh_interval: Option<Duration>,
    pub viewer_config_path: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cesium_token = lookup(TOKEN_VAR)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let meteorite_limit = match lookup("METEORITE_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    var: "METEORITE_LIMIT",
                    message: format!("expected a positive integer, got '{}'", raw),
                })?,
            None => DEFAULT_METEORITE_LIMIT,
        };

        let refresh_interval = match lookup("METEORITE_REFRESH_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                    var: "METEORITE_REFRESH_SECS",
                    message: e.to_string(),
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            cesium_token,
            crater_path: lookup("CRATER_GEOJSON_PATH")
                .unwrap_or_else(|| DEFAULT_CRATER_PATH.to_string())
                .into(),
            meteorite_url: lookup("METEORITE_API_URL")
                .unwrap_or_else(|| DEFAULT_METEORITE_URL.to_string()),
            meteorite_limit,
            refresh_interval,
            viewer_config_path: lookup("IMPACT_VIEWER_CONFIG")
                .unwrap_or_else(|| DEFAULT_VIEWER_CONFIG.to_string())
                .into(),
        })
    }
}

/// Page feature toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureToggles {
    pub clustering: bool,
    pub crater_filters: bool,
    pub heatmap: bool,
    pub search: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            clustering: true,
            crater_filters: true,
            heatmap: false,
            search: true,
        }
    }
}

/// Marker clustering on the globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterSettings {
    pub pixel_range: u32,
    pub minimum_cluster_size: u32,
    /// Clustering is switched off when the camera is lower than this.
    pub disable_below_altitude_m: f64,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            pixel_range: 45,
            minimum_cluster_size: 10,
            disable_below_altitude_m: 500_000.0,
        }
    }
}

/// Viewer configuration loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub features: FeatureToggles,

    #[serde(default = "default_scheme")]
    pub default_meteorite_scheme: String,

    #[serde(default = "default_scheme")]
    pub default_crater_scheme: String,

    /// Upper end used for crater ages without one, in Myr.
    #[serde(default = "default_age_ceiling")]
    pub age_ceiling_myr: f64,

    #[serde(default)]
    pub missing_values: MissingValues,

    #[serde(default)]
    pub cluster: ClusterSettings,

    /// Extra schemes; a scheme named like a built-in replaces it.
    #[serde(default)]
    pub color_schemes: Vec<ColorScheme>,
}

fn default_title() -> String {
    "Meteorite Landings and Impact Craters".to_string()
}

fn default_scheme() -> String {
    "Classic".to_string()
}

fn default_age_ceiling() -> f64 {
    DEFAULT_AGE_CEILING_MYR
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            features: FeatureToggles::default(),
            default_meteorite_scheme: default_scheme(),
            default_crater_scheme: default_scheme(),
            age_ceiling_myr: default_age_ceiling(),
            missing_values: MissingValues::default(),
            cluster: ClusterSettings::default(),
            color_schemes: Vec::new(),
        }
    }
}

impl ViewerConfig {
    /// Load from a YAML file. A missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Viewer config file does not exist, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse viewer config: {:?}", path))?;

        tracing::info!(
            path = %path.display(),
            extra_schemes = config.color_schemes.len(),
            "Loaded viewer config"
        );
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.age_ceiling_myr.is_finite() || self.age_ceiling_myr <= 0.0 {
            anyhow::bail!(
                "age_ceiling_myr must be a positive number, got {}",
                self.age_ceiling_myr
            );
        }
        Ok(())
    }

    /// Presentation settings for the view store, with extra schemes merged
    /// into the built-ins and both defaults checked.
    pub fn view_settings(&self) -> Result<ViewSettings> {
        let mut schemes = SchemeSet::builtin();
        schemes.extend(self.color_schemes.clone())?;

        let settings = ViewSettings {
            schemes,
            default_meteorite_scheme: self.default_meteorite_scheme.clone(),
            default_crater_scheme: self.default_crater_scheme.clone(),
            missing_values: self.missing_values,
            ..ViewSettings::default()
        };
        settings
            .validate()
            .context("Default colour scheme is not defined")?;
        Ok(settings)
    }
}
