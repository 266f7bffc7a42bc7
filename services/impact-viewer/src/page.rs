//! The single viewer page: one template, parameterised by configuration.

use impact_pipeline::marker::escape_html;
use impact_pipeline::{ColorScheme, FilterOptions, MissingValues};
use serde::Serialize;

use crate::config::{ClusterSettings, FeatureToggles, ViewerConfig};

const TEMPLATE: &str = include_str!("../templates/index.html");

/// Everything the page script reads from `CONFIG`.
#[derive(Debug, Serialize)]
pub struct PageConfiguration<'a> {
    pub title: &'a str,
    pub features: &'a FeatureToggles,
    pub cluster: &'a ClusterSettings,
    pub schemes: Vec<&'a ColorScheme>,
    pub default_meteorite_scheme: &'a str,
    pub default_crater_scheme: &'a str,
    pub missing_values: MissingValues,
    pub options: FilterOptions,
}

impl<'a> PageConfiguration<'a> {
    pub fn new(
        viewer: &'a ViewerConfig,
        schemes: Vec<&'a ColorScheme>,
        options: FilterOptions,
    ) -> Self {
        Self {
            title: &viewer.title,
            features: &viewer.features,
            cluster: &viewer.cluster,
            schemes,
            default_meteorite_scheme: &viewer.default_meteorite_scheme,
            default_crater_scheme: &viewer.default_crater_scheme,
            missing_values: viewer.missing_values,
            options,
        }
    }
}

/// JSON safe to place inside a `<script>` element.
pub fn script_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029"))
}

pub fn render_page(
    token: &str,
    configuration: &PageConfiguration<'_>,
) -> Result<String, serde_json::Error> {
    Ok(TEMPLATE
        .replace("__TITLE__", &escape_html(configuration.title))
        .replace("__CESIUM_TOKEN_JSON__", &script_json(&token)?)
        .replace("__CONFIGURATION_JSON__", &script_json(configuration)?))
}
