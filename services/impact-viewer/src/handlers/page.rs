//! Page handler.

use std::sync::Arc;

use axum::{
    extract::Extension,
    response::{Html, IntoResponse, Response},
};
use impact_common::ImpactError;
use tracing::error;

use super::error_response;
use crate::page::{render_page, PageConfiguration};
use crate::state::AppState;

/// GET / - the viewer page with token and configuration inlined
pub async fn index_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let snapshot = state.store.snapshot().await;
    let schemes = snapshot.settings().schemes.iter().collect();
    let configuration = PageConfiguration::new(&state.viewer, schemes, snapshot.options());

    match render_page(&state.server.cesium_token, &configuration) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render page");
            error_response(&ImpactError::Internal(e.to_string()))
        }
    }
}
