use std::sync::Arc;

use axum::{extract::Extension, Json};
use impact_pipeline::FilterOptions;

use crate::state::AppState;

/// GET /api/options - dropdown values and slider bounds for the loaded data
pub async fn options_handler(Extension(state): Extension<Arc<AppState>>) -> Json<FilterOptions> {
    Json(state.store.snapshot().await.options())
}
