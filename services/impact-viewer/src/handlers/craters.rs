//! Crater view endpoint.

use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, response::Response, Json};
use impact_pipeline::CraterQuery;
use metrics::counter;
use tracing::instrument;

use super::{error_response, ViewRequest, ViewResponse};
use crate::state::AppState;

/// POST /api/craters/view
#[instrument(skip_all, fields(seq = request.seq))]
pub async fn crater_view_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<ViewRequest<CraterQuery>>,
) -> Response {
    counter!("impact_view_requests_total", "dataset" => "craters").increment(1);

    let snapshot = state.store.snapshot().await;
    match snapshot.crater_view(&request.query) {
        Ok(view) => Json(ViewResponse {
            seq: request.seq,
            view,
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}
