//! Meteorite view endpoint.

use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, response::Response, Json};
use impact_pipeline::MeteoriteQuery;
use metrics::counter;
use tracing::{debug, instrument};

use super::{error_response, ViewRequest, ViewResponse};
use crate::state::AppState;

/// POST /api/meteorites/view
#[instrument(skip_all, fields(seq = request.seq))]
pub async fn meteorite_view_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<ViewRequest<MeteoriteQuery>>,
) -> Response {
    counter!("impact_view_requests_total", "dataset" => "meteorites").increment(1);

    let snapshot = state.store.snapshot().await;
    match snapshot.meteorite_view(&request.query) {
        Ok(view) => {
            debug!(
                generation = view.generation,
                total = view.summary.total,
                markers = view.markers.len(),
                "Meteorite view computed"
            );
            Json(ViewResponse {
                seq: request.seq,
                view,
            })
            .into_response()
        }
        Err(e) => error_response(&e),
    }
}
