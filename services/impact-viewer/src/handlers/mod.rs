//! HTTP request handlers for the viewer.

pub mod craters;
pub mod health;
pub mod meteorites;
pub mod options;
pub mod page;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use impact_common::ImpactError;
use impact_pipeline::View;
use serde::{Deserialize, Serialize};

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub type_: &'static str,
    pub status: u16,
    pub detail: String,
}

fn error_type(err: &ImpactError) -> &'static str {
    match err {
        ImpactError::InvalidParameter { .. } => "InvalidParameter",
        ImpactError::SchemeNotFound(_) => "SchemeNotFound",
        ImpactError::UnknownColumn(_) => "UnknownColumn",
        ImpactError::MeteoriteDecode(_) => "MeteoriteDecode",
        ImpactError::GeoJson(_) => "GeoJson",
        ImpactError::Upstream(_) => "Upstream",
        ImpactError::NotLoaded(_) => "NotLoaded",
        ImpactError::Internal(_) => "Internal",
    }
}

pub fn error_response(err: &ImpactError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse {
        type_: error_type(err),
        status: status.as_u16(),
        detail: err.to_string(),
    };
    (status, Json(body)).into_response()
}

/// A view request: the query plus the page's request sequence number.
#[derive(Debug, Deserialize)]
pub struct ViewRequest<Q> {
    #[serde(default)]
    pub seq: Option<u64>,
    #[serde(flatten)]
    pub query: Q,
}

/// The computed view, echoing the request's sequence number so the page
/// can drop out-of-order responses.
#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub seq: Option<u64>,
    pub view: View,
}
