//! Stats handler
//!
//! Serves the per-author aggregate. The body is the cached JSON blob as
//! stored, so it is written out without re-encoding.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use kekboard_service::StatsService;

use crate::response::ApiResult;
use crate::state::AppState;

/// Per-author reaction totals, highest first
///
/// GET /stats
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Response> {
    let bytes = StatsService::new(state.service_context()).read().await?;

    Ok(([(header::CONTENT_TYPE, "application/json")], bytes).into_response())
}
