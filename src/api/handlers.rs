//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;

use super::AppState;
use super::types::{ErrorResponse, HealthResponse, ReadingsQuery, StateResponse};
use crate::sim::types::Reading;

/// Liveness probe.
///
/// `GET /healthz` → 200 + `HealthResponse` JSON
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        ts: Utc::now(),
    })
}

/// Returns the run summary and stored row count.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse::new(
        &state.report,
        &state.building_id,
        state.readings.len(),
    ))
}

/// Returns stored readings, optionally filtered by timestamp range and
/// channel.
///
/// `GET /readings` → 200 + `Vec<Reading>` JSON
/// `GET /readings?from=..&to=..&channel=ITP_CW` → filtered (inclusive)
/// `GET /readings?from=T2&to=T1` with `T2 > T1` → 400 + `ErrorResponse`
pub async fn get_readings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReadingsQuery>,
) -> impl IntoResponse {
    if let (Some(from), Some(to)) = (query.from, query.to)
        && from > to
    {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let rows: Vec<Reading> = state
        .readings
        .iter()
        .filter(|r| query.from.is_none_or(|from| r.ts >= from))
        .filter(|r| query.to.is_none_or(|to| r.ts <= to))
        .filter(|r| query.channel.is_none_or(|c| r.channel == c))
        .cloned()
        .collect();

    Ok(Json(rows))
}
