//! API response and query types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::runner::RunReport;
use crate::sim::types::{Channel, Mode, Scenario, Season};

/// Liveness response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Server time at response.
    pub ts: DateTime<Utc>,
}

/// Combined state response: run summary plus the stored row count.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    /// Building the run generated for.
    pub building_id: String,
    /// Run mode.
    pub mode: Mode,
    /// Season adjustment in effect.
    pub season: Season,
    /// Drift scenario in effect.
    pub scenario: Scenario,
    /// Range start (inclusive).
    pub from: DateTime<Utc>,
    /// Range end (exclusive).
    pub to: DateTime<Utc>,
    /// Rows handed to the store during the run.
    pub inserted: usize,
    /// Distinct rows held after upsert.
    pub reading_count: usize,
}

impl StateResponse {
    /// Builds the response from the run report and the stored readings.
    pub fn new(report: &RunReport, building_id: &str, reading_count: usize) -> Self {
        Self {
            building_id: building_id.to_string(),
            mode: report.mode,
            season: report.season,
            scenario: report.scenario,
            from: report.from,
            to: report.to,
            inserted: report.inserted,
            reading_count,
        }
    }
}

/// Optional filters for the readings endpoint.
#[derive(Debug, Deserialize)]
pub struct ReadingsQuery {
    /// Earliest timestamp to include (inclusive, RFC3339).
    pub from: Option<DateTime<Utc>>,
    /// Latest timestamp to include (inclusive, RFC3339).
    pub to: Option<DateTime<Utc>>,
    /// Restrict to one channel.
    pub channel: Option<Channel>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
