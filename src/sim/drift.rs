//! Drift-segment planning and application for sensor-fault scenarios.

use chrono::{DateTime, TimeDelta, Utc};

use crate::sim::types::{Channel, Reading, Scenario, round3};

/// Uplift during an active minor-drift segment (percent).
const MINOR_DRIFT_PERCENT: f64 = 10.0;
/// Uplift across a persistent-drift run (percent).
const PERSISTENT_DRIFT_PERCENT: f64 = 30.0;
/// Smallest minor-drift chunk, in hours.
const MIN_CHUNK_HOURS: i64 = 6;

/// Half-open time interval carrying a constant drift uplift.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftSegment {
    /// Segment start (inclusive).
    pub from: DateTime<Utc>,
    /// Segment end (exclusive).
    pub to: DateTime<Utc>,
    /// Multiplicative uplift in percent; 0 means identity.
    pub drift_percent: f64,
}

impl DriftSegment {
    /// Whether `ts` falls inside the segment.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.from && ts < self.to
    }
}

/// Builds the drift schedule for `scenario` over `[start, start + hours)`.
///
/// Hours not covered by any segment carry zero drift implicitly.
/// `MINOR_DRIFT` alternates active chunks of `max(6, hours / 6)` hours with
/// half-chunk quiet gaps; `PERSISTENT_DRIFT` and `SEASON_BASE` each cover
/// the whole range with a single segment.
pub fn drift_plan(scenario: Scenario, start: DateTime<Utc>, hours: u32) -> Vec<DriftSegment> {
    let end = start + TimeDelta::hours(i64::from(hours));
    match scenario {
        Scenario::SeasonBase => vec![DriftSegment {
            from: start,
            to: end,
            drift_percent: 0.0,
        }],
        Scenario::MinorDrift => {
            let chunk = MIN_CHUNK_HOURS.max(i64::from(hours) / 6);
            let mut plan = Vec::new();
            let mut t = start;
            while t < end {
                let t2 = t + TimeDelta::hours(chunk);
                plan.push(DriftSegment {
                    from: t,
                    to: t2,
                    drift_percent: MINOR_DRIFT_PERCENT,
                });
                t = t2 + TimeDelta::hours(chunk / 2);
            }
            plan
        }
        Scenario::PersistentDrift => vec![DriftSegment {
            from: start,
            to: end,
            drift_percent: PERSISTENT_DRIFT_PERCENT,
        }],
    }
}

/// Drift percent applicable at `ts`: first matching segment wins, no match
/// means zero. Segments are few, so a linear scan is fine.
pub fn drift_percent_at(plan: &[DriftSegment], ts: DateTime<Utc>) -> f64 {
    plan.iter()
        .find(|seg| seg.contains(ts))
        .map_or(0.0, |seg| seg.drift_percent)
}

/// Multiplies the hour's `ITP_CW` volume by the drift uplift, re-rounding
/// to three decimals. Building-level channels stay untouched, which is the
/// discrepancy a downstream anomaly detector looks for.
pub fn apply_itp_drift(readings: &mut [Reading], drift_percent: f64) {
    if drift_percent == 0.0 {
        return;
    }
    let k = 1.0 + drift_percent / 100.0;
    for r in readings.iter_mut() {
        if r.channel == Channel::ItpCw {
            r.volume_m3 = round3(r.volume_m3 * k);
        }
    }
}
