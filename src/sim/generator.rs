//! Hour-by-hour range generation composing the demand model, channel
//! synthesizer, and drift planner.

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;

use crate::sim::channels::synthesize;
use crate::sim::demand::intensity;
use crate::sim::drift::{apply_itp_drift, drift_percent_at, drift_plan};
use crate::sim::types::{BuildingProfile, Reading, Scenario};

/// Generates the readings for a single hour: demand model first, then
/// channel synthesis.
pub fn generate_hour<R: Rng + ?Sized>(
    profile: &BuildingProfile,
    ts: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Reading> {
    let true_m3 = intensity(profile, ts, rng);
    synthesize(profile, true_m3, ts, rng)
}

/// Generates `hours` consecutive hourly slices starting at `start`.
///
/// Output is strictly chronological; within an hour the channel order is
/// fixed (`ITP_CW` first). `hours = 0` yields an empty sequence. `start`
/// is taken as-is; hour alignment is the caller's concern.
pub fn generate_range<R: Rng + ?Sized>(
    profile: &BuildingProfile,
    start: DateTime<Utc>,
    hours: u32,
    rng: &mut R,
) -> Vec<Reading> {
    let mut out = Vec::with_capacity(hours as usize * profile.topology.channels_per_hour());
    for i in 0..i64::from(hours) {
        out.extend(generate_hour(profile, start + TimeDelta::hours(i), rng));
    }
    out
}

/// Scenario-aware generation: plans the drift schedule once, then walks the
/// range hour by hour, perturbing each hour's `ITP_CW` reading by the
/// segment in effect.
pub fn generate_range_with_scenario<R: Rng + ?Sized>(
    profile: &BuildingProfile,
    start: DateTime<Utc>,
    hours: u32,
    scenario: Scenario,
    rng: &mut R,
) -> Vec<Reading> {
    let plan = drift_plan(scenario, start, hours);
    let mut out = Vec::with_capacity(hours as usize * profile.topology.channels_per_hour());
    for i in 0..i64::from(hours) {
        let ts = start + TimeDelta::hours(i);
        let mut readings = generate_hour(profile, ts, rng);
        apply_itp_drift(&mut readings, drift_percent_at(&plan, ts));
        out.extend(readings);
    }
    out
}
