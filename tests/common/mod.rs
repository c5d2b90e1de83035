//! Shared test fixtures for integration tests.

use chrono::{DateTime, TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use meter_sim::sim::types::{BuildingProfile, Topology};

/// Midnight UTC on a fixed winter day.
pub fn range_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
}

/// Default circulation profile (8 m³/h base, stock factors).
pub fn circulation_profile() -> BuildingProfile {
    BuildingProfile::new("building-circ", Topology::Circulation, 8.0)
}

/// Default dead-end profile (8 m³/h base, stock factors).
pub fn dead_end_profile() -> BuildingProfile {
    BuildingProfile::new("building-dead", Topology::DeadEnd, 8.0)
}

/// Deterministic random source for reproducible assertions.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
