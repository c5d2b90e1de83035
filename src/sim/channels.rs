//! Per-channel reading synthesis from the true hourly consumption.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::sim::demand::jitter;
use crate::sim::types::{BuildingProfile, Channel, Reading, Topology, round3};

/// Building-level supply meters read high relative to true consumption.
const SUPPLY_OVERSHOOT: f64 = 1.15;
/// The apartment meter tracks true consumption more tightly than the
/// building meter; its noise fraction is scaled down by this factor.
const ITP_NOISE_SCALE: f64 = 0.6;
/// Noise fraction of the return-channel balance term.
const RETURN_NOISE: f64 = 0.02;

/// Synthesizes one hour of readings for `profile` from the true consumed
/// volume `true_m3`.
///
/// Circulation topology yields `ITP_CW`, `ODPU_SUPPLY`, `ODPU_RETURN`;
/// dead-end yields `ITP_CW`, `ODPU_CONSUMPTION`, with `ITP_CW` always
/// first. Volumes are rounded to three decimals and never negative. The
/// return channel is the supply minus true consumption, floored at zero.
pub fn synthesize<R: Rng + ?Sized>(
    profile: &BuildingProfile,
    true_m3: f64,
    ts: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Reading> {
    let noise = profile.noise_fraction;
    let itp = jitter(rng, true_m3, noise * ITP_NOISE_SCALE);

    let reading = |channel: Channel, volume: f64| Reading {
        ts,
        building_id: profile.building_id.clone(),
        channel,
        volume_m3: round3(volume),
        t_celsius: None,
    };

    match profile.topology {
        Topology::Circulation => {
            let supply = jitter(rng, true_m3 * SUPPLY_OVERSHOOT, noise);
            let ret = (supply - true_m3 + jitter(rng, 0.0, RETURN_NOISE)).max(0.0);
            vec![
                reading(Channel::ItpCw, itp),
                reading(Channel::OdpuSupply, supply),
                reading(Channel::OdpuReturn, ret),
            ]
        }
        Topology::DeadEnd => {
            let consumption = jitter(rng, true_m3, noise);
            vec![
                reading(Channel::ItpCw, itp),
                reading(Channel::OdpuConsumption, consumption),
            ]
        }
    }
}
