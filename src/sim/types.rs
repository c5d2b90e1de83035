//! Core generation types: building profiles, channels, readings, and
//! scenario selectors.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default multiplicative noise fraction (±8%).
pub const DEFAULT_NOISE_FRACTION: f64 = 0.08;
/// Default night-window multiplier.
pub const DEFAULT_NIGHT_FACTOR: f64 = 0.8;
/// Default peak-window multiplier.
pub const DEFAULT_PEAK_FACTOR: f64 = 1.3;
/// Floor for a season-adjusted base volume; avoids degenerate zero-flow
/// series.
pub const MIN_BASE_M3_PER_HOUR: f64 = 0.2;

/// Metering topology of a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Closed supply/return loop; two building-level channels.
    Circulation,
    /// Single consumption channel, no return loop.
    DeadEnd,
}

impl Topology {
    /// Parses a topology tag as it appears in config files.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "circulation" => Some(Self::Circulation),
            "dead_end" => Some(Self::DeadEnd),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circulation => "circulation",
            Self::DeadEnd => "dead_end",
        }
    }

    /// Readings emitted per generated hour: ITP plus the building-level
    /// channel(s).
    pub fn channels_per_hour(self) -> usize {
        match self {
            Self::Circulation => 3,
            Self::DeadEnd => 2,
        }
    }
}

/// Meter channel a reading originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Apartment-level cold-water meter.
    #[serde(rename = "ITP_CW")]
    ItpCw,
    /// Building-level supply meter (circulation topology).
    #[serde(rename = "ODPU_SUPPLY")]
    OdpuSupply,
    /// Building-level return meter (circulation topology).
    #[serde(rename = "ODPU_RETURN")]
    OdpuReturn,
    /// Building-level consumption meter (dead-end topology).
    #[serde(rename = "ODPU_CONSUMPTION")]
    OdpuConsumption,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ItpCw => "ITP_CW",
            Self::OdpuSupply => "ODPU_SUPPLY",
            Self::OdpuReturn => "ODPU_RETURN",
            Self::OdpuConsumption => "ODPU_CONSUMPTION",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Season selector for profile adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Season {
    Winter,
    Summer,
}

impl Season {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "WINTER" => Some(Self::Winter),
            "SUMMER" => Some(Self::Summer),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Winter => "WINTER",
            Self::Summer => "SUMMER",
        }
    }

    /// Seasonal scaling applied to the base hourly volume.
    pub fn coefficient(self) -> f64 {
        match self {
            Self::Winter => 1.25,
            Self::Summer => 0.85,
        }
    }
}

/// Drift scenario applied over a generated range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scenario {
    /// No perturbation; season adjustment only.
    SeasonBase,
    /// Intermittent 10% uplift on the apartment channel.
    MinorDrift,
    /// Constant 30% uplift on the apartment channel.
    PersistentDrift,
}

impl Scenario {
    /// Maps a scenario name to a scenario. Unknown names fall back to
    /// `SEASON_BASE`.
    pub fn from_name(s: &str) -> Self {
        match s {
            "MINOR_DRIFT" => Self::MinorDrift,
            "PERSISTENT_DRIFT" => Self::PersistentDrift,
            _ => Self::SeasonBase,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SeasonBase => "SEASON_BASE",
            Self::MinorDrift => "MINOR_DRIFT",
            Self::PersistentDrift => "PERSISTENT_DRIFT",
        }
    }
}

/// Run mode: realtime ticking or one of the batch spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Realtime,
    BatchDay,
    BatchWeek,
}

impl Mode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "realtime" => Some(Self::Realtime),
            "batch_day" => Some(Self::BatchDay),
            "batch_week" => Some(Self::BatchWeek),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Realtime => "realtime",
            Self::BatchDay => "batch_day",
            Self::BatchWeek => "batch_week",
        }
    }

    /// Hours generated by a run in this mode, absent an explicit override.
    /// Realtime generates one hour per tick.
    pub fn default_hours(self) -> u32 {
        match self {
            Self::Realtime => 1,
            Self::BatchDay => 24,
            Self::BatchWeek => 24 * 7,
        }
    }
}

/// One building's metering topology and baseline demand behavior.
///
/// `base_m3_per_hour` must be non-negative; the generator does not validate
/// it (constrained upstream by config validation).
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingProfile {
    /// Opaque building identifier.
    pub building_id: String,
    /// Metering topology.
    pub topology: Topology,
    /// Baseline hourly volume (m³/h) before seasonal/diurnal/noise
    /// adjustment.
    pub base_m3_per_hour: f64,
    /// Fractional multiplicative noise, e.g. 0.08 for ±8%.
    pub noise_fraction: f64,
    /// Multiplier applied during the night window (hours 0–5).
    pub night_factor: f64,
    /// Multiplier applied during peak windows.
    pub peak_factor: f64,
}

impl BuildingProfile {
    /// Creates a profile with the default noise, night, and peak factors.
    pub fn new(building_id: impl Into<String>, topology: Topology, base_m3_per_hour: f64) -> Self {
        Self {
            building_id: building_id.into(),
            topology,
            base_m3_per_hour,
            noise_fraction: DEFAULT_NOISE_FRACTION,
            night_factor: DEFAULT_NIGHT_FACTOR,
            peak_factor: DEFAULT_PEAK_FACTOR,
        }
    }
}

/// Derives a season-adjusted profile: base volume scaled by the season
/// coefficient and floored at [`MIN_BASE_M3_PER_HOUR`].
pub fn make_season_profile(base: &BuildingProfile, season: Season) -> BuildingProfile {
    BuildingProfile {
        base_m3_per_hour: (base.base_m3_per_hour * season.coefficient()).max(MIN_BASE_M3_PER_HOUR),
        ..base.clone()
    }
}

/// One hourly measurement for a single channel.
///
/// `ts` is expected hour-aligned in UTC by downstream consumers; the
/// generator emits whatever instant the caller supplied, advanced in whole
/// hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Measurement instant (UTC).
    pub ts: DateTime<Utc>,
    /// Building the reading belongs to.
    pub building_id: String,
    /// Originating meter channel.
    pub channel: Channel,
    /// Volume in cubic meters, rounded to 3 decimals, >= 0.
    pub volume_m3: f64,
    /// Optional water temperature placeholder; the generator leaves it
    /// unset.
    pub t_celsius: Option<f64>,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:<16} {:>9.3} m3",
            self.ts.format("%Y-%m-%dT%H:%MZ"),
            self.building_id,
            self.channel,
            self.volume_m3,
        )
    }
}

/// Rounds a volume to 3 decimal places.
pub fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
