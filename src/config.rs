//! TOML-based simulator configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::sim::types::{
    BuildingProfile, Mode, Scenario, Season, Topology, make_season_profile,
};

/// Hard cap on an explicit hour override (one year).
const MAX_HOURS: u32 = 8760;

/// Top-level simulator configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from TOML
/// with [`SimulatorConfig::from_toml_file`] or use
/// [`SimulatorConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Run timing and global parameters.
    pub simulation: SimulationConfig,
    /// Building profile parameters.
    pub building: BuildingConfig,
    /// Season and drift-scenario selection.
    pub scenario: ScenarioConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Run timing and global parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master random seed.
    pub seed: u64,
    /// Run mode: `"realtime"`, `"batch_day"`, or `"batch_week"`.
    pub mode: String,
    /// Explicit hour-count override for batch modes.
    pub hours: Option<u32>,
    /// Delay between realtime ticks, in seconds.
    pub step_secs: u64,
    /// Number of realtime ticks.
    pub iterations: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            mode: "batch_day".to_string(),
            hours: None,
            step_secs: 5,
            iterations: 10,
        }
    }
}

/// Building profile parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildingConfig {
    /// Opaque building identifier.
    pub building_id: String,
    /// Metering topology: `"circulation"` or `"dead_end"`.
    pub topology: String,
    /// Baseline hourly volume (m³/h).
    pub base_m3_per_hour: f64,
    /// Fractional multiplicative noise (0.0–1.0).
    pub noise_fraction: f64,
    /// Night-window multiplier (0.0–1.0).
    pub night_factor: f64,
    /// Peak-window multiplier (>= 1.0).
    pub peak_factor: f64,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            building_id: "demo-building-001".to_string(),
            topology: "circulation".to_string(),
            base_m3_per_hour: 8.0,
            noise_fraction: 0.08,
            night_factor: 0.8,
            peak_factor: 1.3,
        }
    }
}

/// Season and drift-scenario selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Season: `"WINTER"` or `"SUMMER"`.
    pub season: String,
    /// Drift scenario name. Unknown names fall back to `SEASON_BASE`.
    pub kind: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            season: "WINTER".to_string(),
            kind: "SEASON_BASE".to_string(),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"building.base_m3_per_hour"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl SimulatorConfig {
    /// Returns the baseline scenario: winter circulation building, one
    /// drift-free batch day.
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            building: BuildingConfig::default(),
            scenario: ScenarioConfig::default(),
        }
    }

    /// Returns the dead-end summer preset: single-channel topology at
    /// summer demand.
    pub fn dead_end_summer() -> Self {
        Self {
            building: BuildingConfig {
                topology: "dead_end".to_string(),
                ..BuildingConfig::default()
            },
            scenario: ScenarioConfig {
                season: "SUMMER".to_string(),
                ..ScenarioConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the drift-week preset: a week of persistent 30% ITP drift,
    /// the shape a downstream anomaly detector should flag.
    pub fn drift_week() -> Self {
        Self {
            simulation: SimulationConfig {
                mode: "batch_week".to_string(),
                ..SimulationConfig::default()
            },
            scenario: ScenarioConfig {
                kind: "PERSISTENT_DRIFT".to_string(),
                ..ScenarioConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "dead_end_summer", "drift_week"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "dead_end_summer" => Ok(Self::dead_end_summer()),
            "drift_week" => Ok(Self::drift_week()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. The scenario
    /// `kind` is deliberately not validated; unknown names fall back to
    /// `SEASON_BASE` at parse time.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if Mode::parse(&s.mode).is_none() {
            errors.push(ConfigError {
                field: "simulation.mode".into(),
                message: format!(
                    "must be \"realtime\", \"batch_day\", or \"batch_week\", got \"{}\"",
                    s.mode
                ),
            });
        }
        match s.hours {
            Some(0) => errors.push(ConfigError {
                field: "simulation.hours".into(),
                message: "must be > 0 when set".into(),
            }),
            Some(h) if h > MAX_HOURS => errors.push(ConfigError {
                field: "simulation.hours".into(),
                message: format!("must be <= {MAX_HOURS}, got {h}"),
            }),
            _ => {}
        }
        if s.iterations == 0 {
            errors.push(ConfigError {
                field: "simulation.iterations".into(),
                message: "must be > 0".into(),
            });
        }

        let b = &self.building;
        if b.building_id.is_empty() {
            errors.push(ConfigError {
                field: "building.building_id".into(),
                message: "must not be empty".into(),
            });
        }
        if Topology::parse(&b.topology).is_none() {
            errors.push(ConfigError {
                field: "building.topology".into(),
                message: format!(
                    "must be \"circulation\" or \"dead_end\", got \"{}\"",
                    b.topology
                ),
            });
        }
        if b.base_m3_per_hour < 0.0 || !b.base_m3_per_hour.is_finite() {
            errors.push(ConfigError {
                field: "building.base_m3_per_hour".into(),
                message: "must be >= 0 and finite".into(),
            });
        }
        if !(0.0..=1.0).contains(&b.noise_fraction) {
            errors.push(ConfigError {
                field: "building.noise_fraction".into(),
                message: "must be within 0.0..=1.0".into(),
            });
        }
        if !(0.0..=1.0).contains(&b.night_factor) {
            errors.push(ConfigError {
                field: "building.night_factor".into(),
                message: "must be within 0.0..=1.0".into(),
            });
        }
        if b.peak_factor < 1.0 || !b.peak_factor.is_finite() {
            errors.push(ConfigError {
                field: "building.peak_factor".into(),
                message: "must be >= 1.0 and finite".into(),
            });
        }

        if Season::parse(&self.scenario.season).is_none() {
            errors.push(ConfigError {
                field: "scenario.season".into(),
                message: format!(
                    "must be \"WINTER\" or \"SUMMER\", got \"{}\"",
                    self.scenario.season
                ),
            });
        }

        errors
    }

    /// Resolved run mode. Falls back to `batch_day` for values `validate`
    /// would have rejected.
    pub fn mode(&self) -> Mode {
        Mode::parse(&self.simulation.mode).unwrap_or(Mode::BatchDay)
    }

    /// Resolved season. Falls back to winter for values `validate` would
    /// have rejected.
    pub fn season(&self) -> Season {
        Season::parse(&self.scenario.season).unwrap_or(Season::Winter)
    }

    /// Resolved drift scenario; unknown names become `SEASON_BASE`.
    pub fn scenario_kind(&self) -> Scenario {
        Scenario::from_name(&self.scenario.kind)
    }

    /// Hours to generate: the explicit override if set, otherwise the
    /// mode's default span.
    pub fn hours(&self) -> u32 {
        self.simulation.hours.unwrap_or_else(|| self.mode().default_hours())
    }

    /// Builds the raw building profile from the `[building]` section.
    pub fn profile(&self) -> BuildingProfile {
        let b = &self.building;
        BuildingProfile {
            building_id: b.building_id.clone(),
            topology: Topology::parse(&b.topology).unwrap_or(Topology::Circulation),
            base_m3_per_hour: b.base_m3_per_hour,
            noise_fraction: b.noise_fraction,
            night_factor: b.night_factor,
            peak_factor: b.peak_factor,
        }
    }

    /// Builds the season-adjusted profile used for generation.
    pub fn season_profile(&self) -> BuildingProfile {
        make_season_profile(&self.profile(), self.season())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_is_valid() {
        let cfg = SimulatorConfig::baseline();
        assert!(cfg.validate().is_empty());
        assert_eq!(cfg.mode(), Mode::BatchDay);
        assert_eq!(cfg.season(), Season::Winter);
        assert_eq!(cfg.scenario_kind(), Scenario::SeasonBase);
        assert_eq!(cfg.hours(), 24);
    }

    #[test]
    fn presets_are_valid() {
        for name in SimulatorConfig::PRESETS {
            let cfg = SimulatorConfig::from_preset(name).expect("preset exists");
            assert!(cfg.validate().is_empty(), "preset {name}");
        }
        assert!(SimulatorConfig::from_preset("nope").is_err());
    }

    #[test]
    fn drift_week_preset_selects_persistent_drift() {
        let cfg = SimulatorConfig::drift_week();
        assert_eq!(cfg.scenario_kind(), Scenario::PersistentDrift);
        assert_eq!(cfg.mode(), Mode::BatchWeek);
        assert_eq!(cfg.hours(), 168);
    }

    #[test]
    fn toml_round_trip_with_overrides() {
        let cfg = SimulatorConfig::from_toml_str(
            r#"
            [simulation]
            seed = 7
            mode = "batch_week"
            hours = 48

            [building]
            building_id = "house-9"
            topology = "dead_end"
            base_m3_per_hour = 4.5

            [scenario]
            season = "SUMMER"
            kind = "MINOR_DRIFT"
            "#,
        )
        .expect("valid toml");
        assert!(cfg.validate().is_empty());
        assert_eq!(cfg.simulation.seed, 7);
        assert_eq!(cfg.hours(), 48);
        assert_eq!(cfg.scenario_kind(), Scenario::MinorDrift);

        let profile = cfg.season_profile();
        assert_eq!(profile.building_id, "house-9");
        assert_eq!(profile.topology, Topology::DeadEnd);
        assert!((profile.base_m3_per_hour - 4.5 * 0.85).abs() < 1e-9);
    }

    #[test]
    fn unknown_toml_key_is_rejected() {
        let err = SimulatorConfig::from_toml_str("[simulation]\nhouses = 3\n")
            .expect_err("unknown key must fail");
        assert_eq!(err.field, "toml");
    }

    #[test]
    fn validate_reports_field_paths() {
        let cfg = SimulatorConfig::from_toml_str(
            r#"
            [simulation]
            mode = "batch_month"
            hours = 0

            [building]
            topology = "loop"
            base_m3_per_hour = -1.0
            noise_fraction = 1.5

            [scenario]
            season = "SPRING"
            "#,
        )
        .expect("parses");
        let errors = cfg.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"simulation.mode"));
        assert!(fields.contains(&"simulation.hours"));
        assert!(fields.contains(&"building.topology"));
        assert!(fields.contains(&"building.base_m3_per_hour"));
        assert!(fields.contains(&"building.noise_fraction"));
        assert!(fields.contains(&"scenario.season"));
    }

    #[test]
    fn unknown_scenario_kind_passes_validation() {
        let cfg = SimulatorConfig::from_toml_str("[scenario]\nkind = \"MYSTERY\"\n")
            .expect("parses");
        assert!(cfg.validate().is_empty());
        assert_eq!(cfg.scenario_kind(), Scenario::SeasonBase);
    }

    #[test]
    fn config_error_display_includes_field() {
        let err = ConfigError {
            field: "building.topology".into(),
            message: "bad".into(),
        };
        assert!(format!("{err}").contains("building.topology"));
    }
}
