//! Meter simulator entry point: CLI wiring and config-driven runs.

use std::path::Path;
use std::process;
use std::time::Duration;

use chrono::Utc;

use meter_sim::config::SimulatorConfig;
use meter_sim::ingest::MemoryStore;
use meter_sim::io::export::export_csv;
use meter_sim::runner::{RealtimeOptions, run_batch, run_realtime};
use meter_sim::sim::types::Mode;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    hours_override: Option<u32>,
    readings_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("meter-sim — synthetic cold-water metering telemetry generator");
    eprintln!();
    eprintln!("Usage: meter-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load configuration from TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, dead_end_summer, drift_week)");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --hours <u32>            Override generated hour count");
    eprintln!("  --readings-out <path>    Export generated readings to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the run");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        hours_override: None,
        readings_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --scenario requires a path argument");
                    process::exit(1);
                }
                cli.scenario_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--hours" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --hours requires a u32 argument");
                    process::exit(1);
                }
                if let Ok(h) = args[i].parse::<u32>() {
                    cli.hours_override = Some(h);
                } else {
                    eprintln!("error: --hours value \"{}\" is not a valid u32", args[i]);
                    process::exit(1);
                }
            }
            "--readings-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --readings-out requires a path argument");
                    process::exit(1);
                }
                cli.readings_out = Some(args[i].clone());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --port requires a u16 argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then baseline
    let mut config = if let Some(ref path) = cli.scenario_path {
        match SimulatorConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match SimulatorConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        SimulatorConfig::baseline()
    };

    // Apply overrides
    if let Some(seed) = cli.seed_override {
        config.simulation.seed = seed;
    }
    if let Some(hours) = cli.hours_override {
        config.simulation.hours = Some(hours);
    }

    // Validate
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let profile = config.season_profile();
    let seed = config.simulation.seed;
    let season = config.season();
    let scenario = config.scenario_kind();

    let mut store = MemoryStore::new();
    let run = match config.mode() {
        Mode::Realtime => {
            let opts = RealtimeOptions {
                iterations: config.simulation.iterations,
                step: Duration::from_secs(config.simulation.step_secs),
            };
            run_realtime(&profile, season, scenario, &opts, seed, &mut store)
        }
        mode => run_batch(
            &profile,
            mode,
            season,
            scenario,
            config.hours(),
            Utc::now(),
            seed,
            &mut store,
        ),
    };

    let report = match run {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let readings = store.readings();

    // Print generated rows and the run summary
    for r in &readings {
        println!("{r}");
    }
    println!("\n{report}");

    // Export CSV if requested
    if let Some(ref path) = cli.readings_out {
        if let Err(e) = export_csv(&readings, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Readings written to {path}");
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(meter_sim::api::AppState {
            building_id: profile.building_id.clone(),
            report,
            readings,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(meter_sim::api::serve(state, addr));
    }
}
