//! Synthetic telemetry generator for cold-water utility meters.
//!
//! Produces believable hourly volume readings for apartment-level and
//! building-level channels, with optional sensor-drift scenarios, and hands
//! them to an ingestion store for downstream anomaly-detection systems.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod ingest;
pub mod io;
pub mod runner;
/// Demand model, channel synthesis, range generation, and drift planning.
pub mod sim;
