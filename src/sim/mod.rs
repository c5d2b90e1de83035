//! Generation engine: demand model, channel synthesis, range generation,
//! and drift planning.

pub mod channels;
pub mod demand;
pub mod drift;
pub mod generator;
pub mod types;
