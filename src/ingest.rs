//! Ingestion contract toward the external datastore, plus an in-memory
//! store used by the runner and tests.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::sim::types::{Channel, Reading};

/// Upsert key: one row per timestamp, building, and channel.
pub type ReadingKey = (DateTime<Utc>, String, Channel);

/// Failure reported by a reading store.
#[derive(Debug)]
pub struct IngestError {
    /// Human-readable failure description.
    pub message: String,
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ingest error: {}", self.message)
    }
}

impl std::error::Error for IngestError {}

/// Destination for generated readings.
///
/// `upsert` must be idempotent: replaying the same rows, keyed by
/// `(ts, building_id, channel)`, must not create duplicates.
pub trait ReadingStore {
    /// Inserts or replaces `rows`, returning the number of rows accepted.
    fn upsert(&mut self, rows: &[Reading]) -> Result<usize, IngestError>;
}

/// In-memory store keyed like the external datastore's unique index.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: BTreeMap<ReadingKey, Reading>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct rows held.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in key order: chronological, then building, then channel.
    pub fn readings(&self) -> Vec<Reading> {
        self.rows.values().cloned().collect()
    }
}

impl ReadingStore for MemoryStore {
    fn upsert(&mut self, rows: &[Reading]) -> Result<usize, IngestError> {
        for r in rows {
            self.rows
                .insert((r.ts, r.building_id.clone(), r.channel), r.clone());
        }
        Ok(rows.len())
    }
}
