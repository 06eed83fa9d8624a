//! Reading store gateway.
//!
//! The dashboard only needs two queries from wherever readings live: every
//! record with `timestamp` in `[start, end]`, and the single most recent
//! record. [`ReadingSource`] dispatches those to the configured backend so
//! the routes never see which one is in use.

use anyhow::Result;

mod firebase;
mod memory;
mod postgres;

pub use firebase::FirebaseStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::Reading;

// ---

/// The configured reading backend.
#[derive(Debug, Clone)]
pub enum ReadingSource {
    Firebase(FirebaseStore),
    Postgres(PgStore),
    Memory(MemoryStore),
}

impl ReadingSource {
    /// All readings with `start <= timestamp <= end` (epoch seconds),
    /// ascending by timestamp.
    pub async fn readings_between(&self, start: i64, end: i64) -> Result<Vec<Reading>> {
        // ---
        let mut readings = match self {
            ReadingSource::Firebase(store) => store.readings_between(start, end).await?,
            ReadingSource::Postgres(store) => store.readings_between(start, end).await?,
            ReadingSource::Memory(store) => store.readings_between(start, end).await,
        };
        readings.sort_by_key(|r| r.timestamp);

        tracing::debug!(
            "Fetched {} readings in [{}, {}] from {}",
            readings.len(),
            start,
            end,
            self.name()
        );
        Ok(readings)
    }

    /// The reading with the greatest timestamp, if any exist.
    pub async fn latest(&self) -> Result<Option<Reading>> {
        // ---
        match self {
            ReadingSource::Firebase(store) => store.latest().await,
            ReadingSource::Postgres(store) => store.latest().await,
            ReadingSource::Memory(store) => Ok(store.latest().await),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReadingSource::Firebase(_) => "firebase",
            ReadingSource::Postgres(_) => "postgres",
            ReadingSource::Memory(_) => "memory",
        }
    }
}
