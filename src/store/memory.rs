use std::sync::Arc;

use crate::Reading;

// ---

/// Process-local reading store, used for tests and offline demo runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    readings: Arc<Vec<Reading>>,
}

impl MemoryStore {
    pub fn new(readings: Vec<Reading>) -> Self {
        MemoryStore {
            readings: Arc::new(readings),
        }
    }

    pub async fn readings_between(&self, start: i64, end: i64) -> Vec<Reading> {
        // ---
        self.readings
            .iter()
            .filter(|r| r.timestamp >= start && r.timestamp <= end)
            .cloned()
            .collect()
    }

    pub async fn latest(&self) -> Option<Reading> {
        // ---
        self.readings
            .iter()
            .max_by_key(|r| r.timestamp)
            .cloned()
    }
}
