//! Persisted search history.
//!
//! The list lives as one JSON array under [`HISTORY_KEY`]. Every mutation
//! reads the slot, changes it and writes it back before returning, so the
//! returned list and the stored value never disagree.

use tracing::{info, warn};

use crate::{
    error::HistoryError,
    model::{HistoryEntry, HistoryList},
    store::KeyValueStore,
};

pub const HISTORY_KEY: &str = "past_weathers";

#[derive(Debug)]
pub struct HistoryStore {
    slot: Box<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(slot: Box<dyn KeyValueStore>) -> Self {
        Self { slot }
    }

    /// Current persisted list; empty if nothing was ever saved.
    pub fn list(&self) -> Result<HistoryList, HistoryError> {
        let Some(raw) = self.slot.get(HISTORY_KEY)? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(|source| {
            warn!(key = HISTORY_KEY, error = %source, "stored history is unreadable");
            HistoryError::Corrupt {
                key: HISTORY_KEY.to_string(),
                source,
            }
        })
    }

    pub fn append(&mut self, entry: HistoryEntry) -> Result<HistoryList, HistoryError> {
        let mut entries = self.list()?;
        info!(city = %entry.city, country = %entry.country, "recording search");
        entries.push(entry);
        self.persist(&entries)?;
        Ok(entries)
    }

    /// Remove the entry at `index`. Out-of-range indices leave the slot untouched.
    pub fn remove_at(&mut self, index: usize) -> Result<HistoryList, HistoryError> {
        let mut entries = self.list()?;
        if index >= entries.len() {
            return Ok(entries);
        }

        let removed = entries.remove(index);
        info!(index, city = %removed.city, "deleted history entry");
        self.persist(&entries)?;
        Ok(entries)
    }

    fn persist(&mut self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let raw = serde_json::to_string(entries).map_err(HistoryError::Serialize)?;
        self.slot.set(HISTORY_KEY, &raw)?;
        Ok(())
    }
}
