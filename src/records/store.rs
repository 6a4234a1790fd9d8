use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A lap duration the user saved under a title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: Uuid,
    pub title: String,
    pub lap_ms: u64,
    pub saved_at: DateTime<Utc>,
}

/// Saved records, newest first. Lives in memory only.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// Prepends a record. Returns `None` without touching the store when the
    /// title is empty.
    pub fn insert(&mut self, title: &str, lap_ms: u64) -> Option<&Record> {
        if title.is_empty() {
            return None;
        }
        self.records.insert(
            0,
            Record {
                id: Uuid::new_v4(),
                title: title.to_string(),
                lap_ms,
                saved_at: Utc::now(),
            },
        );
        self.records.first()
    }

    /// Removes the record at `index`; an out-of-range index is a no-op.
    pub fn delete(&mut self, index: usize) -> Option<Record> {
        if index < self.records.len() {
            Some(self.records.remove(index))
        } else {
            None
        }
    }

    /// Records whose title starts with `term`, ignoring case, paired with
    /// their position in the full store. An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<(usize, &Record)> {
        let needle = term.to_lowercase();
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                needle.is_empty() || record.title.to_lowercase().starts_with(&needle)
            })
            .collect()
    }
}
