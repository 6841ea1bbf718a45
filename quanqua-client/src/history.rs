//! Translation history
//!
//! Newest entry first, capped, stored as one JSON array under a single key. The shape
//! matches what the web front end writes, so a history exported from a browser's local
//! storage loads as-is.

use crate::storage::{KeyValueStore, StorageResult};
use quanqua::LanguageCode;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Storage key the history array lives under
pub const HISTORY_STORAGE_KEY: &str = "quanqua-translation-history";

/// Default number of entries kept
pub const MAX_HISTORY_ITEMS: usize = 50;

/// One past translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub source_lang: LanguageCode,
    pub target_lang: LanguageCode,
    pub source_text: String,
    pub translated_text: String,
    /// Creation time in epoch milliseconds
    pub timestamp: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Insert at the front and evict from the back beyond `capacity`
    pub fn push_front(&mut self, entry: HistoryEntry, capacity: usize) {
        self.entries.insert(0, entry);
        self.entries.truncate(capacity);
    }

    /// Create an entry stamped `at_ms` and insert it at the front
    pub fn record(
        &mut self,
        source_lang: LanguageCode,
        target_lang: LanguageCode,
        source_text: String,
        translated_text: String,
        at_ms: i64,
        capacity: usize,
    ) -> &HistoryEntry {
        let entry = HistoryEntry {
            id: self.unique_id(at_ms),
            source_lang,
            target_lang,
            source_text,
            translated_text,
            timestamp: at_ms,
        };
        self.push_front(entry, capacity);
        &self.entries[0]
    }

    /// Remove the entry with `id`, keeping the others in order
    pub fn remove(&mut self, id: &str) -> Option<HistoryEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.entries)
    }

    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    fn unique_id(&self, at_ms: i64) -> String {
        let base = at_ms.to_string();
        if self.get(&base).is_none() {
            return base;
        }
        let mut n = 1;
        loop {
            let candidate = format!("{}-{}", base, n);
            if self.get(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Read at most `capacity` entries of history from `store`
///
/// Missing or unreadable data yields an empty log; the failure is logged.
pub fn load(store: &dyn KeyValueStore, key: &str, capacity: usize) -> HistoryLog {
    match store.get(key) {
        Ok(Some(bytes)) => match HistoryLog::from_bytes(&bytes) {
            Ok(mut log) => {
                if log.len() > capacity {
                    warn!(entries = log.len(), capacity, "Dropping oldest stored history entries");
                    log.entries.truncate(capacity);
                }
                log
            }
            Err(e) => {
                warn!(error = %e, key, "Discarding unreadable translation history");
                HistoryLog::new()
            }
        },
        Ok(None) => HistoryLog::new(),
        Err(e) => {
            warn!(error = %e, key, "Could not read translation history");
            HistoryLog::new()
        }
    }
}

/// Write `entries` to `store` as a JSON array
pub fn persist(store: &dyn KeyValueStore, key: &str, entries: &[HistoryEntry]) -> StorageResult<()> {
    let bytes = serde_json::to_vec(entries).map_err(std::io::Error::other)?;
    store.set(key, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn entry(id: &str) -> HistoryEntry {
        HistoryEntry {
            id: id.to_string(),
            source_lang: LanguageCode::En,
            target_lang: LanguageCode::Am,
            source_text: format!("text {}", id),
            translated_text: format!("ትርጉም {}", id),
            timestamp: 0,
        }
    }

    fn ids(log: &HistoryLog) -> Vec<&str> {
        log.entries().iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_newest_first() {
        let mut log = HistoryLog::new();
        log.push_front(entry("1"), MAX_HISTORY_ITEMS);
        log.push_front(entry("2"), MAX_HISTORY_ITEMS);
        assert_eq!(ids(&log), vec!["2", "1"]);
    }

    #[test]
    fn test_fifty_first_entry_evicts_oldest() {
        let mut log = HistoryLog::new();
        for i in 0..MAX_HISTORY_ITEMS {
            log.push_front(entry(&i.to_string()), MAX_HISTORY_ITEMS);
        }
        assert_eq!(log.len(), 50);
        assert!(log.get("0").is_some());

        log.push_front(entry("50"), MAX_HISTORY_ITEMS);
        assert_eq!(log.len(), 50);
        assert!(log.get("0").is_none());
        assert_eq!(log.entries()[0].id, "50");
        assert_eq!(log.entries()[49].id, "1");
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut log = HistoryLog::from_entries(vec![entry("a"), entry("b"), entry("c"), entry("d")]);
        let removed = log.remove("b").unwrap();
        assert_eq!(removed.id, "b");
        assert_eq!(ids(&log), vec!["a", "c", "d"]);
        assert!(log.remove("missing").is_none());
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_record_ids_are_unique_within_a_millisecond() {
        let mut log = HistoryLog::new();
        log.record(LanguageCode::En, LanguageCode::Ti, "a".into(), "x".into(), 1700, 50);
        log.record(LanguageCode::En, LanguageCode::Ti, "b".into(), "y".into(), 1700, 50);
        log.record(LanguageCode::En, LanguageCode::Ti, "c".into(), "z".into(), 1700, 50);
        assert_eq!(ids(&log), vec!["1700-2", "1700-1", "1700"]);
        assert!(log.entries().iter().all(|e| e.timestamp == 1700));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let log = HistoryLog::from_entries(vec![entry("42")]);
        let json: serde_json::Value = serde_json::from_slice(&log.to_bytes().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "id": "42",
                "sourceLang": "en",
                "targetLang": "am",
                "sourceText": "text 42",
                "translatedText": "ትርጉም 42",
                "timestamp": 0
            }])
        );
    }

    #[test]
    fn test_load_and_persist() {
        let store = MemoryStore::new();
        assert!(load(&store, HISTORY_STORAGE_KEY, MAX_HISTORY_ITEMS).is_empty());

        persist(&store, HISTORY_STORAGE_KEY, &[entry("1"), entry("2")]).unwrap();
        let log = load(&store, HISTORY_STORAGE_KEY, MAX_HISTORY_ITEMS);
        assert_eq!(ids(&log), vec!["1", "2"]);
    }

    #[test]
    fn test_load_keeps_newest_fifty() {
        let store = MemoryStore::new();
        let stored: Vec<HistoryEntry> = (0..60).map(|i| entry(&i.to_string())).collect();
        persist(&store, HISTORY_STORAGE_KEY, &stored).unwrap();

        let log = load(&store, HISTORY_STORAGE_KEY, MAX_HISTORY_ITEMS);
        assert_eq!(log.len(), 50);
        assert_eq!(log.entries()[0].id, "0");
        assert_eq!(log.entries()[49].id, "49");
    }

    #[test]
    fn test_load_corrupt_data_is_empty() {
        let store = MemoryStore::new();
        store.set(HISTORY_STORAGE_KEY, b"{not an array").unwrap();
        assert!(load(&store, HISTORY_STORAGE_KEY, MAX_HISTORY_ITEMS).is_empty());
    }
}
