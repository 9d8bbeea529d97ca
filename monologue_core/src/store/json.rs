//! File-backed state store using a single JSON record.

use std::path::PathBuf;

use crate::error::StoreError;

use super::{MonologueState, StateStore};

/// Persists the monologue as one JSON file with the wire fields
/// `monologue_text` and `current_position`.
#[derive(Debug)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Result<Option<MonologueState>, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Read(e)),
        };
        let state: MonologueState = serde_json::from_str(&text)?;
        Ok(Some(state.normalized()))
    }

    fn save(&mut self, state: &MonologueState) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, json).map_err(StoreError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn test_missing_file_is_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStateStore::new(dir.path().join("state.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStateStore::new(dir.path().join("state.json"));

        let state = MonologueState::new("yes I said yes I will Yes", 10);
        store.save(&state).unwrap();

        assert_eq!(store.load().unwrap(), Some(state));
    }

    #[test]
    fn test_wire_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut store = JsonStateStore::new(&path);
        store.save(&MonologueState::new("abc", 1)).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("monologue_text"));
        assert!(raw.contains("current_position"));
    }

    #[test]
    fn test_malformed_record_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonStateStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_out_of_range_cursor_is_clamped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"monologue_text": "tiny", "current_position": 9999}"#,
        )
        .unwrap();

        let store = JsonStateStore::new(&path);
        let state = store.load().unwrap().unwrap();
        assert_eq!(state.cursor, 4);
    }
}
