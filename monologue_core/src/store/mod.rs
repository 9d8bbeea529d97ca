//! Monologue state and its persistence seam.
//!
//! The `{text, cursor}` pair is the single source of truth for what is
//! displayed next. One owner per logical document: all reads and mutations
//! must be serialized by whoever holds the engine.

mod json;

pub use json::*;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::StoreError;

/// Text shown when no monologue could be loaded at all.
pub const PLACEHOLDER: &str = "...";

/// The mutable monologue buffer and its read cursor.
///
/// Invariants: `cursor <= text.len()` and the cursor sits on a char
/// boundary. Both are enforced at construction and after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonologueState {
    #[serde(rename = "monologue_text")]
    pub text: String,

    #[serde(rename = "current_position")]
    pub cursor: usize,
}

impl MonologueState {
    /// Create a state, clamping the cursor into the text.
    pub fn new(text: impl Into<String>, cursor: usize) -> Self {
        let mut state = Self {
            text: text.into(),
            cursor,
        };
        state.clamp_cursor();
        state
    }

    /// Fallback state used when no seed document is available.
    pub fn placeholder() -> Self {
        Self {
            text: PLACEHOLDER.to_string(),
            cursor: 0,
        }
    }

    /// Build a first-run state from a raw seed document.
    ///
    /// Markdown heading lines are stripped, all remaining whitespace runs
    /// collapse to single spaces, and the cursor starts at a uniformly
    /// random position.
    pub fn seed_from_text<R: Rng>(seed: &str, rng: &mut R) -> Self {
        let text = clean_seed_text(seed);
        if text.is_empty() {
            return Self::placeholder();
        }
        let cursor = rng.gen_range(0..text.len());
        Self::new(text, cursor)
    }

    /// Build a first-run state from a seed document on disk.
    ///
    /// Total: an absent or unreadable document degrades to the placeholder
    /// state with a warning rather than failing the caller.
    pub fn seed_from_path<R: Rng>(path: &Path, rng: &mut R) -> Self {
        match std::fs::read_to_string(path) {
            Ok(seed) => Self::seed_from_text(&seed, rng),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "seed document unavailable, using placeholder");
                Self::placeholder()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn clamp_cursor(&mut self) {
        if self.cursor > self.text.len() {
            self.cursor = self.text.len();
        }
        while self.cursor > 0 && !self.text.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    /// Re-establish the state invariants after deserialization.
    pub(crate) fn normalized(mut self) -> Self {
        self.clamp_cursor();
        self
    }
}

/// Strip Markdown heading lines and collapse whitespace runs.
pub fn clean_seed_text(seed: &str) -> String {
    let without_headings: Vec<&str> = seed
        .lines()
        .filter(|line| !line.starts_with('#'))
        .collect();
    without_headings
        .join("\n")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The persistence collaborator.
///
/// `load` returning `Ok(None)` means no record exists yet and triggers
/// first-run seeding; a malformed record surfaces as an error so the host
/// can decide what to do with it.
pub trait StateStore {
    fn load(&self) -> Result<Option<MonologueState>, StoreError>;

    /// Durably persist the state. Must be called after every mutating
    /// operation so that restarts resume exactly where the buffer left off.
    fn save(&mut self, state: &MonologueState) -> Result<(), StoreError>;
}

/// In-memory store for tests and embedding without durability.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Option<MonologueState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: MonologueState) -> Self {
        Self { state: Some(state) }
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<MonologueState>, StoreError> {
        Ok(self.state.clone())
    }

    fn save(&mut self, state: &MonologueState) -> Result<(), StoreError> {
        self.state = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_clean_seed_text() {
        let seed = "# Title\n\nfirst   line\n## Subtitle\nsecond\tline\n";
        assert_eq!(clean_seed_text(seed), "first line second line");
    }

    #[test]
    fn test_clean_seed_text_indented_hash_survives() {
        // Only lines that begin with `#` are headings.
        let seed = "keep  # this\nand this";
        assert_eq!(clean_seed_text(seed), "keep # this and this");
    }

    #[test]
    fn test_seed_cursor_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let state = MonologueState::seed_from_text("a modest seed document", &mut rng);
            assert!(state.cursor < state.len());
        }
    }

    #[test]
    fn test_seed_empty_document_degrades() {
        let mut rng = StdRng::seed_from_u64(7);
        let state = MonologueState::seed_from_text("# only a heading\n\n", &mut rng);
        assert_eq!(state, MonologueState::placeholder());
    }

    #[test]
    fn test_seed_missing_file_degrades() {
        let mut rng = StdRng::seed_from_u64(7);
        let state = MonologueState::seed_from_path(Path::new("/nonexistent/seed.md"), &mut rng);
        assert_eq!(state, MonologueState::placeholder());
    }

    #[test]
    fn test_cursor_clamped_at_construction() {
        let state = MonologueState::new("short", 999);
        assert_eq!(state.cursor, 5);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        let state = MonologueState::new("persisted text", 4);
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), Some(state));
    }
}
