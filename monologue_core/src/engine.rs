//! The weave engine - splits, scores, places, and permanently splices
//! submitted text into the monologue.
//!
//! One engine owns one logical document. Every read and mutation goes
//! through `&mut self`, which gives the single-writer discipline the
//! `{text, cursor}` pair requires; scoring and splitting are pure and need
//! no such care.

use rand::seq::SliceRandom;
use rand::Rng;

use text_metrics::{split_fragments, Metrics, Scorer};

use crate::chunk;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::fragment_log::{FragmentRecord, FragmentSink};
use crate::store::{MonologueState, StateStore, PLACEHOLDER};

/// Stateful engine over a monologue document.
pub struct WeaveEngine {
    config: EngineConfig,
    scorer: Scorer,
    store: Box<dyn StateStore>,
    sink: Option<Box<dyn FragmentSink>>,
    state: MonologueState,
    last_chunk: String,
    dirty: bool,
}

impl WeaveEngine {
    /// Open an engine: load the persisted state, or seed on first run from
    /// `config.seed_path` (placeholder when no seed is configured).
    pub fn open(store: Box<dyn StateStore>, config: EngineConfig) -> Result<Self, EngineError> {
        Self::open_with_rng(store, config, &mut rand::thread_rng())
    }

    /// Open with a specific RNG (useful for testing the seeded cursor).
    pub fn open_with_rng<R: Rng>(
        mut store: Box<dyn StateStore>,
        config: EngineConfig,
        rng: &mut R,
    ) -> Result<Self, EngineError> {
        let state = match store.load()? {
            Some(state) => state,
            None => {
                let state = match &config.seed_path {
                    Some(path) => MonologueState::seed_from_path(path, rng),
                    None => MonologueState::placeholder(),
                };
                store.save(&state)?;
                state
            }
        };
        Ok(Self::with_state(state, store, config))
    }

    /// Build an engine around an existing state without touching the store.
    pub fn with_state(
        state: MonologueState,
        store: Box<dyn StateStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            config,
            scorer: Scorer::default(),
            store,
            sink: None,
            state,
            last_chunk: PLACEHOLDER.to_string(),
            dirty: false,
        }
    }

    /// Attach a fragment sink.
    pub fn with_sink(mut self, sink: Box<dyn FragmentSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replace the default scorer (custom emotion lexicon).
    pub fn with_scorer(mut self, scorer: Scorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn state(&self) -> &MonologueState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The most recent display text, kept for degraded paths.
    pub fn last_chunk(&self) -> &str {
        &self.last_chunk
    }

    /// Whether the in-memory state has a mutation the store has not seen.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Retry persisting the current state.
    pub fn persist(&mut self) -> Result<(), EngineError> {
        self.store.save(&self.state)?;
        self.dirty = false;
        Ok(())
    }

    /// Advance the cursor and return the next word-safe excerpt.
    pub fn next_chunk(&mut self) -> Result<String, EngineError> {
        let (start, end) = chunk::window(
            &self.state.text,
            self.state.cursor,
            self.config.target_chars(),
        );
        let display = display_text(&self.state.text[start..end]);
        self.state.cursor = end;
        self.last_chunk = display.clone();
        self.commit()?;
        Ok(display)
    }

    /// Weave a submission into the monologue and return the woven excerpt.
    ///
    /// Blank input and submissions that yield no fragments degrade to a
    /// plain [`next_chunk`](Self::next_chunk) refresh. The splice changes
    /// the monologue's total length permanently.
    pub fn weave(&mut self, input: &str) -> Result<String, EngineError> {
        if input.trim().is_empty() {
            return self.next_chunk();
        }

        let fragments = split_fragments(input, &self.scorer, &self.config.split_config());
        if fragments.is_empty() {
            return self.next_chunk();
        }

        let scored: Vec<(String, Metrics)> = fragments
            .into_iter()
            .map(|fragment| {
                let metrics = self.scorer.score(&fragment);
                (fragment, metrics)
            })
            .collect();

        if let Some(sink) = self.sink.as_mut() {
            for (fragment, metrics) in &scored {
                let record = FragmentRecord::new(fragment.clone(), *metrics);
                if let Err(e) = sink.record(&record) {
                    tracing::warn!(error = %e, "failed to record fragment");
                }
            }
        }

        let (start, end) = chunk::window(
            &self.state.text,
            self.state.cursor,
            self.config.target_chars(),
        );
        let original = self.state.text[start..end].to_string();

        let mut woven = original.clone();
        let mut offset = 0_isize;
        for (pos, fragment) in plan_insertions(&original, &scored) {
            let at = (pos as isize + offset).clamp(0, woven.len() as isize) as usize;
            let len_before = woven.len() as isize;
            woven = chunk::splice(&woven, at, &fragment);
            offset += woven.len() as isize - len_before;
        }

        tracing::debug!(
            fragments = scored.len(),
            window_start = start,
            window_end = end,
            woven_len = woven.len(),
            "wove fragments into monologue"
        );

        self.state.text.replace_range(start..end, &woven);
        self.state.cursor = start + woven.len();

        let display = display_text(&woven);
        self.last_chunk = display.clone();
        self.commit()?;
        Ok(display)
    }

    /// Weave one line chosen uniformly at random from an external feed.
    ///
    /// Returns `Ok(None)` when the feed is empty.
    pub fn weave_from_feed(&mut self, lines: &[String]) -> Result<Option<String>, EngineError> {
        self.weave_from_feed_with_rng(lines, &mut rand::thread_rng())
    }

    pub fn weave_from_feed_with_rng<R: Rng>(
        &mut self,
        lines: &[String],
        rng: &mut R,
    ) -> Result<Option<String>, EngineError> {
        match lines.choose(rng) {
            Some(line) => self.weave(line).map(Some),
            None => Ok(None),
        }
    }

    fn commit(&mut self) -> Result<(), EngineError> {
        self.dirty = true;
        if let Err(e) = self.store.save(&self.state) {
            tracing::warn!(error = %e, "failed to persist monologue state");
            return Err(EngineError::Persistence(e));
        }
        self.dirty = false;
        Ok(())
    }
}

fn display_text(chunk: &str) -> String {
    let trimmed = chunk.trim();
    if trimmed.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Plan resonance-weighted insertion positions for scored fragments.
///
/// Fragment `i` of `N` (1-indexed) starts from an even spread `i/(N+1)`
/// and is pulled toward the chunk midpoint in proportion to its normalized
/// resonance. Positions snap to the nearer word boundary and come back
/// sorted ascending, fragments cleaned to ASCII letters, digits, and
/// whitespace.
pub(crate) fn plan_insertions(
    chunk: &str,
    scored: &[(String, Metrics)],
) -> Vec<(usize, String)> {
    let chunk_chars = chunk.chars().count();
    let max_resonance = scored
        .iter()
        .map(|(_, m)| m.resonance)
        .fold(0.0_f64, f64::max);
    let max_resonance = if max_resonance <= 0.0 {
        1.0
    } else {
        max_resonance
    };

    let n = scored.len();
    let mut placements = Vec::with_capacity(n);
    for (idx, (fragment, metrics)) in scored.iter().enumerate() {
        let base = (idx + 1) as f64 / (n + 1) as f64;
        let r_norm = metrics.resonance / max_resonance;
        let ratio = base * (1.0 - r_norm) + 0.5 * r_norm;

        let char_pos = ((ratio * chunk_chars as f64).round() as usize).min(chunk_chars);
        let byte_pos = chunk::byte_pos_of_char(chunk, char_pos);
        let pos = chunk::snap_insert_pos(chunk, byte_pos);

        let cleaned = clean_fragment(fragment);
        if cleaned.is_empty() {
            continue;
        }
        placements.push((pos, cleaned));
    }

    placements.sort_by(|a, b| a.0.cmp(&b.0));
    placements
}

/// Strip everything that is not an ASCII letter, digit, or whitespace.
/// Punctuation is discarded, not preserved; this may shorten words.
fn clean_fragment(fragment: &str) -> String {
    fragment
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}
