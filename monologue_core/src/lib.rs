//! # Monologue Core (Murmur)
//!
//! A stateful, self-mutating text engine. It holds a growing body of prose
//! (the monologue), continuously emits bounded-length word-safe excerpts
//! from it, and permanently rewrites itself by splicing submitted phrases
//! into the body at positions chosen by the resonance heuristic from
//! `text_metrics`.
//!
//! ## Core Components
//!
//! - **store**: the `{text, cursor}` state, seeding, and the persistence seam
//! - **engine**: splitting, scoring, resonance-weighted insertion, mutation
//! - **fragment_log**: write-only sink for scored fragments
//! - **config**: engine configuration, loadable from TOML
//!
//! ## Design Philosophy
//!
//! - **Single writer**: one engine per logical document; the host serializes
//!   calls against it
//! - **Total operations**: malformed or missing inputs degrade to safe
//!   defaults instead of failing the caller
//! - **Persistent mutation**: every weave changes the monologue for good and
//!   is saved before the next one is accepted

mod chunk;

pub mod config;
pub mod engine;
pub mod error;
pub mod fragment_log;
pub mod store;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use fragment_log::*;
pub use store::*;
