//! # Text Metrics
//!
//! The foundation crate for Murmur - character-level scoring heuristics and
//! fragment segmentation. This crate is pure: every operation is a total
//! function of its string input and carries no state beyond an injectable
//! emotion lexicon.
//!
//! ## Core Components
//!
//! - **metrics**: entropy/perplexity/resonance scoring for text fragments
//! - **splitter**: threshold-driven segmentation of raw input into fragments
//!
//! The "entropy" and "perplexity" here come from a uniform-distribution
//! character-bigram approximation, not a trained model. The exact formulas
//! are part of the behavioral contract and are preserved as-is.

pub mod metrics;
pub mod splitter;

pub use metrics::*;
pub use splitter::*;
