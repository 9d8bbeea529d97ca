//! Fragment scoring - entropy, perplexity, and resonance heuristics.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\w+").unwrap();
}

/// Fixed character vocabulary for the bigram approximation.
/// Unknown characters map to the trailing `?`.
pub const CHAR_VOCAB: &str = "abcdefghijklmnopqrstuvwxyz0123456789 ?";

/// Derived scores for a text fragment. Pure values with no identity beyond
/// the fragment that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Metrics {
    pub entropy: f64,
    pub perplexity: f64,
    pub resonance: f64,
}

impl Metrics {
    /// The zero metric, returned for empty or token-free input.
    pub const ZERO: Metrics = Metrics {
        entropy: 0.0,
        perplexity: 0.0,
        resonance: 0.0,
    };
}

/// Small fixed word sets used for the emotion component of resonance.
#[derive(Debug, Clone)]
pub struct EmotionLexicon {
    positive: HashSet<String>,
    negative: HashSet<String>,
}

impl EmotionLexicon {
    /// Build a lexicon from arbitrary word sets (words are lowercased).
    pub fn new(
        positive: impl IntoIterator<Item = impl Into<String>>,
        negative: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let lower = |words: Vec<String>| {
            words
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect::<HashSet<_>>()
        };
        Self {
            positive: lower(positive.into_iter().map(Into::into).collect()),
            negative: lower(negative.into_iter().map(Into::into).collect()),
        }
    }

    /// Mean emotional polarity over tokens: +0.5 per positive word,
    /// -0.5 per negative word, divided by token count.
    pub fn score(&self, tokens: &[&str]) -> f64 {
        let mut score = 0.0;
        for token in tokens {
            if self.positive.contains(*token) {
                score += 0.5;
            } else if self.negative.contains(*token) {
                score -= 0.5;
            }
        }
        score / tokens.len().max(1) as f64
    }
}

impl Default for EmotionLexicon {
    fn default() -> Self {
        Self::new(
            [
                "love",
                "good",
                "beautiful",
                "wonderful",
                "amazing",
                "happy",
                "joy",
                "yes",
            ],
            [
                "hate", "bad", "ugly", "terrible", "awful", "sad", "no", "never",
            ],
        )
    }
}

/// Computes entropy, perplexity, and resonance for text fragments.
///
/// Scoring never fails: empty or whitespace-only input yields [`Metrics::ZERO`].
pub struct Scorer {
    char_to_idx: HashMap<char, usize>,
    unknown_idx: usize,
    lexicon: EmotionLexicon,
}

impl Scorer {
    /// Create a scorer with a custom emotion lexicon.
    pub fn new(lexicon: EmotionLexicon) -> Self {
        let char_to_idx: HashMap<char, usize> = CHAR_VOCAB
            .chars()
            .enumerate()
            .map(|(i, c)| (c, i))
            .collect();
        // The `?` slot doubles as the unknown-character bucket.
        let unknown_idx = char_to_idx.len() - 1;
        Self {
            char_to_idx,
            unknown_idx,
            lexicon,
        }
    }

    /// Size of the fixed character vocabulary.
    pub fn vocab_size(&self) -> usize {
        self.char_to_idx.len()
    }

    /// Score a single fragment.
    pub fn score(&self, text: &str) -> Metrics {
        let lower = text.to_lowercase();
        let tokens: Vec<&str> = WORD.find_iter(&lower).map(|m| m.as_str()).collect();
        if tokens.is_empty() {
            return Metrics::ZERO;
        }

        let ids: Vec<usize> = lower
            .chars()
            .map(|c| {
                self.char_to_idx
                    .get(&c)
                    .copied()
                    .unwrap_or(self.unknown_idx)
            })
            .collect();

        let vocab = self.vocab_size() as f64;
        let loss = bigram_loss(&ids, vocab);
        let entropy = loss / std::f64::consts::LN_2 - vocab.log2();
        let perplexity = loss.exp() / vocab;

        let emotion = self.lexicon.score(&tokens);
        let numeric = tokens
            .iter()
            .filter(|t| t.chars().all(|c| c.is_ascii_digit()))
            .count();
        let resonance = emotion.abs() + numeric as f64;

        Metrics {
            entropy,
            perplexity,
            resonance,
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(EmotionLexicon::default())
    }
}

/// Mean bigram loss over adjacent character pairs.
///
/// Uniform-distribution stand-in for a trained bigram table: every
/// transition costs `ln(vocab)`, so the mean is `ln(vocab)` whenever at
/// least one pair exists. Kept exactly as-is for compatibility.
fn bigram_loss(ids: &[usize], vocab: f64) -> f64 {
    if ids.len() < 2 {
        return 0.0;
    }
    let total: f64 = ids.windows(2).map(|_| vocab.ln()).sum();
    total / (ids.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_empty_input_is_zero() {
        let scorer = Scorer::default();
        assert_eq!(scorer.score(""), Metrics::ZERO);
        assert_eq!(scorer.score("   \n\t  "), Metrics::ZERO);
        assert_eq!(scorer.score("!!! ..."), Metrics::ZERO);
    }

    #[test]
    fn test_vocab_size() {
        let scorer = Scorer::default();
        assert_eq!(scorer.vocab_size(), 38);
    }

    #[test]
    fn test_perplexity_is_one_for_multichar_fragments() {
        let scorer = Scorer::default();
        for text in ["ab", "hello world", "yes and no", "a 1 b 2 c 3"] {
            let metrics = scorer.score(text);
            assert!(
                (metrics.perplexity - 1.0).abs() < EPS,
                "perplexity for {:?} was {}",
                text,
                metrics.perplexity
            );
        }
    }

    #[test]
    fn test_entropy_is_zero_for_multichar_fragments() {
        let scorer = Scorer::default();
        let metrics = scorer.score("the quick brown fox");
        assert!(metrics.entropy.abs() < EPS);
    }

    #[test]
    fn test_single_char_fragment() {
        let scorer = Scorer::default();
        let metrics = scorer.score("a");

        // Loss is 0 with fewer than 2 characters.
        assert!((metrics.entropy + 38f64.log2()).abs() < EPS);
        assert!((metrics.perplexity - 1.0 / 38.0).abs() < EPS);
        assert!(metrics.resonance.abs() < EPS);
    }

    #[test]
    fn test_emotion_resonance() {
        let scorer = Scorer::default();

        // Three tokens, one positive: |0.5 / 3|.
        let metrics = scorer.score("I love you");
        assert!((metrics.resonance - 0.5 / 3.0).abs() < EPS);

        // Negative polarity contributes via absolute value.
        let metrics = scorer.score("hate hate");
        assert!((metrics.resonance - 0.5).abs() < EPS);

        // Mixed polarity cancels.
        let metrics = scorer.score("love hate");
        assert!(metrics.resonance.abs() < EPS);
    }

    #[test]
    fn test_numeric_tokens_boost_resonance() {
        let scorer = Scorer::default();

        // Two all-digit tokens, no emotion words.
        let metrics = scorer.score("42 cats and 7 dogs");
        assert!((metrics.resonance - 2.0).abs() < EPS);

        // Mixed alphanumeric tokens do not count as numeric.
        let metrics = scorer.score("route 66a");
        assert!(metrics.resonance.abs() < EPS);
    }

    #[test]
    fn test_case_insensitive_tokens() {
        let scorer = Scorer::default();
        let upper = scorer.score("LOVE");
        let lower = scorer.score("love");
        assert!((upper.resonance - lower.resonance).abs() < EPS);
    }

    #[test]
    fn test_custom_lexicon() {
        let lexicon = EmotionLexicon::new(["rust"], ["segfault"]);
        let scorer = Scorer::new(lexicon);

        let metrics = scorer.score("rust");
        assert!((metrics.resonance - 0.5).abs() < EPS);

        // Default lexicon words mean nothing to this scorer.
        let metrics = scorer.score("love");
        assert!(metrics.resonance.abs() < EPS);
    }
}
