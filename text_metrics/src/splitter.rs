//! Fragment segmentation - splits raw submissions into scoreable fragments.

use lazy_static::lazy_static;
use regex::Regex;

use crate::metrics::Scorer;

lazy_static! {
    static ref SENTENCE_BREAK: Regex = Regex::new(r"[.!?]+").unwrap();
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").unwrap();
}

/// Thresholds that end a growing fragment.
#[derive(Debug, Clone, Copy)]
pub struct SplitConfig {
    pub entropy_threshold: f64,
    pub perplexity_threshold: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            entropy_threshold: 2.0,
            perplexity_threshold: 4.0,
        }
    }
}

/// Split raw input into ordered fragments.
///
/// Lines are trimmed and split on sentence punctuation runs; each part is
/// stripped of non-word characters, then grown word by word. Whenever the
/// candidate-so-far crosses either threshold, the fragment built before the
/// current word is flushed and a new candidate starts with that word.
///
/// Never fails; blank input yields an empty sequence. With the default
/// scorer the constant bigram loss keeps entropy/perplexity below the
/// default thresholds once a candidate has two characters, so fragments
/// tend to equal whole cleaned parts. That emergent behavior is relied on
/// by downstream weaving and must not be "fixed" in the scorer.
pub fn split_fragments(text: &str, scorer: &Scorer, config: &SplitConfig) -> Vec<String> {
    let mut fragments = Vec::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        for part in SENTENCE_BREAK.split(line) {
            let cleaned = NON_WORD.replace_all(part, "");
            let cleaned = cleaned.trim();
            if cleaned.is_empty() {
                continue;
            }

            let mut current: Vec<&str> = Vec::new();
            for word in cleaned.split_whitespace() {
                let mut candidate = current.join(" ");
                if !candidate.is_empty() {
                    candidate.push(' ');
                }
                candidate.push_str(word);

                let metrics = scorer.score(&candidate);
                if metrics.entropy > config.entropy_threshold
                    || metrics.perplexity > config.perplexity_threshold
                {
                    if !current.is_empty() {
                        fragments.push(current.join(" "));
                    }
                    current = vec![word];
                } else {
                    current.push(word);
                }
            }

            if !current.is_empty() {
                fragments.push(current.join(" "));
            }
        }
    }

    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<String> {
        split_fragments(text, &Scorer::default(), &SplitConfig::default())
    }

    #[test]
    fn test_blank_input_yields_nothing() {
        assert!(split("").is_empty());
        assert!(split("   \n  \n\t").is_empty());
        assert!(split("...!!!???").is_empty());
    }

    #[test]
    fn test_sentence_punctuation_splits_parts() {
        let fragments = split("Hello, world! How are you? Fine.");
        assert_eq!(fragments, vec!["Hello world", "How are you", "Fine"]);
    }

    #[test]
    fn test_lines_split_independently() {
        let fragments = split("first line\nsecond line\n\n  third  ");
        assert_eq!(fragments, vec!["first line", "second line", "third"]);
    }

    #[test]
    fn test_punctuation_is_stripped_not_preserved() {
        let fragments = split("don't stop; it's fine");
        assert_eq!(fragments, vec!["dont stop its fine"]);
    }

    #[test]
    fn test_encounter_order_preserved() {
        let fragments = split("one. two. three.\nfour!");
        assert_eq!(fragments, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn test_thresholds_flush_per_word() {
        // An impossible entropy threshold makes every candidate overflow, so
        // the splitter degenerates to one fragment per word.
        let config = SplitConfig {
            entropy_threshold: -10.0,
            perplexity_threshold: 4.0,
        };
        let fragments = split_fragments("alpha beta gamma", &Scorer::default(), &config);
        assert_eq!(fragments, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_default_thresholds_keep_parts_whole() {
        let fragments = split("a long run of ordinary words stays together");
        assert_eq!(fragments, vec!["a long run of ordinary words stays together"]);
    }
}
