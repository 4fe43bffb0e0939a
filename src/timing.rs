//! # Narration Timing
//!
//! Estimates how long a scene should stay on screen from the length of its narration.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::TimingConfig;

fn word_regex() -> &'static Regex {
    static WORD_RE: OnceLock<Regex> = OnceLock::new();
    WORD_RE.get_or_init(|| Regex::new(r"\w+").expect("word regex should compile"))
}

/// Number of word-like runs in the narration
pub fn count_words(narration: &str) -> usize {
    word_regex().find_iter(narration).count()
}

/// Pure narration-length to clip-duration estimator
#[derive(Debug, Clone, PartialEq)]
pub struct DurationEstimator {
    seconds_per_word: f64,
    min_seconds: f64,
    max_seconds: f64,
}

impl Default for DurationEstimator {
    fn default() -> Self {
        Self::new(&TimingConfig::default())
    }
}

impl DurationEstimator {
    pub fn new(config: &TimingConfig) -> Self {
        Self {
            seconds_per_word: config.seconds_per_word,
            min_seconds: config.min_seconds,
            max_seconds: config.max_seconds,
        }
    }

    /// Clip duration in seconds, clamped and rounded to 2 decimals
    pub fn estimate(&self, narration: &str) -> f64 {
        let raw = count_words(narration) as f64 * self.seconds_per_word;
        let clamped = raw.clamp(self.min_seconds, self.max_seconds);
        (clamped * 100.0).round() / 100.0
    }
}

/// Estimate with the default 0.36 s/word rate and [4.0, 22.0] bounds
pub fn estimate_duration_seconds(narration: &str) -> f64 {
    DurationEstimator::default().estimate(narration)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_word_count_ignores_punctuation() {
        assert_eq!(count_words("Hello, world! It's 2024."), 5);
        assert_eq!(count_words("   "), 0);
        assert_eq!(count_words("snake_case counts once"), 3);
    }

    #[test]
    fn test_short_narration_clamps_to_minimum() {
        assert_eq!(estimate_duration_seconds("Welcome."), 4.0);
        assert_eq!(estimate_duration_seconds(""), 4.0);
        // 10 words is 3.6 s raw, still below the floor
        assert_eq!(estimate_duration_seconds(&words(10)), 4.0);
    }

    #[test]
    fn test_long_narration_clamps_to_maximum() {
        assert_eq!(estimate_duration_seconds(&words(100)), 22.0);
    }

    #[test]
    fn test_mid_range_is_linear_and_rounded() {
        assert_eq!(estimate_duration_seconds(&words(20)), 7.2);
        assert_eq!(estimate_duration_seconds(&words(33)), 11.88);
        assert_eq!(estimate_duration_seconds(&words(61)), 21.96);
    }

    #[test]
    fn test_custom_rate_without_floor() {
        let estimator = DurationEstimator::new(&TimingConfig {
            seconds_per_word: 0.36,
            min_seconds: 1.0,
            max_seconds: 22.0,
        });
        assert_eq!(estimator.estimate(&words(10)), 3.6);
    }

    #[test]
    fn test_deterministic() {
        let text = "The same narration always yields the same duration.";
        assert_eq!(estimate_duration_seconds(text), estimate_duration_seconds(text));
    }
}
