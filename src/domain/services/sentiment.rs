//! Sentiment Extractor
//!
//! Keyword-rule classifier for news articles. This is an explicit rule
//! table, not NLP: an article counts as Positive or Negative purely by
//! substring presence of a fixed keyword, with Positive winning ties.

use serde::{Deserialize, Serialize};

/// Coarse tone of a news article, driving the sector price bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

const POSITIVE_KEYWORDS: &[&str] = &["rise", "growth", "favorable", "promising", "boom"];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "fall",
    "decline",
    "unfavorable",
    "hardship",
    "recession",
    "crisis",
];

impl Sentiment {
    /// Numeric direction used by the price update engine.
    pub fn direction(self) -> i32 {
        match self {
            Sentiment::Positive => 1,
            Sentiment::Negative => -1,
            Sentiment::Neutral => 0,
        }
    }
}

/// Classify an article's tone. Positive keywords take priority over
/// negative ones when both are present.
pub fn classify(text: &str) -> Sentiment {
    if POSITIVE_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        Sentiment::Positive
    } else if NEGATIVE_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_keyword() {
        assert_eq!(
            classify("Analysts expect strong growth in chip exports this year."),
            Sentiment::Positive
        );
    }

    #[test]
    fn test_negative_keyword() {
        assert_eq!(
            classify("Economists warn a recession may be approaching."),
            Sentiment::Negative
        );
    }

    #[test]
    fn test_neutral_when_no_keyword() {
        assert_eq!(
            classify("The central bank kept its policy unchanged today."),
            Sentiment::Neutral
        );
    }

    #[test]
    fn test_positive_wins_tie() {
        assert_eq!(
            classify("Despite the recession, tourism shows remarkable growth."),
            Sentiment::Positive
        );
    }

    #[test]
    fn test_direction_values() {
        assert_eq!(Sentiment::Positive.direction(), 1);
        assert_eq!(Sentiment::Negative.direction(), -1);
        assert_eq!(Sentiment::Neutral.direction(), 0);
    }
}
