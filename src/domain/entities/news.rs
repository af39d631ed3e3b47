use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A day's batch of news articles, at most [`NEWS_PER_DAY`] of them.
/// Articles are immutable once generated and referenced by 1-based index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyNews {
    pub day: u32,
    pub articles: Vec<String>,
}

/// Maximum number of articles generated per simulated day.
pub const NEWS_PER_DAY: usize = 5;

impl DailyNews {
    pub fn new(day: u32, mut articles: Vec<String>) -> Self {
        articles.truncate(NEWS_PER_DAY);
        DailyNews { day, articles }
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }
}

/// Explanation and sector tags derived externally from one news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsAnnotation {
    pub explanation: String,
    pub sectors: BTreeSet<String>,
}

/// Annotations for one day's batch, keyed by the article's 1-based index.
/// Articles whose annotation failed or was never requested are absent.
pub type DayAnnotations = BTreeMap<usize, NewsAnnotation>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_news_truncates_to_limit() {
        let articles = (0..8).map(|i| format!("article {}", i)).collect();
        let news = DailyNews::new(1, articles);
        assert_eq!(news.len(), NEWS_PER_DAY);
    }

    #[test]
    fn test_empty_batch() {
        let news = DailyNews::new(3, vec![]);
        assert!(news.is_empty());
        assert_eq!(news.day, 3);
    }
}
