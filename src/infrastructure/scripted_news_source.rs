//! Scripted News Source
//!
//! Deterministic, offline implementation of [`NewsSource`] for classrooms
//! without API access and for tests. Articles rotate through a fixed
//! library; annotations come from the same script.

use crate::domain::collaborators::news_source::{NewsResult, NewsSource};
use crate::domain::entities::news::{NewsAnnotation, NEWS_PER_DAY};
use crate::domain::errors::NewsError;
use async_trait::async_trait;
use std::collections::BTreeSet;

struct ScriptedArticle {
    text: &'static str,
    explanation: &'static str,
    sectors: &'static [&'static str],
}

const SCRIPT: &[ScriptedArticle] = &[
    ScriptedArticle {
        text: "Semiconductor exports posted a sharp rise last month, and chip factories \
               are adding weekend shifts to keep up with worldwide demand.",
        explanation: "Chip makers are selling more than they can produce, so technology \
                      companies may earn more money.",
        sectors: &["Technology"],
    },
    ScriptedArticle {
        text: "Heavy spring rains flooded building sites across the south, and builders \
               warn of a decline in new apartment projects this season.",
        explanation: "Bad weather is delaying construction work, which could mean less \
                      income for building companies.",
        sectors: &["Construction"],
    },
    ScriptedArticle {
        text: "A favorable harvest has lowered flour and sugar prices, and snack makers \
               expect their tastiest quarter in years.",
        explanation: "Cheaper ingredients mean food companies spend less to make their \
                      products.",
        sectors: &["Food"],
    },
    ScriptedArticle {
        text: "Shopping districts report a weekend sales boom as families return to \
               stores for the holiday season.",
        explanation: "People are buying more in shops, which is good news for retailers.",
        sectors: &["Retail"],
    },
    ScriptedArticle {
        text: "The central bank kept interest rates unchanged and said it would watch \
               consumer prices closely through the autumn.",
        explanation: "Borrowing costs stay the same for now, so little changes for banks \
                      either way.",
        sectors: &["Finance"],
    },
    ScriptedArticle {
        text: "A battery recall has brought fresh hardship to car makers, with thousands \
               of vehicles returning to the workshops.",
        explanation: "Fixing the recalled cars will cost the car companies a lot of money.",
        sectors: &["Automotive"],
    },
    ScriptedArticle {
        text: "Coastal wind farms produced record amounts of electricity this month, a \
               promising sign for clean power suppliers.",
        explanation: "Wind power companies generated and sold more electricity than \
                      expected.",
        sectors: &["Energy"],
    },
    ScriptedArticle {
        text: "A nationwide data outage left millions unable to send messages overnight, \
               a crisis the chat operator is racing to contain.",
        explanation: "The messaging service broke down, and users may lose trust in the \
                      company.",
        sectors: &["Internet"],
    },
    ScriptedArticle {
        text: "Cosmetics exporters report steady growth in overseas orders for skincare \
               and shampoo lines.",
        explanation: "Beauty and household product makers are selling more abroad.",
        sectors: &["Consumer Goods"],
    },
    ScriptedArticle {
        text: "Disappointing trial results have some investors fearing a recession in \
               biotech funding next year.",
        explanation: "Medicine research is not going well, so investors may put less \
                      money into biotech companies.",
        sectors: &["Biotech"],
    },
];

/// Offline news source backed by the fixed script above.
#[derive(Debug, Default)]
pub struct ScriptedNewsSource;

#[async_trait]
impl NewsSource for ScriptedNewsSource {
    fn name(&self) -> &str {
        "ScriptedNewsSource"
    }

    async fn generate_daily_news(&self, day: u32) -> NewsResult<Vec<String>> {
        let start = ((day as usize - 1) * NEWS_PER_DAY) % SCRIPT.len();
        let articles = (0..NEWS_PER_DAY)
            .map(|i| SCRIPT[(start + i) % SCRIPT.len()].text.to_string())
            .collect();
        Ok(articles)
    }

    async fn annotate(&self, article: &str) -> NewsResult<NewsAnnotation> {
        SCRIPT
            .iter()
            .find(|entry| entry.text == article)
            .map(|entry| NewsAnnotation {
                explanation: entry.explanation.to_string(),
                sectors: entry
                    .sectors
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<BTreeSet<_>>(),
            })
            .ok_or_else(|| {
                NewsError::AnnotationUnavailable("article is not part of the script".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generates_full_batches() {
        let source = ScriptedNewsSource;
        let day1 = source.generate_daily_news(1).await.unwrap();
        let day2 = source.generate_daily_news(2).await.unwrap();

        assert_eq!(day1.len(), NEWS_PER_DAY);
        assert_eq!(day2.len(), NEWS_PER_DAY);
        assert_ne!(day1, day2);
    }

    #[tokio::test]
    async fn test_generation_is_deterministic_per_day() {
        let source = ScriptedNewsSource;
        assert_eq!(
            source.generate_daily_news(3).await.unwrap(),
            source.generate_daily_news(3).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_annotates_scripted_articles() {
        let source = ScriptedNewsSource;
        let articles = source.generate_daily_news(1).await.unwrap();

        let annotation = source.annotate(&articles[0]).await.unwrap();
        assert!(annotation.sectors.contains("Technology"));
        assert!(!annotation.explanation.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_article_is_unavailable() {
        let source = ScriptedNewsSource;
        let result = source.annotate("Something never scripted.").await;
        assert!(matches!(result, Err(NewsError::AnnotationUnavailable(_))));
    }
}
