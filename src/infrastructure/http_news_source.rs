//! # HTTP News Source
//!
//! [`NewsSource`] implementation backed by a remote text-generation API.
//! The service is asked to write short classroom-level market news and,
//! separately, to explain an article and tag the sectors it concerns.
//!
//! ## Wire format
//!
//! One endpoint, `POST {base}/v1/generate`, accepting
//! `{"model": ..., "prompt": ...}` and answering `{"text": ...}`.
//! Articles come back separated by `## News N` headings; annotations as
//! `Explanation:` and `Related sectors:` lines, with `none` meaning no
//! related sector.

use crate::domain::collaborators::news_source::{NewsResult, NewsSource};
use crate::domain::entities::news::{NewsAnnotation, NEWS_PER_DAY};
use crate::domain::errors::NewsError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// HTTP news source configuration
#[derive(Debug, Clone)]
pub struct HttpNewsConfig {
    pub api_base: String,
    pub model: String,
    pub api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    text: String,
}

/// Text-generation client for daily news and annotations.
pub struct HttpNewsSource {
    client: Client,
    config: HttpNewsConfig,
    /// Sector names offered to the model when tagging articles.
    sectors: Vec<String>,
}

impl std::fmt::Debug for HttpNewsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpNewsSource")
            .field("config", &self.config.api_base)
            .field("model", &self.config.model)
            .field("api_key", &"<REDACTED>")
            .finish()
    }
}

impl HttpNewsSource {
    pub fn new(config: HttpNewsConfig, sectors: Vec<String>) -> Self {
        HttpNewsSource {
            client: Client::new(),
            config,
            sectors,
        }
    }

    async fn complete(&self, prompt: String) -> Result<String, reqwest::Error> {
        let url = format!("{}/v1/generate", self.config.api_base);
        debug!("Requesting completion from {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&GenerateRequest {
                model: &self.config.model,
                prompt,
            })
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;
        Ok(response.text)
    }

    fn news_prompt(&self, day: u32) -> String {
        format!(
            "Write {count} short news articles about the economy and the stock market \
             for day {day} of a classroom trading game, in language a sixth grader \
             understands. Do not name any specific company. Mix encouraging, worrying \
             and neutral stories without labelling them. Start each article with \
             \"## News [number]\".",
            count = NEWS_PER_DAY,
            day = day,
        )
    }

    fn annotation_prompt(&self, article: &str) -> String {
        format!(
            "Article:\n{article}\n\nSummarize the article's key point for a sixth \
             grader in at most three sentences after \"Explanation:\". Then, after \
             \"Related sectors:\", list one or two of these sectors the article \
             concerns, comma separated, or \"none\": {sectors}.",
            article = article,
            sectors = self.sectors.join(", "),
        )
    }
}

/// Split a completion into articles on `## News ` headings.
fn parse_articles(text: &str) -> Vec<String> {
    text.split("## News ")
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            // Drop the leading article number, if present.
            chunk
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .trim_start()
                .to_string()
        })
        .filter(|article| !article.is_empty())
        .collect()
}

/// Extract the `Explanation:` and `Related sectors:` fields.
fn parse_annotation(text: &str) -> NewsAnnotation {
    let explanation = match text.find("Explanation:") {
        Some(start) => {
            let rest = &text[start + "Explanation:".len()..];
            match rest.find("Related sectors:") {
                Some(end) => rest[..end].trim().to_string(),
                None => rest.trim().to_string(),
            }
        }
        None => String::new(),
    };

    let mut sectors = BTreeSet::new();
    if let Some(start) = text.find("Related sectors:") {
        let rest = text[start + "Related sectors:".len()..].trim();
        let line = rest.lines().next().unwrap_or("");
        if !line.eq_ignore_ascii_case("none") {
            sectors = line
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    NewsAnnotation {
        explanation,
        sectors,
    }
}

#[async_trait]
impl NewsSource for HttpNewsSource {
    fn name(&self) -> &str {
        "HttpNewsSource"
    }

    async fn generate_daily_news(&self, day: u32) -> NewsResult<Vec<String>> {
        let text = self
            .complete(self.news_prompt(day))
            .await
            .map_err(|e| NewsError::GenerationFailed(e.to_string()))?;

        let mut articles = parse_articles(&text);
        articles.truncate(NEWS_PER_DAY);
        if articles.is_empty() {
            return Err(NewsError::GenerationFailed(
                "completion contained no articles".to_string(),
            ));
        }
        Ok(articles)
    }

    async fn annotate(&self, article: &str) -> NewsResult<NewsAnnotation> {
        let text = self
            .complete(self.annotation_prompt(article))
            .await
            .map_err(|e| NewsError::AnnotationUnavailable(e.to_string()))?;
        Ok(parse_annotation(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_articles_splits_on_headings() {
        let text = "## News 1\nChip exports keep rising.\n\n## News 2\nRain slows builders.";
        let articles = parse_articles(text);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0], "Chip exports keep rising.");
        assert_eq!(articles[1], "Rain slows builders.");
    }

    #[test]
    fn test_parse_articles_ignores_preamble() {
        let text = "Here are your articles:\n## News 1\nOnly one today.";
        let articles = parse_articles(text);
        assert_eq!(articles, vec!["Here are your articles:".to_string(), "Only one today.".to_string()]);
    }

    #[test]
    fn test_parse_annotation_full() {
        let text = "Explanation: Chip makers are doing well.\nRelated sectors: Technology, Internet";
        let annotation = parse_annotation(text);
        assert_eq!(annotation.explanation, "Chip makers are doing well.");
        assert!(annotation.sectors.contains("Technology"));
        assert!(annotation.sectors.contains("Internet"));
    }

    #[test]
    fn test_parse_annotation_none_sectors() {
        let text = "Explanation: Nothing much happened.\nRelated sectors: none";
        let annotation = parse_annotation(text);
        assert!(annotation.sectors.is_empty());
    }

    #[test]
    fn test_parse_annotation_missing_fields() {
        let annotation = parse_annotation("The model rambled without structure.");
        assert!(annotation.explanation.is_empty());
        assert!(annotation.sectors.is_empty());
    }
}
