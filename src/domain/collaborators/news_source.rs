//! News Source Trait
//!
//! This module defines the `NewsSource` trait, the seam to the external
//! text-generation collaborator that writes the day's articles and the
//! explanations/sector tags derived from them.
//!
//! ## Benefits
//! - Decouples the simulation engine from any particular text service
//! - Enables easy mocking for testing
//! - Allows an offline scripted source for classrooms without API access

use crate::domain::entities::news::NewsAnnotation;
use crate::domain::errors::NewsError;
use async_trait::async_trait;

/// Common result type for news-source operations
pub type NewsResult<T> = Result<T, NewsError>;

/// External text-generation collaborator.
///
/// Calls are synchronous from the engine's perspective: the caller awaits
/// them inline and there is no cancellation hook. An annotation failure is
/// transient and must be treated as "no annotation for this article".
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Get the name of this news source
    fn name(&self) -> &str;

    /// Generate the day's batch of articles.
    ///
    /// # Arguments
    /// * `day` - The simulated day the batch is for
    ///
    /// # Returns
    /// Up to five article texts, in presentation order
    async fn generate_daily_news(&self, day: u32) -> NewsResult<Vec<String>>;

    /// Derive an explanation and sector tags from one article.
    ///
    /// # Arguments
    /// * `article` - The article text to annotate
    async fn annotate(&self, article: &str) -> NewsResult<NewsAnnotation>;
}
