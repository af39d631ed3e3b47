//! Simulation Session
//!
//! One user's in-memory simulation state: market catalog, portfolio, day
//! clock, news caches and the message feed, advanced one day at a time.
//! Every user-triggered operation runs to completion before the next is
//! accepted; independent sessions own isolated copies of everything here.

use crate::domain::collaborators::news_source::NewsSource;
use crate::domain::entities::catalog::MarketCatalog;
use crate::domain::entities::clock::SimulationClock;
use crate::domain::entities::news::{DailyNews, DayAnnotations};
use crate::domain::entities::portfolio::Portfolio;
use crate::domain::errors::{ClockError, NewsError, Severity, TradeError};
use crate::domain::services::confirmation::{
    ConfirmationRegistry, ConfirmationToken, TradeIntent,
};
use crate::domain::services::ledger::{self, PortfolioValuation, TradeReceipt};
use crate::domain::services::price_engine::{
    self, NoiseSource, SectorImpacts, UniformNoise,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A user-visible message with a severity tag, appended by every
/// operation for the presentation layer to display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMessage {
    pub severity: Severity,
    pub text: String,
}

/// Summary of one completed day-advance, returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayReport {
    /// The new current day after the advance.
    pub day: u32,
    /// Articles in the batch that was just priced in.
    pub total_articles: usize,
    /// How many of them had a usable annotation.
    pub annotated_articles: usize,
    pub sector_impacts: SectorImpacts,
}

/// Serializable image of the full session state, used by the persistence
/// collaborator. Pending trade confirmations are deliberately excluded:
/// a restored session starts with no half-answered prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub catalog: MarketCatalog,
    pub portfolio: Portfolio,
    pub clock: SimulationClock,
    pub daily_news: Option<DailyNews>,
    pub previous_news: Option<DailyNews>,
    pub annotations: DayAnnotations,
    pub sector_impacts: SectorImpacts,
    pub messages: Vec<UserMessage>,
}

pub struct SimulationSession {
    catalog: MarketCatalog,
    portfolio: Portfolio,
    clock: SimulationClock,
    daily_news: Option<DailyNews>,
    previous_news: Option<DailyNews>,
    /// Annotations for `previous_news`, keyed by 1-based article index.
    annotations: DayAnnotations,
    /// Sector impact map from the most recent price update.
    sector_impacts: SectorImpacts,
    messages: Vec<UserMessage>,
    confirmations: ConfirmationRegistry,
    news_source: Arc<dyn NewsSource>,
    noise: Box<dyn NoiseSource>,
}

impl SimulationSession {
    /// Start a fresh session with the default seeded market and full
    /// starting cash.
    pub fn new(news_source: Arc<dyn NewsSource>) -> Self {
        let catalog = MarketCatalog::seeded(&mut rand::thread_rng());
        info!(
            "New simulation session: {} instruments across {} sectors",
            catalog.len(),
            catalog.sector_names().count()
        );
        SimulationSession {
            catalog,
            portfolio: Portfolio::default(),
            clock: SimulationClock::default(),
            daily_news: None,
            previous_news: None,
            annotations: DayAnnotations::new(),
            sector_impacts: SectorImpacts::new(),
            messages: Vec::new(),
            confirmations: ConfirmationRegistry::default(),
            news_source,
            noise: Box::new(UniformNoise::from_entropy()),
        }
    }

    /// Rebuild a session from a persisted snapshot.
    pub fn restore(snapshot: SessionSnapshot, news_source: Arc<dyn NewsSource>) -> Self {
        info!("Restoring session at day {}", snapshot.clock.day());
        SimulationSession {
            catalog: snapshot.catalog,
            portfolio: snapshot.portfolio,
            clock: snapshot.clock,
            daily_news: snapshot.daily_news,
            previous_news: snapshot.previous_news,
            annotations: snapshot.annotations,
            sector_impacts: snapshot.sector_impacts,
            messages: snapshot.messages,
            confirmations: ConfirmationRegistry::default(),
            news_source,
            noise: Box::new(UniformNoise::from_entropy()),
        }
    }

    /// Swap the noise source. Used by tests to make price moves exact.
    pub fn set_noise(&mut self, noise: Box<dyn NoiseSource>) {
        self.noise = noise;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            catalog: self.catalog.clone(),
            portfolio: self.portfolio.clone(),
            clock: self.clock.clone(),
            daily_news: self.daily_news.clone(),
            previous_news: self.previous_news.clone(),
            annotations: self.annotations.clone(),
            sector_impacts: self.sector_impacts.clone(),
            messages: self.messages.clone(),
        }
    }

    pub fn catalog(&self) -> &MarketCatalog {
        &self.catalog
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn day(&self) -> u32 {
        self.clock.day()
    }

    pub fn daily_news(&self) -> Option<&DailyNews> {
        self.daily_news.as_ref()
    }

    pub fn previous_news(&self) -> Option<&DailyNews> {
        self.previous_news.as_ref()
    }

    pub fn annotations(&self) -> &DayAnnotations {
        &self.annotations
    }

    pub fn sector_impacts(&self) -> &SectorImpacts {
        &self.sector_impacts
    }

    pub fn messages(&self) -> &[UserMessage] {
        &self.messages
    }

    pub fn push_message(&mut self, severity: Severity, text: impl Into<String>) {
        self.messages.push(UserMessage {
            severity,
            text: text.into(),
        });
    }

    /// Request a fresh news batch for the current day, replacing any
    /// batch already generated today.
    pub async fn generate_news(&mut self) -> Result<DailyNews, NewsError> {
        let day = self.clock.day();
        match self.news_source.generate_daily_news(day).await {
            Ok(articles) => {
                let batch = DailyNews::new(day, articles);
                info!("Generated {} articles for day {}", batch.len(), day);
                self.push_message(
                    Severity::Info,
                    format!("{} news articles arrived for day {}.", batch.len(), day),
                );
                self.daily_news = Some(batch.clone());
                Ok(batch)
            }
            Err(e) => {
                warn!("News generation failed for day {}: {}", day, e);
                self.push_message(
                    Severity::Error,
                    "The newsroom is unavailable right now. Try again shortly.",
                );
                Err(e)
            }
        }
    }

    /// Advance the simulation by one day.
    ///
    /// Refused when no news batch exists for the current day. Otherwise:
    /// the current batch is archived as yesterday's, each article is
    /// annotated (failures degrade to an absent annotation), prices move,
    /// the clock ticks, and a fresh batch is requested for the new day.
    /// There is no rollback past the precondition check.
    pub async fn advance_day(&mut self) -> Result<DayReport, ClockError> {
        let today = match &self.daily_news {
            Some(batch) if !batch.is_empty() => batch.clone(),
            _ => {
                self.push_message(
                    Severity::Warning,
                    "Generate today's news before moving to the next day.",
                );
                return Err(ClockError::EmptyNewsBatch);
            }
        };

        let mut annotations = DayAnnotations::new();
        for (i, article) in today.articles.iter().enumerate() {
            match self.news_source.annotate(article).await {
                Ok(annotation) => {
                    annotations.insert(i + 1, annotation);
                }
                Err(e) => {
                    // Non-fatal: the article simply carries no annotation.
                    warn!("Annotation for article {} unavailable: {}", i + 1, e);
                }
            }
        }
        if annotations.len() < today.len() {
            self.push_message(
                Severity::Warning,
                format!(
                    "{} of {} articles could not be explained today.",
                    today.len() - annotations.len(),
                    today.len()
                ),
            );
        }

        let impacts = price_engine::apply_daily_update(
            &mut self.catalog,
            &today.articles,
            &annotations,
            self.noise.as_mut(),
        );
        debug!("Sector impacts applied: {:?}", impacts);

        let annotated = annotations.len();
        self.previous_news = Some(today.clone());
        self.annotations = annotations;
        self.sector_impacts = impacts.clone();
        self.clock.advance();

        let new_day = self.clock.day();
        info!("Advanced to day {}", new_day);
        self.push_message(Severity::Info, "Market prices have moved overnight.");

        // A generation failure leaves the new day without a batch; the
        // advance itself is already committed.
        match self.news_source.generate_daily_news(new_day).await {
            Ok(articles) => {
                let batch = DailyNews::new(new_day, articles);
                self.push_message(
                    Severity::Info,
                    format!("{} news articles arrived for day {}.", batch.len(), new_day),
                );
                self.daily_news = Some(batch);
            }
            Err(e) => {
                warn!("Fresh news batch failed for day {}: {}", new_day, e);
                self.daily_news = None;
                self.push_message(
                    Severity::Warning,
                    "No news could be fetched for the new day yet.",
                );
            }
        }

        Ok(DayReport {
            day: new_day,
            total_articles: today.len(),
            annotated_articles: annotated,
            sector_impacts: impacts,
        })
    }

    /// First phase of a trade: park the intent and hand back a token for
    /// the presentation layer's confirm/cancel prompt.
    pub fn request_trade(&mut self, intent: TradeIntent) -> ConfirmationToken {
        debug!("Trade requested: {:?}", intent);
        let token = self.confirmations.request(intent);
        self.push_message(Severity::Info, "Trade awaiting confirmation.");
        token
    }

    /// Second phase: execute the parked intent through the ledger.
    pub fn confirm_trade(&mut self, token: ConfirmationToken) -> Result<TradeReceipt, TradeError> {
        let intent = self.confirmations.confirm(token)?;
        let result = match &intent {
            TradeIntent::Buy {
                instrument,
                quantity,
            } => ledger::buy(&mut self.portfolio, &self.catalog, instrument, *quantity),
            TradeIntent::Sell {
                instrument,
                quantity,
            } => ledger::sell(&mut self.portfolio, &self.catalog, instrument, *quantity),
        };

        match &result {
            Ok(receipt) => {
                let verb = match intent {
                    TradeIntent::Buy { .. } => "Bought",
                    TradeIntent::Sell { .. } => "Sold",
                };
                info!(
                    "{} {} x {} @ {} (total {})",
                    verb, receipt.quantity, receipt.instrument, receipt.unit_price, receipt.total
                );
                self.push_message(
                    Severity::Success,
                    format!(
                        "{} {} shares of {} for {} units.",
                        verb, receipt.quantity, receipt.instrument, receipt.total
                    ),
                );
            }
            Err(e) => {
                self.push_message(e.severity(), e.to_string());
            }
        }

        result
    }

    /// Discard a parked intent.
    pub fn cancel_trade(&mut self, token: ConfirmationToken) -> Result<(), TradeError> {
        let intent = self.confirmations.cancel(token)?;
        self.push_message(
            Severity::Info,
            format!("Trade on {} cancelled.", intent.instrument()),
        );
        Ok(())
    }

    /// Value the portfolio at current market prices.
    pub fn valuation(&self) -> PortfolioValuation {
        ledger::valuation(&self.portfolio, &self.catalog)
    }
}
