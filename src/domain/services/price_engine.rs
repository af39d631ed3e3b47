//! Price Update Engine
//!
//! Applies one simulated day of price movement to every instrument:
//! a sector-level bias accumulated from annotated news sentiment, plus an
//! independent uniform noise term per instrument. The tuning constants
//! below set the game's balance; saved sessions assume they stay fixed.

use crate::domain::entities::catalog::MarketCatalog;
use crate::domain::entities::news::DayAnnotations;
use crate::domain::services::sentiment;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

/// Sector bias contributed by one annotated article, signed by sentiment.
pub const SECTOR_IMPACT_PER_ARTICLE: f64 = 0.05;

/// Half-width of the per-instrument uniform noise interval.
pub const DAILY_NOISE: f64 = 0.02;

/// Hard clamp on the total daily change rate.
pub const MAX_DAILY_MOVE: f64 = 0.30;

/// Per-sector accumulated news impact for one day.
pub type SectorImpacts = BTreeMap<String, f64>;

/// Source of the per-instrument noise term. Production draws from a
/// uniform distribution; tests substitute a fixed value.
pub trait NoiseSource: Send {
    fn draw(&mut self) -> f64;
}

/// Uniform noise over [-DAILY_NOISE, DAILY_NOISE).
pub struct UniformNoise {
    rng: StdRng,
}

impl UniformNoise {
    pub fn from_entropy() -> Self {
        UniformNoise {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        UniformNoise {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl NoiseSource for UniformNoise {
    fn draw(&mut self) -> f64 {
        self.rng.gen_range(-DAILY_NOISE..DAILY_NOISE)
    }
}

/// Accumulate the day's sector impacts from annotated articles.
///
/// Sentiment is classified from the article text itself; the annotation
/// only supplies the sector tags. Unknown sector names are ignored, and
/// articles without an annotation contribute nothing.
pub fn sector_impacts(
    catalog: &MarketCatalog,
    articles: &[String],
    annotations: &DayAnnotations,
) -> SectorImpacts {
    let mut impacts: SectorImpacts = catalog
        .sector_names()
        .map(|name| (name.to_string(), 0.0))
        .collect();

    for (i, article) in articles.iter().enumerate() {
        let Some(annotation) = annotations.get(&(i + 1)) else {
            continue;
        };
        let direction = sentiment::classify(article).direction();
        for sector in &annotation.sectors {
            if let Some(impact) = impacts.get_mut(sector.as_str()) {
                *impact += direction as f64 * SECTOR_IMPACT_PER_ARTICLE;
            }
        }
    }

    impacts
}

/// Advance every instrument by one day.
///
/// Each instrument's change rate is its sector impact plus an independent
/// noise draw, clamped to [-MAX_DAILY_MOVE, MAX_DAILY_MOVE]. The new price
/// is floored to a whole unit and never drops below 1; exactly one entry
/// is appended to each price history.
///
/// Returns the sector impact map so the session can cache it for display.
pub fn apply_daily_update(
    catalog: &mut MarketCatalog,
    articles: &[String],
    annotations: &DayAnnotations,
    noise: &mut dyn NoiseSource,
) -> SectorImpacts {
    let impacts = sector_impacts(catalog, articles, annotations);

    for instrument in catalog.instruments_mut() {
        let impact = impacts.get(&instrument.sector).copied().unwrap_or(0.0);
        let change_rate = (noise.draw() + impact).clamp(-MAX_DAILY_MOVE, MAX_DAILY_MOVE);
        let new_price = (instrument.current_price() as f64 * (1.0 + change_rate)).floor();
        instrument.record_price((new_price as u64).max(1));
    }

    impacts
}
