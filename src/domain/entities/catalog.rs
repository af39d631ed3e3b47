//! Market Catalog
//!
//! Static registry of sectors and the instruments they own. Sector
//! membership is fixed at construction; instruments live for the process
//! lifetime and are mutated only by the price update engine.

use super::instrument::Instrument;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

struct InstrumentTemplate {
    name: &'static str,
    profile: &'static str,
    price_range: (u64, u64),
}

struct SectorTemplate {
    name: &'static str,
    instruments: &'static [InstrumentTemplate],
}

/// The default classroom market: fictional companies grouped by industry,
/// each seeded with a randomized starting price from its template range.
const DEFAULT_MARKET: &[SectorTemplate] = &[
    SectorTemplate {
        name: "Technology",
        instruments: &[
            InstrumentTemplate {
                name: "Lumenar Electronics",
                profile: "Builds the bright screens used in phones, tablets and school \
                          whiteboards, plus the chips that drive them.",
                price_range: (45_000, 65_000),
            },
            InstrumentTemplate {
                name: "Quartzon Semiconductor",
                profile: "Makes the tiny memory chips inside computers and game consoles. \
                          One of the largest chip factories in the country.",
                price_range: (90_000, 130_000),
            },
        ],
    },
    SectorTemplate {
        name: "Automotive",
        instruments: &[
            InstrumentTemplate {
                name: "Taran Motors",
                profile: "The country's best known car maker. Builds family cars, buses \
                          and a growing line of electric vehicles.",
                price_range: (150_000, 250_000),
            },
            InstrumentTemplate {
                name: "Orbia Mobility",
                profile: "Supplies batteries and self-driving sensors to car makers around \
                          the world.",
                price_range: (60_000, 90_000),
            },
        ],
    },
    SectorTemplate {
        name: "Energy",
        instruments: &[
            InstrumentTemplate {
                name: "Northwind Power",
                profile: "Runs wind farms along the coast and sells the electricity that \
                          lights up homes and schools.",
                price_range: (15_000, 25_000),
            },
            InstrumentTemplate {
                name: "Solvena Energy",
                profile: "Builds solar panel parks and develops new ways to store clean \
                          energy for cloudy days.",
                price_range: (30_000, 50_000),
            },
        ],
    },
    SectorTemplate {
        name: "Internet",
        instruments: &[
            InstrumentTemplate {
                name: "Bluereef Search",
                profile: "Runs the search engine most people use every day, along with \
                          maps, mail and an online encyclopedia for students.",
                price_range: (200_000, 300_000),
            },
            InstrumentTemplate {
                name: "Pingo Messenger",
                profile: "Makes the chat app families use to share photos and stickers. \
                          Also runs a payment service and a taxi app.",
                price_range: (40_000, 60_000),
            },
        ],
    },
    SectorTemplate {
        name: "Consumer Goods",
        instruments: &[
            InstrumentTemplate {
                name: "Harume Cosmetics",
                profile: "Creates soaps, shampoos and skin creams sold in shops across \
                          the region.",
                price_range: (130_000, 170_000),
            },
            InstrumentTemplate {
                name: "Cloverhome Living",
                profile: "Makes everyday household goods: toothbrushes, detergents, \
                          kitchenware and cleaning supplies.",
                price_range: (60_000, 80_000),
            },
        ],
    },
    SectorTemplate {
        name: "Finance",
        instruments: &[
            InstrumentTemplate {
                name: "Granite Trust Bank",
                profile: "A large bank where people keep savings accounts and borrow \
                          money to buy homes.",
                price_range: (50_000, 60_000),
            },
            InstrumentTemplate {
                name: "Meridian Holdings",
                profile: "Owns a bank, an insurance company and a credit card service \
                          under one roof.",
                price_range: (30_000, 40_000),
            },
        ],
    },
    SectorTemplate {
        name: "Construction",
        instruments: &[
            InstrumentTemplate {
                name: "Stonegate Builders",
                profile: "Builds apartment towers, bridges and tunnels. Famous for some \
                          of the tallest buildings in the capital.",
                price_range: (100_000, 150_000),
            },
            InstrumentTemplate {
                name: "Archon Development",
                profile: "Specializes in roads, railways and airport terminals at home \
                          and abroad.",
                price_range: (30_000, 50_000),
            },
        ],
    },
    SectorTemplate {
        name: "Retail",
        instruments: &[
            InstrumentTemplate {
                name: "Sunmart Stores",
                profile: "Runs the big discount markets where families do their weekly \
                          grocery shopping.",
                price_range: (100_000, 150_000),
            },
            InstrumentTemplate {
                name: "Parkside Department",
                profile: "Operates department stores and a popular online shopping mall.",
                price_range: (150_000, 250_000),
            },
        ],
    },
    SectorTemplate {
        name: "Biotech",
        instruments: &[
            InstrumentTemplate {
                name: "Celvita Biologics",
                profile: "Manufactures advanced medicines grown from living cells for \
                          hospitals around the world.",
                price_range: (700_000, 900_000),
            },
            InstrumentTemplate {
                name: "Genomica Labs",
                profile: "Researches new treatments for serious illnesses and sells \
                          affordable copies of expensive medicines.",
                price_range: (180_000, 250_000),
            },
        ],
    },
    SectorTemplate {
        name: "Food",
        instruments: &[
            InstrumentTemplate {
                name: "Oriole Snacks",
                profile: "Bakes the chocolate pies and potato chips found in every \
                          school lunchbox.",
                price_range: (120_000, 180_000),
            },
            InstrumentTemplate {
                name: "Noodle & Grain Co.",
                profile: "The country's favorite instant-noodle maker, loved for its \
                          spicy ramen and shrimp crackers.",
                price_range: (300_000, 400_000),
            },
        ],
    },
];

/// Sector names of the default market, for callers that need the list
/// without building a catalog.
pub fn default_sector_names() -> Vec<String> {
    DEFAULT_MARKET
        .iter()
        .map(|sector| sector.name.to_string())
        .collect()
}

/// Ordered registry of sectors and their instruments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketCatalog {
    sectors: BTreeMap<String, BTreeMap<String, Instrument>>,
}

impl MarketCatalog {
    /// Build the default market, drawing each starting price uniformly
    /// from the instrument's template range.
    pub fn seeded<R: Rng>(rng: &mut R) -> Self {
        let mut sectors = BTreeMap::new();
        for sector in DEFAULT_MARKET {
            let mut instruments = BTreeMap::new();
            for tmpl in sector.instruments {
                let (lo, hi) = tmpl.price_range;
                let seed_price = rng.gen_range(lo..=hi);
                instruments.insert(
                    tmpl.name.to_string(),
                    Instrument::new(tmpl.name, sector.name, tmpl.profile, seed_price),
                );
            }
            sectors.insert(sector.name.to_string(), instruments);
        }
        MarketCatalog { sectors }
    }

    /// Insert an instrument under its sector. Used to assemble small
    /// fixed catalogs; the default market comes from [`MarketCatalog::seeded`].
    pub fn insert(&mut self, instrument: Instrument) {
        self.sectors
            .entry(instrument.sector.clone())
            .or_default()
            .insert(instrument.name.clone(), instrument);
    }

    pub fn contains_sector(&self, sector: &str) -> bool {
        self.sectors.contains_key(sector)
    }

    pub fn sector_names(&self) -> impl Iterator<Item = &str> {
        self.sectors.keys().map(String::as_str)
    }

    /// Look up an instrument by name across all sectors.
    pub fn instrument(&self, name: &str) -> Option<&Instrument> {
        self.sectors.values().find_map(|stocks| stocks.get(name))
    }

    /// Iterate all instruments in sector order, then name order.
    pub fn instruments(&self) -> impl Iterator<Item = &Instrument> {
        self.sectors.values().flat_map(|stocks| stocks.values())
    }

    pub fn instruments_mut(&mut self) -> impl Iterator<Item = &mut Instrument> {
        self.sectors.values_mut().flat_map(|stocks| stocks.values_mut())
    }

    pub fn len(&self) -> usize {
        self.sectors.values().map(|stocks| stocks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_seeded_catalog_covers_all_sectors() {
        let mut rng = StdRng::seed_from_u64(7);
        let catalog = MarketCatalog::seeded(&mut rng);

        assert_eq!(catalog.sector_names().count(), DEFAULT_MARKET.len());
        assert_eq!(catalog.len(), 20);
        assert!(catalog.contains_sector("Technology"));
        assert!(!catalog.contains_sector("Shipbuilding"));
    }

    #[test]
    fn test_seed_prices_within_template_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let catalog = MarketCatalog::seeded(&mut rng);

        let inst = catalog.instrument("Granite Trust Bank").unwrap();
        assert!(inst.current_price() >= 50_000 && inst.current_price() <= 60_000);
        assert_eq!(inst.sector, "Finance");
        assert_eq!(inst.price_history().len(), 1);
    }

    #[test]
    fn test_instrument_lookup_by_name() {
        let mut rng = StdRng::seed_from_u64(1);
        let catalog = MarketCatalog::seeded(&mut rng);

        assert!(catalog.instrument("Pingo Messenger").is_some());
        assert!(catalog.instrument("Unlisted Corp").is_none());
    }
}
