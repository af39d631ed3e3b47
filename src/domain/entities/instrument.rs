use serde::{Deserialize, Serialize};

/// A single tradable stock in the simulated market.
///
/// Prices are whole currency units and never drop below 1. The price
/// history is append-only and chronological; its last element always
/// equals `current_price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    pub name: String,
    pub sector: String,
    /// Short company profile shown to learners by the presentation layer.
    pub profile: String,
    current_price: u64,
    price_history: Vec<u64>,
}

impl Instrument {
    pub fn new(
        name: impl Into<String>,
        sector: impl Into<String>,
        profile: impl Into<String>,
        seed_price: u64,
    ) -> Self {
        let seed_price = seed_price.max(1);
        Instrument {
            name: name.into(),
            sector: sector.into(),
            profile: profile.into(),
            current_price: seed_price,
            price_history: vec![seed_price],
        }
    }

    pub fn current_price(&self) -> u64 {
        self.current_price
    }

    pub fn price_history(&self) -> &[u64] {
        &self.price_history
    }

    /// Record the next daily price, appending it to the history.
    ///
    /// Callers are expected to have already floored and clamped the value;
    /// the floor at 1 unit is enforced here as the invariant of last resort.
    pub fn record_price(&mut self, price: u64) {
        self.current_price = price.max(1);
        self.price_history.push(self.current_price);
    }

    /// Percent change of the latest daily step, or `None` until two
    /// history points exist.
    pub fn daily_change_pct(&self) -> Option<f64> {
        let n = self.price_history.len();
        if n < 2 {
            return None;
        }
        let previous = self.price_history[n - 2] as f64;
        let current = self.price_history[n - 1] as f64;
        Some((current - previous) / previous * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_seeded_history() {
        let inst = Instrument::new("Lumenar Electronics", "Technology", "Makes screens.", 50_000);
        assert_eq!(inst.current_price(), 50_000);
        assert_eq!(inst.price_history(), &[50_000]);
    }

    #[test]
    fn test_record_price_appends() {
        let mut inst = Instrument::new("Lumenar Electronics", "Technology", "Makes screens.", 100);
        inst.record_price(110);
        inst.record_price(99);
        assert_eq!(inst.current_price(), 99);
        assert_eq!(inst.price_history(), &[100, 110, 99]);
    }

    #[test]
    fn test_price_floor_at_one() {
        let mut inst = Instrument::new("Lumenar Electronics", "Technology", "Makes screens.", 2);
        inst.record_price(0);
        assert_eq!(inst.current_price(), 1);
    }

    #[test]
    fn test_daily_change_pct() {
        let mut inst = Instrument::new("Lumenar Electronics", "Technology", "Makes screens.", 100);
        assert!(inst.daily_change_pct().is_none());
        inst.record_price(110);
        let change = inst.daily_change_pct().unwrap();
        assert!((change - 10.0).abs() < 1e-9);
    }
}
