use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Starting cash balance for every new simulation session.
pub const INITIAL_CASH: u64 = 10_000_000;

/// A position in one instrument. Exists only while `quantity > 0`; the
/// ledger removes it on full liquidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub quantity: u32,
    /// Weighted-average purchase price per share across all buys.
    pub average_cost: f64,
}

/// Cash balance plus per-instrument holdings. Cash and holdings mutate
/// only through ledger operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    cash: u64,
    holdings: BTreeMap<String, Holding>,
}

impl Default for Portfolio {
    fn default() -> Self {
        Portfolio::new(INITIAL_CASH)
    }
}

impl Portfolio {
    pub fn new(cash: u64) -> Self {
        Portfolio {
            cash,
            holdings: BTreeMap::new(),
        }
    }

    pub fn cash(&self) -> u64 {
        self.cash
    }

    pub fn holding(&self, instrument: &str) -> Option<&Holding> {
        self.holdings.get(instrument)
    }

    pub fn holdings(&self) -> &BTreeMap<String, Holding> {
        &self.holdings
    }

    pub(crate) fn debit_cash(&mut self, amount: u64) {
        debug_assert!(amount <= self.cash);
        self.cash -= amount;
    }

    pub(crate) fn credit_cash(&mut self, amount: u64) {
        self.cash += amount;
    }

    /// Add shares, creating the holding on first buy or folding the new
    /// lot into the weighted-average cost otherwise.
    pub(crate) fn add_shares(&mut self, instrument: &str, quantity: u32, unit_price: u64) {
        match self.holdings.get_mut(instrument) {
            Some(holding) => {
                let old_qty = holding.quantity as f64;
                let new_qty = old_qty + quantity as f64;
                holding.average_cost = (holding.average_cost * old_qty
                    + (unit_price * quantity as u64) as f64)
                    / new_qty;
                holding.quantity += quantity;
            }
            None => {
                self.holdings.insert(
                    instrument.to_string(),
                    Holding {
                        quantity,
                        average_cost: unit_price as f64,
                    },
                );
            }
        }
    }

    /// Remove shares; deletes the holding entirely when quantity hits 0.
    /// The caller must have verified the held quantity beforehand.
    pub(crate) fn remove_shares(&mut self, instrument: &str, quantity: u32) {
        if let Some(holding) = self.holdings.get_mut(instrument) {
            debug_assert!(quantity <= holding.quantity);
            holding.quantity -= quantity;
            if holding.quantity == 0 {
                self.holdings.remove(instrument);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_portfolio_starts_with_initial_cash() {
        let portfolio = Portfolio::default();
        assert_eq!(portfolio.cash(), INITIAL_CASH);
        assert!(portfolio.holdings().is_empty());
    }

    #[test]
    fn test_first_buy_sets_average_cost_to_unit_price() {
        let mut portfolio = Portfolio::default();
        portfolio.add_shares("Taran Motors", 10, 100);

        let holding = portfolio.holding("Taran Motors").unwrap();
        assert_eq!(holding.quantity, 10);
        assert_eq!(holding.average_cost, 100.0);
    }

    #[test]
    fn test_weighted_average_cost_across_buys() {
        let mut portfolio = Portfolio::default();
        portfolio.add_shares("Taran Motors", 10, 100);
        portfolio.add_shares("Taran Motors", 10, 200);

        let holding = portfolio.holding("Taran Motors").unwrap();
        assert_eq!(holding.quantity, 20);
        assert_eq!(holding.average_cost, 150.0);
    }

    #[test]
    fn test_full_liquidation_removes_holding() {
        let mut portfolio = Portfolio::default();
        portfolio.add_shares("Taran Motors", 5, 100);
        portfolio.remove_shares("Taran Motors", 5);

        assert!(portfolio.holding("Taran Motors").is_none());
    }

    #[test]
    fn test_partial_sell_keeps_average_cost() {
        let mut portfolio = Portfolio::default();
        portfolio.add_shares("Taran Motors", 10, 100);
        portfolio.remove_shares("Taran Motors", 4);

        let holding = portfolio.holding("Taran Motors").unwrap();
        assert_eq!(holding.quantity, 6);
        assert_eq!(holding.average_cost, 100.0);
    }
}
