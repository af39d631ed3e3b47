//! Portfolio Ledger
//!
//! Executes buy and sell orders against a portfolio with all-or-nothing
//! validation, and produces portfolio valuations. Average cost follows the
//! weighted-average accounting rule, which determines realized profit or
//! loss on later sells.

use crate::domain::entities::catalog::MarketCatalog;
use crate::domain::entities::portfolio::{Portfolio, INITIAL_CASH};
use crate::domain::errors::TradeError;
use serde::{Deserialize, Serialize};

/// Result of a successfully executed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub instrument: String,
    pub quantity: u32,
    pub unit_price: u64,
    pub total: u64,
    /// `(market price - average cost) * quantity`, reported on sells only.
    /// Derived on demand, never stored.
    pub realized_pnl: Option<f64>,
}

/// One row of the portfolio valuation breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingReport {
    pub instrument: String,
    pub sector: String,
    pub quantity: u32,
    pub average_cost: f64,
    pub current_price: u64,
    pub market_value: u64,
    pub cost_value: f64,
    pub unrealized_pnl: f64,
    pub return_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub cash: u64,
    pub holdings_value: u64,
    pub total_value: u64,
    pub total_return_pct: f64,
    pub positions: Vec<HoldingReport>,
}

/// Buy `quantity` shares at the instrument's current market price.
pub fn buy(
    portfolio: &mut Portfolio,
    catalog: &MarketCatalog,
    instrument: &str,
    quantity: u32,
) -> Result<TradeReceipt, TradeError> {
    if quantity == 0 {
        return Err(TradeError::InvalidQuantity);
    }
    let unit_price = catalog
        .instrument(instrument)
        .ok_or_else(|| TradeError::UnknownInstrument(instrument.to_string()))?
        .current_price();

    let total = unit_price * u64::from(quantity);
    if total > portfolio.cash() {
        return Err(TradeError::InsufficientFunds {
            max_affordable: portfolio.cash() / unit_price,
        });
    }

    portfolio.debit_cash(total);
    portfolio.add_shares(instrument, quantity, unit_price);

    Ok(TradeReceipt {
        instrument: instrument.to_string(),
        quantity,
        unit_price,
        total,
        realized_pnl: None,
    })
}

/// Sell `quantity` held shares at the instrument's current market price.
/// Fully liquidated holdings are removed outright.
pub fn sell(
    portfolio: &mut Portfolio,
    catalog: &MarketCatalog,
    instrument: &str,
    quantity: u32,
) -> Result<TradeReceipt, TradeError> {
    let holding = portfolio
        .holding(instrument)
        .cloned()
        .ok_or_else(|| TradeError::NoSuchHolding(instrument.to_string()))?;

    if quantity == 0 {
        return Err(TradeError::InvalidQuantity);
    }
    if quantity > holding.quantity {
        return Err(TradeError::InsufficientShares {
            held: holding.quantity,
        });
    }

    let unit_price = catalog
        .instrument(instrument)
        .ok_or_else(|| TradeError::UnknownInstrument(instrument.to_string()))?
        .current_price();

    let total = unit_price * u64::from(quantity);
    let realized_pnl = (unit_price as f64 - holding.average_cost) * f64::from(quantity);

    portfolio.credit_cash(total);
    portfolio.remove_shares(instrument, quantity);

    Ok(TradeReceipt {
        instrument: instrument.to_string(),
        quantity,
        unit_price,
        total,
        realized_pnl: Some(realized_pnl),
    })
}

/// Value the portfolio at current market prices.
pub fn valuation(portfolio: &Portfolio, catalog: &MarketCatalog) -> PortfolioValuation {
    let mut positions = Vec::new();
    let mut holdings_value = 0u64;

    for (name, holding) in portfolio.holdings() {
        let Some(inst) = catalog.instrument(name) else {
            continue;
        };
        let market_value = inst.current_price() * u64::from(holding.quantity);
        let cost_value = holding.average_cost * f64::from(holding.quantity);
        let unrealized_pnl = market_value as f64 - cost_value;
        let return_pct = if cost_value != 0.0 {
            unrealized_pnl / cost_value * 100.0
        } else {
            0.0
        };

        holdings_value += market_value;
        positions.push(HoldingReport {
            instrument: name.clone(),
            sector: inst.sector.clone(),
            quantity: holding.quantity,
            average_cost: holding.average_cost,
            current_price: inst.current_price(),
            market_value,
            cost_value,
            unrealized_pnl,
            return_pct,
        });
    }

    let total_value = portfolio.cash() + holdings_value;
    let total_return_pct =
        (total_value as f64 - INITIAL_CASH as f64) / INITIAL_CASH as f64 * 100.0;

    PortfolioValuation {
        cash: portfolio.cash(),
        holdings_value,
        total_value,
        total_return_pct,
        positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::instrument::Instrument;

    fn fixture() -> (Portfolio, MarketCatalog) {
        let mut catalog = MarketCatalog::default();
        catalog.insert(Instrument::new("Taran Motors", "Automotive", "", 60_000));
        catalog.insert(Instrument::new("Pingo Messenger", "Internet", "", 50_000));
        (Portfolio::default(), catalog)
    }

    #[test]
    fn test_buy_debits_cash_and_creates_holding() {
        let (mut portfolio, catalog) = fixture();

        let receipt = buy(&mut portfolio, &catalog, "Taran Motors", 5).unwrap();

        assert_eq!(receipt.total, 300_000);
        assert_eq!(portfolio.cash(), 9_700_000);
        let holding = portfolio.holding("Taran Motors").unwrap();
        assert_eq!(holding.quantity, 5);
        assert_eq!(holding.average_cost, 60_000.0);
    }

    #[test]
    fn test_buy_zero_quantity_rejected() {
        let (mut portfolio, catalog) = fixture();
        assert_eq!(
            buy(&mut portfolio, &catalog, "Taran Motors", 0),
            Err(TradeError::InvalidQuantity)
        );
        assert_eq!(portfolio.cash(), 10_000_000);
    }

    #[test]
    fn test_buy_unknown_instrument_rejected() {
        let (mut portfolio, catalog) = fixture();
        assert_eq!(
            buy(&mut portfolio, &catalog, "Unlisted Corp", 1),
            Err(TradeError::UnknownInstrument("Unlisted Corp".to_string()))
        );
    }

    #[test]
    fn test_buy_beyond_cash_reports_max_affordable() {
        let (mut portfolio, catalog) = fixture();

        // 10_000_000 / 60_000 = 166 shares affordable.
        let err = buy(&mut portfolio, &catalog, "Taran Motors", 167).unwrap_err();
        assert_eq!(err, TradeError::InsufficientFunds { max_affordable: 166 });

        // The maximum itself still goes through.
        assert!(buy(&mut portfolio, &catalog, "Taran Motors", 166).is_ok());
    }

    #[test]
    fn test_weighted_average_cost_rule() {
        let mut catalog = MarketCatalog::default();
        catalog.insert(Instrument::new("Taran Motors", "Automotive", "", 100));
        let mut portfolio = Portfolio::default();

        buy(&mut portfolio, &catalog, "Taran Motors", 10).unwrap();

        // Reprice to 200 and buy the same amount again.
        catalog
            .instruments_mut()
            .for_each(|inst| inst.record_price(200));
        buy(&mut portfolio, &catalog, "Taran Motors", 10).unwrap();

        let holding = portfolio.holding("Taran Motors").unwrap();
        assert_eq!(holding.quantity, 20);
        assert_eq!(holding.average_cost, 150.0);
    }

    #[test]
    fn test_sell_credits_cash_and_reports_realized_pnl() {
        let (mut portfolio, catalog) = fixture();
        buy(&mut portfolio, &catalog, "Pingo Messenger", 4).unwrap();

        let receipt = sell(&mut portfolio, &catalog, "Pingo Messenger", 4).unwrap();

        assert_eq!(receipt.total, 200_000);
        assert_eq!(receipt.realized_pnl, Some(0.0));
        assert_eq!(portfolio.cash(), 10_000_000);
        assert!(portfolio.holding("Pingo Messenger").is_none());
    }

    #[test]
    fn test_sell_not_held_rejected() {
        let (mut portfolio, catalog) = fixture();
        assert_eq!(
            sell(&mut portfolio, &catalog, "Taran Motors", 1),
            Err(TradeError::NoSuchHolding("Taran Motors".to_string()))
        );
    }

    #[test]
    fn test_sell_zero_quantity_rejected() {
        let (mut portfolio, catalog) = fixture();
        buy(&mut portfolio, &catalog, "Taran Motors", 2).unwrap();
        assert_eq!(
            sell(&mut portfolio, &catalog, "Taran Motors", 0),
            Err(TradeError::InvalidQuantity)
        );
    }

    #[test]
    fn test_sell_more_than_held_rejected() {
        let (mut portfolio, catalog) = fixture();
        buy(&mut portfolio, &catalog, "Taran Motors", 2).unwrap();

        let err = sell(&mut portfolio, &catalog, "Taran Motors", 3).unwrap_err();
        assert_eq!(err, TradeError::InsufficientShares { held: 2 });

        // No partial mutation on failure.
        assert_eq!(portfolio.holding("Taran Motors").unwrap().quantity, 2);
    }

    #[test]
    fn test_partial_sell_keeps_remaining_holding() {
        let (mut portfolio, catalog) = fixture();
        buy(&mut portfolio, &catalog, "Taran Motors", 5).unwrap();

        sell(&mut portfolio, &catalog, "Taran Motors", 2).unwrap();

        let holding = portfolio.holding("Taran Motors").unwrap();
        assert_eq!(holding.quantity, 3);
        assert_eq!(holding.average_cost, 60_000.0);
    }

    #[test]
    fn test_valuation_totals_and_return_rate() {
        let (mut portfolio, catalog) = fixture();
        buy(&mut portfolio, &catalog, "Taran Motors", 10).unwrap();

        let report = valuation(&portfolio, &catalog);

        assert_eq!(report.cash, 9_400_000);
        assert_eq!(report.holdings_value, 600_000);
        assert_eq!(report.total_value, 10_000_000);
        assert_eq!(report.total_return_pct, 0.0);
        assert_eq!(report.positions.len(), 1);
        assert_eq!(report.positions[0].unrealized_pnl, 0.0);
    }
}
