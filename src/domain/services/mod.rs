pub mod confirmation;
pub mod ledger;
pub mod price_engine;
pub mod sentiment;
