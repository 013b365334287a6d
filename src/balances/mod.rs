//! Address-keyed balance ledger: transfer, mint, burn, circulating supply.

pub mod error;
pub mod ledger;
pub mod store;

pub use error::BalanceError;
pub use ledger::BalanceLedger;
pub use store::{BalanceStore, InMemoryBalanceStore};
