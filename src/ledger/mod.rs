//! Append-only block ledger.
//!
//! This module provides:
//!
//! - [`store::LedgerStore`]: the abstract persistence interface (§6),
//! - [`store::InMemoryLedgerStore`]: the only implementation provided here,
//!   persistence backends being out of scope (§1),
//! - [`error::LedgerError`]: the error taxonomy for append/lookup failures,
//! - [`ledger::Ledger`]: the `RwLock`-guarded chain + pending pool (§4.2).

pub mod error;
pub mod ledger;
pub mod store;

pub use error::LedgerError;
pub use ledger::Ledger;
pub use store::{InMemoryLedgerStore, LedgerStore};
