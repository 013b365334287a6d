//! Core domain types shared across the ledger, consensus, and execution
//! layers.
//!
//! As in the rest of this crate, identifiers are wrapped in newtypes rather
//! than passed around as naked `String`s, so that the `AdNe`-prefix shape
//! constraint is enforced at construction time instead of scattered across
//! call sites.

pub mod address;
pub mod amount;
pub mod block;
pub mod delegate;
pub mod fee_policy;
pub mod transaction;

pub use address::Address;
pub use amount::Amount;
pub use block::{Block, BlockHash};
pub use delegate::{Delegate, Vote};
pub use fee_policy::FeePolicy;
pub use transaction::{Transaction, TxId};
