//! Coordination layer tying the execution engine, delegate registry, ledger
//! and balance ledger together into a single processing pipeline (§4.6).

pub mod coordinator;

pub use coordinator::{CoordinatorStats, ProtocolCoordinator};
