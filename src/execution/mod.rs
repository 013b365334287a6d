//! Transaction execution engine: sequential or bounded-parallel batch
//! application, with an optional per-transaction integrity check (§4.5).

pub mod config;
pub mod engine;
pub mod error;
pub mod result;

pub use config::{ExecutionConfig, ExecutionMode};
pub use engine::ExecutionEngine;
pub use error::TxError;
pub use result::TransactionResult;
