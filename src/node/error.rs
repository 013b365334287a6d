use std::fmt;

/// Errors returned by [`super::Node::submit`].
#[derive(Debug)]
pub enum NodeError {
    /// The transaction's `id` does not have the required `AdNe` shape.
    InvalidTransaction,
    /// [`crate::balances::BalanceLedger::transfer`] rejected the transaction.
    TransferFailed(String),
    /// [`crate::ledger::Ledger::submit`] rejected the transaction.
    LedgerRejected(String),
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::InvalidTransaction => write!(f, "transaction id is not well-formed"),
            NodeError::TransferFailed(reason) => write!(f, "balance transfer failed: {reason}"),
            NodeError::LedgerRejected(reason) => write!(f, "ledger rejected transaction: {reason}"),
        }
    }
}

impl std::error::Error for NodeError {}
