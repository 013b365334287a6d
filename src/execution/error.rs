use std::fmt;

/// Failure modes for a single transaction going through
/// [`super::ExecutionEngine::run_batch`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TxError {
    /// The transaction's `id` does not have the required `AdNe` shape.
    ValidationFailed,
    /// [`crate::types::Transaction::integrity_holds`] returned `false`.
    IntegrityFailed,
    /// [`crate::ledger::Ledger::submit`] rejected the transaction.
    LedgerRejected(String),
    /// [`crate::balances::BalanceLedger::transfer`] rejected the transaction.
    TransferFailed(String),
    /// The batch was cancelled (§5) before this transaction ran.
    ExecutionCancelled,
}

impl fmt::Display for TxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxError::ValidationFailed => write!(f, "transaction id is not well-formed"),
            TxError::IntegrityFailed => write!(f, "transaction id does not match its recomputed hash"),
            TxError::LedgerRejected(reason) => write!(f, "ledger rejected transaction: {reason}"),
            TxError::TransferFailed(reason) => write!(f, "balance transfer failed: {reason}"),
            TxError::ExecutionCancelled => write!(f, "execution was cancelled"),
        }
    }
}

impl std::error::Error for TxError {}
