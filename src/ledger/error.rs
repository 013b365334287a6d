use std::fmt;

/// Errors returned by [`super::Ledger::append`] and friends.
#[derive(Debug)]
pub enum LedgerError {
    /// `block.index` is not exactly `last.index + 1`.
    InvalidIndex { expected: u64, found: u64 },
    /// `block.previousHash` does not match `hash(last)`.
    InvalidPrevHash,
    /// Recomputing the block's hash from its fields does not match the
    /// stored `hash`.
    InvalidHash,
    /// Some transaction in the block does not carry a well-formed `AdNe`
    /// identifier.
    BadTxPrefix,
    /// `byIndex` was called with an index past the end of the chain.
    OutOfRange { index: u64, len: u64 },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::InvalidIndex { expected, found } => {
                write!(f, "invalid block index: expected {expected}, found {found}")
            }
            LedgerError::InvalidPrevHash => write!(f, "block previousHash does not match tip hash"),
            LedgerError::InvalidHash => write!(f, "block hash does not match its recomputed value"),
            LedgerError::BadTxPrefix => write!(f, "transaction id does not have the required AdNe prefix"),
            LedgerError::OutOfRange { index, len } => {
                write!(f, "block index {index} is out of range (chain length {len})")
            }
        }
    }
}

impl std::error::Error for LedgerError {}
