use std::fmt;

/// Errors returned by [`super::BalanceLedger`].
#[derive(Debug)]
pub enum BalanceError {
    /// `from`'s balance is less than the requested transfer amount.
    InsufficientBalance,
    /// `from` has no recorded balance at all (distinct from a zero
    /// balance, which is a valid starting state for a known account).
    UnknownSender,
    /// `mint` would push `circulating` above `MAX_SUPPLY`.
    ExceedsMaxSupply,
}

impl fmt::Display for BalanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceError::InsufficientBalance => write!(f, "insufficient balance for transfer"),
            BalanceError::UnknownSender => write!(f, "sender address is unknown"),
            BalanceError::ExceedsMaxSupply => write!(f, "mint would exceed MAX_SUPPLY"),
        }
    }
}

impl std::error::Error for BalanceError {}
