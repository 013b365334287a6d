use std::fmt;

/// Errors returned by [`super::DelegateRegistry`].
#[derive(Debug)]
pub enum ConsensusError {
    /// `stake` is below `MIN_DELEGATE_STAKE`.
    BelowMinStake,
    /// `address` is already a registered delegate.
    AlreadyRegistered,
    /// The active set already holds `MAX_DELEGATES` entries.
    MaxReached,
    /// `voteForDelegate` referenced a delegate that does not exist.
    DelegateNotFound,
}

impl fmt::Display for ConsensusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsensusError::BelowMinStake => write!(f, "stake is below the minimum delegate stake"),
            ConsensusError::AlreadyRegistered => write!(f, "address is already a registered delegate"),
            ConsensusError::MaxReached => write!(f, "maximum number of active delegates reached"),
            ConsensusError::DelegateNotFound => write!(f, "delegate not found"),
        }
    }
}

impl std::error::Error for ConsensusError {}
