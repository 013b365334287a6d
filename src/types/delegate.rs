//! Delegate registry entries.

use serde::{Deserialize, Serialize};

use super::{Address, Amount};

/// A registered consensus delegate.
///
/// Invariant: `votes_received >= stake` always holds, since registration
/// records a self-vote equal to `stake` and every subsequent vote only adds
/// to `votes_received`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Delegate {
    pub address: Address,
    pub stake: Amount,
    pub votes_received: Amount,
    pub active: bool,
    pub registered_at: u64,
    pub last_block_time: u64,
    pub blocks_produced: u64,
    pub total_rewards: Amount,
    /// Commission rate, e.g. `0.10` for 10%. Recorded for informational
    /// purposes; the fee split (§4.4) does not consume it directly (the
    /// split is equal-share, not commission-weighted).
    pub commission: rust_decimal::Decimal,
}

impl Delegate {
    pub fn new(address: Address, stake: Amount, registered_at: u64) -> Self {
        Self {
            address,
            stake,
            votes_received: stake,
            active: true,
            registered_at,
            last_block_time: registered_at,
            blocks_produced: 0,
            total_rewards: Amount::ZERO,
            commission: rust_decimal::Decimal::new(10, 2),
        }
    }
}

/// A single vote cast for a delegate.
///
/// Votes are append-only: casting another vote from the same voter to the
/// same delegate accumulates rather than replacing the prior vote.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vote {
    pub voter_address: Address,
    pub delegate_address: Address,
    pub amount: Amount,
    pub timestamp: u64,
}
