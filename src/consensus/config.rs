use rust_decimal::Decimal;

use crate::types::Amount;

/// Consensus configuration parameters (§6, "identifier and format
/// constants" plus the fee split ratios).
#[derive(Clone, Debug)]
pub struct ConsensusConfig {
    pub max_delegates: usize,
    pub min_delegate_stake: Amount,
    /// Target time between block slots, used by `activeProducer` to decide
    /// when to advance the round-robin producer.
    pub block_time_secs: u64,
    pub fee_split: FeeSplit,
}

/// The four-way fee split applied by `distributeFees` (§4.4).
#[derive(Clone, Debug)]
pub struct FeeSplit {
    pub delegate: Decimal,
    pub burn: Decimal,
    pub community: Decimal,
    pub founder: Decimal,
}

impl Default for FeeSplit {
    fn default() -> Self {
        Self {
            delegate: Decimal::new(60, 2),
            burn: Decimal::new(30, 2),
            community: Decimal::new(5, 2),
            founder: Decimal::new(5, 2),
        }
    }
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            max_delegates: 21,
            min_delegate_stake: Amount::from_whole(5_000),
            block_time_secs: 3,
            fee_split: FeeSplit::default(),
        }
    }
}
