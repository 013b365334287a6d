//! Aggregate configuration for a bootstrapped node (§1).

use std::time::Duration;

use crate::consensus::ConsensusConfig;
use crate::execution::ExecutionConfig;
use crate::types::{Address, FeePolicy};

/// Every knob [`crate::bootstrap::bootstrap`] needs to wire up a running
/// node, gathered in one place the way a top-level application config
/// usually is.
#[derive(Clone, Debug)]
pub struct NodeConfig {
    pub consensus: ConsensusConfig,
    pub execution: ExecutionConfig,
    /// Which whole-system transaction path this node runs (§9): `NodeBurn`
    /// wires up [`crate::node::Node`] alone; `ConsensusSplit` wires up
    /// [`crate::execution::ExecutionEngine`] and
    /// [`crate::protocol::ProtocolCoordinator`] instead.
    pub fee_policy: FeePolicy,
    pub genesis_timestamp: u64,
    pub founder: Address,
    pub audit_interval: Duration,
    pub node_block_interval: Duration,
    pub delegate_monitor_interval: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            consensus: ConsensusConfig::default(),
            execution: ExecutionConfig::default(),
            fee_policy: FeePolicy::NodeBurn,
            genesis_timestamp: 1_700_000_000,
            founder: Address::new("founder"),
            audit_interval: Duration::from_secs(60),
            node_block_interval: Duration::from_secs(10),
            delegate_monitor_interval: Duration::from_secs(10),
        }
    }
}
