//! Wires the individual components into a runnable node from a
//! [`NodeConfig`] (§9 REDESIGN FLAGS: a single `bootstrap` factory replaces
//! constructing each component by hand).

use std::sync::Arc;

use crate::audit::Auditor;
use crate::balances::store::InMemoryBalanceStore;
use crate::balances::BalanceLedger;
use crate::config::NodeConfig;
use crate::consensus::DelegateRegistry;
use crate::execution::ExecutionEngine;
use crate::ledger::store::InMemoryLedgerStore;
use crate::ledger::Ledger;
use crate::node::Node;
use crate::protocol::ProtocolCoordinator;
use crate::types::FeePolicy;

/// Which of the two whole-system transaction paths (§9) a bootstrapped
/// [`Core`] runs, selected by `config.fee_policy`.
pub enum CoreMode {
    SingleNode(Arc<Node<InMemoryLedgerStore, InMemoryBalanceStore>>),
    Consensus {
        registry: Arc<DelegateRegistry>,
        coordinator: Arc<ProtocolCoordinator<InMemoryLedgerStore, InMemoryBalanceStore>>,
    },
}

/// The fully wired set of collaborators for one node.
pub struct Core {
    pub ledger: Arc<Ledger<InMemoryLedgerStore>>,
    pub balances: Arc<BalanceLedger<InMemoryBalanceStore>>,
    pub auditor: Arc<Auditor<InMemoryLedgerStore>>,
    pub mode: CoreMode,
    config: NodeConfig,
}

impl Core {
    /// Starts every background task this mode needs: the auditor's
    /// periodic scan, plus either the node's minting loop or the
    /// coordinator's delegate monitor.
    pub fn start(self: &Arc<Self>) {
        self.auditor.spawn_periodic(self.config.audit_interval.as_secs());
        match &self.mode {
            CoreMode::SingleNode(node) => {
                node.spawn_minting_loop();
            }
            CoreMode::Consensus { coordinator, .. } => {
                coordinator.start();
            }
        }
    }

    pub fn stop(&self) {
        self.auditor.stop();
        match &self.mode {
            CoreMode::SingleNode(node) => node.stop(),
            CoreMode::Consensus { coordinator, .. } => coordinator.stop(),
        }
    }
}

/// Builds a [`Core`] from `config`. This is the only supported way to
/// assemble the components in this crate; nothing else constructs a
/// [`Node`] or [`ProtocolCoordinator`] directly against shared state.
pub fn bootstrap(config: NodeConfig) -> Arc<Core> {
    let ledger = Arc::new(Ledger::new(InMemoryLedgerStore::new(), config.genesis_timestamp));
    let balances = Arc::new(BalanceLedger::new(InMemoryBalanceStore::new()));
    let auditor = Arc::new(Auditor::new(Arc::clone(&ledger)));

    let mode = match config.fee_policy {
        FeePolicy::NodeBurn => {
            let node = Arc::new(Node::new(Arc::clone(&ledger), Arc::clone(&balances), config.founder.clone()).with_block_interval(config.node_block_interval));
            CoreMode::SingleNode(node)
        }
        FeePolicy::ConsensusSplit => {
            let registry = Arc::new(DelegateRegistry::new(config.consensus.clone()));
            let engine = Arc::new(ExecutionEngine::new(
                Arc::clone(&ledger),
                Arc::clone(&balances),
                FeePolicy::ConsensusSplit,
                config.execution.clone(),
            ));
            let coordinator = Arc::new(
                ProtocolCoordinator::new(Arc::clone(&ledger), Arc::clone(&balances), Arc::clone(&registry), engine)
                    .with_monitor_interval(config.delegate_monitor_interval),
            );
            CoreMode::Consensus { registry, coordinator }
        }
    };

    Arc::new(Core {
        ledger,
        balances,
        auditor,
        mode,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_with_node_burn_produces_single_node_mode() {
        let mut config = NodeConfig::default();
        config.fee_policy = FeePolicy::NodeBurn;
        let core = bootstrap(config);
        assert!(matches!(core.mode, CoreMode::SingleNode(_)));
        assert_eq!(core.ledger.count(), 1);
    }

    #[test]
    fn bootstrap_with_consensus_split_produces_consensus_mode() {
        let mut config = NodeConfig::default();
        config.fee_policy = FeePolicy::ConsensusSplit;
        let core = bootstrap(config);
        assert!(matches!(core.mode, CoreMode::Consensus { .. }));
    }
}
