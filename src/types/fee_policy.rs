//! The single fee-handling mode a running node commits to at bootstrap.

/// How a transaction's fee (§4.1, `fee_ratio`) is disposed of once it has
/// been debited from the sender.
///
/// The two legs of this crate — [`crate::node::Node::submit`] for
/// single-transaction submission and [`crate::execution::ExecutionEngine`]
/// for batch processing through [`crate::protocol::ProtocolCoordinator`] —
/// each apply exactly one of these. A node is constructed with one
/// `FeePolicy` and keeps it for its entire lifetime; nothing in this crate
/// switches policy mid-flight (§9).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FeePolicy {
    /// The fee is destroyed outright via [`crate::balances::BalanceLedger::burn_from`].
    NodeBurn,
    /// The fee is routed into the `treasury` account and later split among
    /// delegates/community/founder by [`crate::consensus::DelegateRegistry::distribute_fees`].
    ConsensusSplit,
}
