use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::balances::BalanceLedger;
use crate::balances::store::BalanceStore;
use crate::ledger::Ledger;
use crate::ledger::store::LedgerStore;
use crate::types::{Address, Block, Transaction};

use super::error::NodeError;

const DEFAULT_BLOCK_INTERVAL_SECS: u64 = 10;

fn now_unix() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// The simplest of the two whole-system transaction paths this crate
/// supports (§9): a node that applies every transaction's fee via
/// [`crate::types::FeePolicy::NodeBurn`] and mints its own blocks on a
/// fixed interval, with no delegate voting involved. The alternative path —
/// [`crate::execution::ExecutionEngine`] driven by
/// [`crate::protocol::ProtocolCoordinator`] — is what `FeePolicy::ConsensusSplit`
/// wires up instead; a bootstrapped system runs exactly one of the two.
pub struct Node<LS, BS> {
    ledger: Arc<Ledger<LS>>,
    balances: Arc<BalanceLedger<BS>>,
    founder: Address,
    block_interval: Duration,
    running: Arc<AtomicBool>,
}

impl<LS, BS> Node<LS, BS>
where
    LS: LedgerStore,
    BS: BalanceStore,
{
    pub fn new(ledger: Arc<Ledger<LS>>, balances: Arc<BalanceLedger<BS>>, founder: Address) -> Self {
        Self {
            ledger,
            balances,
            founder,
            block_interval: Duration::from_secs(DEFAULT_BLOCK_INTERVAL_SECS),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_block_interval(mut self, interval: Duration) -> Self {
        self.block_interval = interval;
        self
    }

    /// Validates, transfers the amount net of fee to the recipient (the
    /// sender's only balance debit), retires the fee from circulating
    /// supply via [`BalanceLedger::burn`] (which never touches a balance),
    /// and queues the transaction in the ledger's pending pool.
    pub fn submit(&self, tx: Transaction) -> Result<(), NodeError> {
        if !tx.has_well_formed_id() {
            return Err(NodeError::InvalidTransaction);
        }

        let fee = tx.fee();
        let net = tx.amount.checked_sub(fee).unwrap_or(tx.amount);
        self.balances
            .transfer(&tx.from, &tx.to, net)
            .map_err(|e| NodeError::TransferFailed(e.to_string()))?;
        self.balances.burn(fee);

        self.ledger.submit(tx).map_err(|e| NodeError::LedgerRejected(e.to_string()))
    }
}

impl<LS, BS> Node<LS, BS>
where
    LS: LedgerStore + Send + Sync + 'static,
    BS: BalanceStore + Send + Sync + 'static,
{
    /// Spawns the periodic minting loop: every `block_interval`, if the
    /// pending pool is non-empty, builds and appends a block over it.
    pub fn spawn_minting_loop(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        self.running.store(true, Ordering::SeqCst);
        let node = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(node.block_interval);
            loop {
                ticker.tick().await;
                if !node.running.load(Ordering::SeqCst) {
                    break;
                }
                node.mint_pending_block();
            }
        })
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn mint_pending_block(&self) {
        let pending = self.ledger.pending();
        if pending.is_empty() {
            return;
        }
        let last = self.ledger.last();
        let block = Block::new(last.index + 1, last.hash.0.clone(), now_unix(), pending, self.founder.clone(), Vec::new());
        if let Err(err) = self.ledger.append(block) {
            tracing::warn!("node: failed to mint block: {err}");
        } else {
            tracing::info!("node: minted block {}", last.index + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balances::store::InMemoryBalanceStore;
    use crate::ledger::store::InMemoryLedgerStore;
    use crate::types::Amount;
    use rust_decimal_macros::dec;

    fn fresh_node() -> (Node<InMemoryLedgerStore, InMemoryBalanceStore>, Address, Address) {
        let ledger = Arc::new(Ledger::new(InMemoryLedgerStore::new(), 1_700_000_000));
        let balances = Arc::new(BalanceLedger::new(InMemoryBalanceStore::new()));
        let treasury = Address::new("treasury");
        let aaa = Address::derive(b"AAA");
        balances.transfer(&treasury, &aaa, Amount::from_whole(1_000)).unwrap();

        let founder = Address::new("founder");
        let node = Node::new(ledger, balances, founder);
        (node, aaa, Address::derive(b"BBB"))
    }

    // S2 - single transfer cycle.
    #[test]
    fn submit_then_mint_reaches_expected_balances() {
        let (node, aaa, bbb) = fresh_node();
        let tx = Transaction::new(aaa.clone(), bbb.clone(), Amount::from_whole(100), 1_700_000_001, vec![]);
        node.submit(tx).unwrap();

        node.mint_pending_block();

        // 1000 sent 100, net of the 0.1 fee: aaa loses 99.9 to the transfer,
        // bbb gains 99.9, and the fee is retired from supply alone.
        assert_eq!(node.balances.balance(&aaa), Amount::new(dec!(900.1)).unwrap());
        assert_eq!(node.balances.balance(&bbb), Amount::new(dec!(99.9)).unwrap());
        assert_eq!(node.balances.circulating(), Amount::new(dec!(999999999.9)).unwrap());
        assert_eq!(node.ledger.count(), 2);
    }

    #[test]
    fn submit_rejects_malformed_transaction_id() {
        let (node, aaa, bbb) = fresh_node();
        let mut tx = Transaction::new(aaa, bbb, Amount::from_whole(1), 1, vec![]);
        tx.id = crate::types::TxId("too-short".to_string());
        let err = node.submit(tx).unwrap_err();
        assert!(matches!(err, NodeError::InvalidTransaction));
    }

    #[test]
    fn minting_with_no_pending_transactions_is_a_no_op() {
        let (node, _aaa, _bbb) = fresh_node();
        node.mint_pending_block();
        assert_eq!(node.ledger.count(), 1);
    }
}
