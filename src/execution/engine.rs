//! The execution engine: applies a batch of transactions either
//! sequentially or in parallel, bounded by a worker-count semaphore (§4.5).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::balances::BalanceLedger;
use crate::balances::store::BalanceStore;
use crate::ledger::Ledger;
use crate::ledger::store::LedgerStore;
use crate::types::{Address, Amount, FeePolicy, Transaction};

use super::config::{ExecutionConfig, ExecutionMode};
use super::error::TxError;
use super::result::TransactionResult;

/// Applies transactions against a shared [`Ledger`] and [`BalanceLedger`].
///
/// `mode` starts at [`ExecutionMode::Sequential`] and is switched by
/// [`Self::update_mode`], which the delegate-monitor task in
/// [`crate::protocol::ProtocolCoordinator`] calls on every tick with the
/// current active delegate count (§4.5, §8 S3).
pub struct ExecutionEngine<LS, BS> {
    ledger: Arc<Ledger<LS>>,
    balances: Arc<BalanceLedger<BS>>,
    fee_policy: FeePolicy,
    config: RwLock<ExecutionConfig>,
    mode: RwLock<ExecutionMode>,
    cancel: Arc<AtomicBool>,
}

impl<LS, BS> ExecutionEngine<LS, BS>
where
    LS: LedgerStore + Send + Sync + 'static,
    BS: BalanceStore + Send + Sync + 'static,
{
    pub fn new(ledger: Arc<Ledger<LS>>, balances: Arc<BalanceLedger<BS>>, fee_policy: FeePolicy, config: ExecutionConfig) -> Self {
        Self {
            ledger,
            balances,
            fee_policy,
            config: RwLock::new(config),
            mode: RwLock::new(ExecutionMode::Sequential),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        *self.mode.read().expect("execution engine lock poisoned")
    }

    pub fn config(&self) -> ExecutionConfig {
        self.config.read().expect("execution engine lock poisoned").clone()
    }

    /// Replaces the active configuration wholesale, used by
    /// [`crate::protocol::ProtocolCoordinator::apply_production_optimization`]
    /// and [`crate::protocol::ProtocolCoordinator::rollback_optimization`].
    pub fn apply_config(&self, config: ExecutionConfig) {
        *self.config.write().expect("execution engine lock poisoned") = config;
    }

    /// Selects [`ExecutionMode::Parallel`] once `active_delegates` strictly
    /// exceeds `config.delegate_threshold`, [`ExecutionMode::Sequential`]
    /// otherwise. Logs only on an actual transition, never on every tick.
    pub fn update_mode(&self, active_delegates: usize) {
        let threshold = self.config.read().expect("execution engine lock poisoned").delegate_threshold;
        let target = if active_delegates > threshold {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        };

        let mut mode = self.mode.write().expect("execution engine lock poisoned");
        if *mode != target {
            tracing::info!("execution engine switching mode: {:?} -> {:?} ({active_delegates} active delegates)", *mode, target);
            *mode = target;
        }
    }

    /// Requests that any in-flight [`Self::run_batch`] stop picking up new
    /// transactions. Already-started transactions still complete.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Applies up to `config.batch_size` transactions from `txs`, in
    /// [`Self::mode`]. Extra transactions beyond `batch_size` are left
    /// untouched in the returned slice's tail — callers that want them
    /// processed call `run_batch` again.
    pub async fn run_batch(&self, txs: &[Transaction]) -> Vec<TransactionResult> {
        let batch_size = self.config.read().expect("execution engine lock poisoned").batch_size;
        let batch = &txs[..txs.len().min(batch_size)];
        match self.mode() {
            ExecutionMode::Sequential => self.run_sequential(batch).await,
            ExecutionMode::Parallel => self.run_parallel(batch).await,
        }
    }

    async fn run_sequential(&self, batch: &[Transaction]) -> Vec<TransactionResult> {
        let integrity_checks = self.config.read().expect("execution engine lock poisoned").integrity_checks;
        let mut results = Vec::with_capacity(batch.len());
        for (index, tx) in batch.iter().enumerate() {
            if self.is_cancelled() {
                results.push(TransactionResult {
                    index,
                    tx_id: tx.id.clone(),
                    outcome: Err(TxError::ExecutionCancelled),
                });
                continue;
            }
            let outcome = Self::apply_one(tx, &self.ledger, &self.balances, self.fee_policy, integrity_checks);
            results.push(TransactionResult {
                index,
                tx_id: tx.id.clone(),
                outcome,
            });
        }
        results
    }

    async fn run_parallel(&self, batch: &[Transaction]) -> Vec<TransactionResult> {
        let (max_workers, integrity_checks, timeout) = {
            let config = self.config.read().expect("execution engine lock poisoned");
            (config.max_workers, config.integrity_checks, config.timeout)
        };
        let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
        let mut tasks = JoinSet::new();

        for (index, tx) in batch.iter().cloned().enumerate() {
            let ledger = Arc::clone(&self.ledger);
            let balances = Arc::clone(&self.balances);
            let cancel = Arc::clone(&self.cancel);
            let semaphore = Arc::clone(&semaphore);
            let fee_policy = self.fee_policy;
            let integrity_checks = integrity_checks;
            let timeout = timeout;

            tasks.spawn(async move {
                let permit = semaphore.acquire_owned().await.expect("semaphore never closed");
                if cancel.load(Ordering::SeqCst) {
                    drop(permit);
                    return TransactionResult {
                        index,
                        tx_id: tx.id.clone(),
                        outcome: Err(TxError::ExecutionCancelled),
                    };
                }

                let tx_id = tx.id.clone();
                let work = std::panic::AssertUnwindSafe(async {
                    Self::apply_one(&tx, &ledger, &balances, fee_policy, integrity_checks)
                })
                .catch_unwind();

                let outcome = match tokio::time::timeout(timeout, work).await {
                    Ok(Ok(outcome)) => outcome,
                    Ok(Err(_panic)) => Err(TxError::ExecutionCancelled),
                    Err(_elapsed) => Err(TxError::ExecutionCancelled),
                };
                drop(permit);

                TransactionResult { index, tx_id, outcome }
            });
        }

        let mut results = Vec::with_capacity(batch.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(_join_err) => continue,
            }
        }
        // JoinSet completion order is not the submission order; restore it
        // so callers can rely on index-preserving results (§8 S4).
        results.sort_by_key(|r| r.index);
        results
    }

    /// Validates, submits to the ledger, transfers funds net of fee, and
    /// disposes of the fee per `fee_policy`. Returns the fee collected on
    /// success (`Amount::ZERO` is a valid, successful fee when `amount` is
    /// itself zero).
    fn apply_one(tx: &Transaction, ledger: &Ledger<LS>, balances: &BalanceLedger<BS>, fee_policy: FeePolicy, integrity_checks: bool) -> Result<Amount, TxError> {
        if !tx.has_well_formed_id() {
            return Err(TxError::ValidationFailed);
        }
        if integrity_checks && !tx.integrity_holds() {
            return Err(TxError::IntegrityFailed);
        }

        ledger.submit(tx.clone()).map_err(|e| TxError::LedgerRejected(e.to_string()))?;

        let fee = tx.fee();
        let net = tx.amount.checked_sub(fee).unwrap_or(Amount::ZERO);
        balances.transfer(&tx.from, &tx.to, net).map_err(|e| TxError::TransferFailed(e.to_string()))?;

        match fee_policy {
            FeePolicy::NodeBurn => {
                let _ = balances.burn_from(&tx.from, fee);
            }
            FeePolicy::ConsensusSplit => {
                let _ = balances.transfer(&tx.from, &Address::new("treasury"), fee);
            }
        }

        Ok(fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balances::store::InMemoryBalanceStore;
    use crate::ledger::store::InMemoryLedgerStore;
    use rust_decimal_macros::dec;

    fn fresh_engine(mode_threshold: usize, integrity_checks: bool) -> (ExecutionEngine<InMemoryLedgerStore, InMemoryBalanceStore>, Address) {
        let ledger = Arc::new(Ledger::new(InMemoryLedgerStore::new(), 1_700_000_000));
        let balances = Arc::new(BalanceLedger::new(InMemoryBalanceStore::new()));
        let treasury = Address::new("treasury");
        balances.transfer(&treasury, &Address::derive(b"alice"), Amount::from_whole(1_000)).unwrap();

        let mut config = ExecutionConfig::balanced();
        config.delegate_threshold = mode_threshold;
        config.integrity_checks = integrity_checks;
        let engine = ExecutionEngine::new(ledger, balances, FeePolicy::ConsensusSplit, config);
        (engine, Address::derive(b"alice"))
    }

    fn tx(from: &Address, to: &Address, amount: Amount) -> Transaction {
        Transaction::new(from.clone(), to.clone(), amount, 1_700_000_001, vec![])
    }

    // S3 - mode switch.
    #[tokio::test]
    async fn update_mode_switches_between_sequential_and_parallel() {
        let (engine, _alice) = fresh_engine(11, true);
        assert_eq!(engine.mode(), ExecutionMode::Sequential);
        engine.update_mode(11);
        assert_eq!(engine.mode(), ExecutionMode::Sequential);
        engine.update_mode(12);
        assert_eq!(engine.mode(), ExecutionMode::Parallel);
        engine.update_mode(3);
        assert_eq!(engine.mode(), ExecutionMode::Sequential);
    }

    #[tokio::test]
    async fn sequential_batch_applies_every_transaction_in_order() {
        let (engine, alice) = fresh_engine(99, true);
        let bob = Address::derive(b"bob");
        let batch = vec![tx(&alice, &bob, Amount::from_whole(10)), tx(&alice, &bob, Amount::from_whole(20))];

        let results = engine.run_batch(&batch).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(TransactionResult::is_success));
        assert_eq!(results[0].index, 0);
        assert_eq!(results[1].index, 1);
    }

    // S4 - parallel batch preserves index ordering.
    #[tokio::test]
    async fn parallel_batch_preserves_submission_order() {
        let (engine, alice) = fresh_engine(1, true);
        engine.update_mode(1);
        let bob = Address::derive(b"bob");
        let batch: Vec<Transaction> = (0..10u64).map(|i| tx(&alice, &bob, Amount::from_whole(i + 1))).collect();

        let results = engine.run_batch(&batch).await;
        assert_eq!(results.len(), 10);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.index, i);
        }
    }

    // S5 - integrity failure.
    #[tokio::test]
    async fn tampered_transaction_is_rejected_as_integrity_failure() {
        let (engine, alice) = fresh_engine(99, true);
        let bob = Address::derive(b"bob");
        let mut bad = tx(&alice, &bob, Amount::from_whole(10));
        bad.id = crate::types::transaction::TxId(crate::hash::transaction_id(bad.from.as_str(), bad.to.as_str(), "999", bad.timestamp));

        let results = engine.run_batch(&[bad]).await;
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0].outcome, Err(TxError::IntegrityFailed)));
    }

    #[tokio::test]
    async fn integrity_checks_disabled_skips_the_check() {
        let (engine, alice) = fresh_engine(99, false);
        let bob = Address::derive(b"bob");
        let mut tampered = tx(&alice, &bob, Amount::from_whole(10));
        // Still a well-formed AdNe id shape, just not re-derivable.
        tampered.id = crate::types::transaction::TxId(format!("AdNe{}", "0".repeat(60)));

        let results = engine.run_batch(&[tampered]).await;
        assert!(results[0].is_success());
    }

    #[tokio::test]
    async fn fee_policy_consensus_split_routes_fee_to_treasury() {
        let (engine, alice) = fresh_engine(99, true);
        let bob = Address::derive(b"bob");
        let batch = vec![tx(&alice, &bob, Amount::from_whole(1_000))];

        let results = engine.run_batch(&batch).await;
        let fee = results[0].outcome.clone().unwrap();
        assert_eq!(fee, Amount::from_whole(1_000).scaled_by(dec!(0.001)));
    }
}
