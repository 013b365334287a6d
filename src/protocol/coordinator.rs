use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::balances::BalanceLedger;
use crate::balances::store::BalanceStore;
use crate::consensus::DelegateRegistry;
use crate::execution::{ExecutionConfig, ExecutionEngine, TransactionResult};
use crate::ledger::Ledger;
use crate::ledger::store::LedgerStore;
use crate::types::{Address, Block, Transaction};

const DEFAULT_DELEGATE_MONITOR_INTERVAL_SECS: u64 = 10;

fn now_unix() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// Snapshot returned by [`ProtocolCoordinator::stats`].
#[derive(Clone, Debug)]
pub struct CoordinatorStats {
    pub block_count: u64,
    pub pending_count: usize,
    pub mode: crate::execution::ExecutionMode,
    pub active_delegates: usize,
}

/// Drives the execution engine against a stream of transactions, hands the
/// fees it collects to the delegate registry, and mints blocks from the
/// results (§4.6).
pub struct ProtocolCoordinator<LS, BS> {
    ledger: Arc<Ledger<LS>>,
    balances: Arc<BalanceLedger<BS>>,
    registry: Arc<DelegateRegistry>,
    engine: Arc<ExecutionEngine<LS, BS>>,
    running: Arc<AtomicBool>,
    monitor_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
    monitor_interval: Duration,
}

impl<LS, BS> ProtocolCoordinator<LS, BS>
where
    LS: LedgerStore + Send + Sync + 'static,
    BS: BalanceStore + Send + Sync + 'static,
{
    pub fn new(ledger: Arc<Ledger<LS>>, balances: Arc<BalanceLedger<BS>>, registry: Arc<DelegateRegistry>, engine: Arc<ExecutionEngine<LS, BS>>) -> Self {
        Self {
            ledger,
            balances,
            registry,
            engine,
            running: Arc::new(AtomicBool::new(false)),
            monitor_handle: Mutex::new(None),
            monitor_interval: Duration::from_secs(DEFAULT_DELEGATE_MONITOR_INTERVAL_SECS),
        }
    }

    pub fn with_monitor_interval(mut self, interval: Duration) -> Self {
        self.monitor_interval = interval;
        self
    }

    /// Starts the delegate-monitor background task. Idempotent: calling
    /// `start` again while already running is a no-op.
    pub fn start(self: &Arc<Self>) {
        let mut handle = self.monitor_handle.lock().expect("coordinator lock poisoned");
        if handle.is_some() {
            return;
        }
        self.running.store(true, Ordering::SeqCst);

        let coordinator = Arc::clone(self);
        *handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(coordinator.monitor_interval);
            loop {
                ticker.tick().await;
                if !coordinator.running.load(Ordering::SeqCst) {
                    break;
                }
                coordinator.engine.update_mode(coordinator.registry.active_count());
            }
        }));
    }

    /// Stops the delegate-monitor task and cancels any in-flight batch.
    /// Idempotent.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.engine.cancel();
        let mut handle = self.monitor_handle.lock().expect("coordinator lock poisoned");
        handle.take();
    }

    /// Retunes the engine's execution mode against the current active
    /// delegate count, then runs every transaction in `txs` through it in
    /// `config.batch_size`-sized chunks, and hands the total fee collected
    /// to the delegate registry for distribution.
    pub async fn process_transactions(&self, txs: &[Transaction]) -> Vec<TransactionResult> {
        self.engine.update_mode(self.registry.active_count());
        let batch_size = self.engine.config().batch_size.max(1);
        let mut all_results = Vec::with_capacity(txs.len());
        let mut total_fee = crate::types::Amount::ZERO;

        for chunk in txs.chunks(batch_size) {
            let results = self.engine.run_batch(chunk).await;
            for result in &results {
                if let Ok(fee) = &result.outcome {
                    total_fee = total_fee.checked_add(*fee).unwrap_or(total_fee);
                }
            }
            all_results.extend(results);
        }

        if total_fee.is_positive() {
            self.registry.distribute_fees(total_fee, &self.balances);
        }
        all_results
    }

    /// Builds and appends a block from the ledger's pending pool, filtered
    /// down to the transactions `results` marks successful. Produces an
    /// empty block when nothing in the pending pool succeeded.
    pub fn create_block(&self, results: &[TransactionResult], validator: Address, signature: Vec<u8>) -> Result<Block, crate::ledger::LedgerError> {
        let successful_ids: HashSet<&str> = results.iter().filter(|r| r.is_success()).map(|r| r.tx_id.0.as_str()).collect();

        let pending = self.ledger.pending();
        let data: Vec<Transaction> = pending.into_iter().filter(|tx| successful_ids.contains(tx.id.0.as_str())).collect();

        let last = self.ledger.last();
        let block = Block::new(last.index + 1, last.hash.0.clone(), now_unix(), data, validator, signature);
        self.ledger.append(block.clone())?;
        Ok(block)
    }

    /// Switches the engine to one of the three production-optimization
    /// presets (§4.6). Returns a warning message when `level` disables
    /// integrity checks.
    pub fn apply_production_optimization(&self, level: &str) -> Result<Option<String>, String> {
        let (config, warning) = match level {
            "safe" => (ExecutionConfig::safe(), None),
            "balanced" => (ExecutionConfig::balanced(), None),
            "aggressive" => (
                ExecutionConfig::aggressive(),
                Some("aggressive optimization disables integrity checks; only use this once upstream validation is trusted".to_string()),
            ),
            other => return Err(format!("unknown production optimization level: {other}")),
        };
        self.engine.apply_config(config);
        Ok(warning)
    }

    /// Always restores the "safe" preset, regardless of the level that was
    /// previously applied. Idempotent.
    pub fn rollback_optimization(&self) {
        self.engine.apply_config(ExecutionConfig::safe());
    }

    pub fn stats(&self) -> CoordinatorStats {
        CoordinatorStats {
            block_count: self.ledger.count(),
            pending_count: self.ledger.pending().len(),
            mode: self.engine.mode(),
            active_delegates: self.registry.active_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balances::store::InMemoryBalanceStore;
    use crate::consensus::ConsensusConfig;
    use crate::ledger::store::InMemoryLedgerStore;
    use crate::types::{Amount, FeePolicy};

    fn fresh_coordinator() -> (Arc<ProtocolCoordinator<InMemoryLedgerStore, InMemoryBalanceStore>>, Address) {
        let ledger = Arc::new(Ledger::new(InMemoryLedgerStore::new(), 1_700_000_000));
        let balances = Arc::new(BalanceLedger::new(InMemoryBalanceStore::new()));
        let registry = Arc::new(DelegateRegistry::new(ConsensusConfig::default()));
        let engine = Arc::new(ExecutionEngine::new(ledger.clone(), balances.clone(), FeePolicy::ConsensusSplit, ExecutionConfig::balanced()));

        let treasury = Address::new("treasury");
        let alice = Address::derive(b"alice");
        balances.transfer(&treasury, &alice, Amount::from_whole(1_000)).unwrap();

        let coordinator = Arc::new(ProtocolCoordinator::new(ledger, balances, registry, engine));
        (coordinator, alice)
    }

    #[tokio::test]
    async fn create_block_is_empty_when_nothing_pending() {
        let (coordinator, _alice) = fresh_coordinator();
        let block = coordinator.create_block(&[], Address::new("genesis"), vec![]).unwrap();
        assert!(block.data.is_empty());
        assert_eq!(coordinator.stats().block_count, 2);
    }

    #[tokio::test]
    async fn process_transactions_then_create_block_includes_successful_tx() {
        let (coordinator, alice) = fresh_coordinator();
        let bob = Address::derive(b"bob");
        let tx = Transaction::new(alice, bob, Amount::from_whole(100), 1_700_000_001, vec![]);

        let results = coordinator.process_transactions(&[tx.clone()]).await;
        assert!(results[0].is_success());

        let block = coordinator.create_block(&results, Address::new("genesis"), vec![]).unwrap();
        assert_eq!(block.data.len(), 1);
        assert_eq!(block.data[0].id, tx.id);
    }

    #[tokio::test]
    async fn apply_production_optimization_aggressive_warns_and_disables_integrity() {
        let (coordinator, _alice) = fresh_coordinator();
        let warning = coordinator.apply_production_optimization("aggressive").unwrap();
        assert!(warning.is_some());
        assert!(!coordinator.engine.config().integrity_checks);
    }

    #[tokio::test]
    async fn rollback_optimization_always_restores_safe() {
        let (coordinator, _alice) = fresh_coordinator();
        coordinator.apply_production_optimization("aggressive").unwrap();
        coordinator.rollback_optimization();
        let config = coordinator.engine.config();
        assert_eq!(config.max_workers, ExecutionConfig::safe().max_workers);
        assert!(config.integrity_checks);
    }

    #[tokio::test]
    async fn apply_production_optimization_rejects_unknown_level() {
        let (coordinator, _alice) = fresh_coordinator();
        assert!(coordinator.apply_production_optimization("turbo").is_err());
    }
}
