use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::ledger::Ledger;
use crate::ledger::store::LedgerStore;

use super::event::{AuditEvent, SecurityLevel};

fn now_unix() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

/// Walks the chain checking index contiguity, `previous_hash` linkage,
/// recomputed block hashes, and transaction id shape (§4.7).
///
/// There is exactly one `audit_chain` implementation here — earlier designs
/// in this space kept a separate "in-memory" and "database" variant that
/// diverged on how they guarded against short transaction ids before
/// prefix-checking them (§9). [`crate::types::Transaction::has_well_formed_id`]
/// already checks length before comparing the prefix, via `str::starts_with`,
/// which never panics on a short string, so no such guard is needed here —
/// there is simply one code path.
pub struct Auditor<LS> {
    ledger: Arc<Ledger<LS>>,
    events: Mutex<Vec<AuditEvent>>,
    next_id: AtomicU64,
    running: Arc<AtomicBool>,
}

impl<LS: LedgerStore> Auditor<LS> {
    pub fn new(ledger: Arc<Ledger<LS>>) -> Self {
        Self {
            ledger,
            events: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    fn record(&self, timestamp: u64, severity: SecurityLevel, event_type: &str, message: String, payload: Option<serde_json::Value>) {
        let counter = self.next_id.fetch_add(1, Ordering::SeqCst);
        let event = AuditEvent::new(counter, timestamp, severity, event_type, message, payload);
        self.events.lock().expect("auditor lock poisoned").push(event);
    }

    /// Full history of events recorded across every `audit_chain` run.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("auditor lock poisoned").clone()
    }

    /// Runs one full integrity scan. Returns `true` iff no violation was
    /// found. Always appends an informational start/completion pair plus a
    /// `Critical` event per violation.
    pub fn audit_chain(&self, now: u64) -> bool {
        self.record(now, SecurityLevel::Info, "audit_start", "beginning chain integrity scan".to_string(), None);

        let chain = self.ledger.all();
        let mut healthy = true;

        for block in &chain {
            if !block.hash_is_valid() {
                healthy = false;
                self.record(
                    now,
                    SecurityLevel::Critical,
                    "hash_mismatch",
                    format!("block {} hash does not match its recomputed value", block.index),
                    Some(serde_json::json!({ "block_index": block.index })),
                );
            }
            for tx in &block.data {
                if !tx.has_well_formed_id() {
                    healthy = false;
                    self.record(
                        now,
                        SecurityLevel::Critical,
                        "bad_tx_prefix",
                        format!("block {} contains a transaction without a well-formed id", block.index),
                        Some(serde_json::json!({ "block_index": block.index, "tx_id": tx.id.0 })),
                    );
                }
            }
        }

        for pair in chain.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            if curr.index != prev.index + 1 {
                healthy = false;
                self.record(
                    now,
                    SecurityLevel::Critical,
                    "index_gap",
                    format!("block {} does not follow block {} contiguously", curr.index, prev.index),
                    Some(serde_json::json!({ "block_index": curr.index, "previous_index": prev.index })),
                );
            }
            if curr.previous_hash != prev.hash.0 {
                healthy = false;
                self.record(
                    now,
                    SecurityLevel::Critical,
                    "previous_hash_mismatch",
                    format!("block {} previous_hash does not match block {}'s hash", curr.index, prev.index),
                    Some(serde_json::json!({ "block_index": curr.index, "previous_index": prev.index })),
                );
            }
        }

        self.record(
            now,
            SecurityLevel::Info,
            "audit_complete",
            format!("scan complete: {} blocks, healthy={healthy}", chain.len()),
            Some(serde_json::json!({ "block_count": chain.len(), "healthy": healthy })),
        );
        healthy
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl<LS: LedgerStore + Send + Sync + 'static> Auditor<LS> {
    /// Spawns a background task that calls [`Self::audit_chain`] every
    /// `interval_secs`, until [`Self::stop`] is called.
    pub fn spawn_periodic(self: &Arc<Self>, interval_secs: u64) -> tokio::task::JoinHandle<()> {
        self.running.store(true, Ordering::SeqCst);
        let auditor = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_secs.max(1)));
            loop {
                ticker.tick().await;
                if !auditor.running.load(Ordering::SeqCst) {
                    break;
                }
                let healthy = auditor.audit_chain(now_unix());
                if !healthy {
                    let recent: Vec<_> = auditor.events().into_iter().rev().take(5).collect();
                    match serde_json::to_string(&recent) {
                        Ok(json) => tracing::warn!("auditor: chain integrity violation detected: {json}"),
                        Err(_) => tracing::warn!("auditor: chain integrity violation detected"),
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::store::InMemoryLedgerStore;
    use crate::types::{Address, Amount, Block, BlockHash, Transaction};

    fn fresh_ledger() -> Arc<Ledger<InMemoryLedgerStore>> {
        Arc::new(Ledger::new(InMemoryLedgerStore::new(), 1_700_000_000))
    }

    #[test]
    fn freshly_genesis_chain_is_healthy() {
        let ledger = fresh_ledger();
        let auditor = Auditor::new(ledger);
        assert!(auditor.audit_chain(1_700_000_000));
        assert!(auditor.events().iter().any(|e| e.event_type == "audit_start"));
        assert!(auditor.events().iter().any(|e| e.event_type == "audit_complete"));
    }

    // S5 - integrity failure: tampered hash is flagged Critical.
    #[test]
    fn tampered_block_hash_is_flagged_critical() {
        let ledger = fresh_ledger();
        let last = ledger.last();
        let tx = Transaction::new(Address::derive(b"a"), Address::derive(b"b"), Amount::from_whole(1), 1, vec![]);
        let mut block = Block::new(1, last.hash.0.clone(), 2, vec![tx], Address::new("genesis"), vec![]);
        block.hash = BlockHash("0".repeat(64));
        ledger.replace(vec![last, block]);

        let auditor = Auditor::new(ledger);
        assert!(!auditor.audit_chain(1_700_000_002));
        assert!(auditor
            .events()
            .iter()
            .any(|e| e.event_type == "hash_mismatch" && matches!(e.severity, SecurityLevel::Critical)));
    }

    #[test]
    fn broken_previous_hash_link_is_flagged_critical() {
        let ledger = fresh_ledger();
        let genesis = ledger.last();
        let mut second = Block::new(1, genesis.hash.0.clone(), 2, vec![], Address::new("genesis"), vec![]);
        second.previous_hash = "not-the-real-hash".to_string();
        // Force the hash field back in sync with the tampered previous_hash
        // so this test isolates the linkage check from the hash check.
        second.hash = Block::compute_hash(second.index, &second.previous_hash, second.timestamp, &second.data, second.validator.as_str());
        ledger.replace(vec![genesis, second]);

        let auditor = Auditor::new(ledger);
        assert!(!auditor.audit_chain(1_700_000_002));
        assert!(auditor.events().iter().any(|e| e.event_type == "previous_hash_mismatch"));
    }
}
