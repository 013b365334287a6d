//! The append-only ledger: ordered block sequence + pending-tx buffer.

use std::sync::RwLock;

use crate::types::{Block, Transaction};

use super::error::LedgerError;
use super::store::LedgerStore;

/// The ledger, generic over its backing [`LedgerStore`].
///
/// A single [`RwLock`] guards both the chain and the pending pool: readers
/// take a snapshot (clone) before returning so the lock is never held
/// across a caller's subsequent work (§4.2).
pub struct Ledger<S> {
    inner: RwLock<Inner<S>>,
}

struct Inner<S> {
    store: S,
    pending: Vec<Transaction>,
}

impl<S: LedgerStore> Ledger<S> {
    /// Creates a ledger seeded with a genesis block at the given timestamp.
    pub fn new(mut store: S, genesis_timestamp: u64) -> Self {
        if store.count_blocks() == 0 {
            store.put_block(Block::genesis(genesis_timestamp));
        }
        Self {
            inner: RwLock::new(Inner {
                store,
                pending: Vec::new(),
            }),
        }
    }

    /// Validates and appends `block`, clearing the pending pool on success.
    pub fn append(&self, block: Block) -> Result<(), LedgerError> {
        let mut guard = self.inner.write().expect("ledger lock poisoned");

        let last_index = guard.store.count_blocks().saturating_sub(1);
        let last = guard
            .store
            .get_block(last_index)
            .expect("ledger invariant: store always has at least a genesis block");

        let expected_index = last.index + 1;
        if block.index != expected_index {
            return Err(LedgerError::InvalidIndex {
                expected: expected_index,
                found: block.index,
            });
        }
        if block.previous_hash != last.hash.0 {
            return Err(LedgerError::InvalidPrevHash);
        }
        if !block.hash_is_valid() {
            return Err(LedgerError::InvalidHash);
        }
        for tx in &block.data {
            if !tx.has_well_formed_id() {
                return Err(LedgerError::BadTxPrefix);
            }
        }

        guard.store.put_block(block);
        guard.pending.clear();
        Ok(())
    }

    /// Appends `tx` to the pending pool.
    pub fn submit(&self, tx: Transaction) -> Result<(), LedgerError> {
        if !tx.has_well_formed_id() {
            return Err(LedgerError::BadTxPrefix);
        }
        let mut guard = self.inner.write().expect("ledger lock poisoned");
        guard.pending.push(tx);
        Ok(())
    }

    /// Snapshot of the pending pool.
    pub fn pending(&self) -> Vec<Transaction> {
        let guard = self.inner.read().expect("ledger lock poisoned");
        guard.pending.clone()
    }

    /// The most recently appended block.
    pub fn last(&self) -> Block {
        let guard = self.inner.read().expect("ledger lock poisoned");
        let last_index = guard.store.count_blocks().saturating_sub(1);
        guard
            .store
            .get_block(last_index)
            .expect("ledger invariant: store always has at least a genesis block")
    }

    /// Looks up the block at `index`.
    pub fn by_index(&self, index: u64) -> Result<Block, LedgerError> {
        let guard = self.inner.read().expect("ledger lock poisoned");
        let len = guard.store.count_blocks();
        guard
            .store
            .get_block(index)
            .ok_or(LedgerError::OutOfRange { index, len })
    }

    /// The entire chain, ordered by index.
    pub fn all(&self) -> Vec<Block> {
        let guard = self.inner.read().expect("ledger lock poisoned");
        guard.store.all_blocks()
    }

    /// Number of blocks in the chain.
    pub fn count(&self) -> u64 {
        let guard = self.inner.read().expect("ledger lock poisoned");
        guard.store.count_blocks()
    }

    /// Atomically swaps the full chain and clears the pending pool.
    ///
    /// The caller is responsible for re-applying transaction side-effects
    /// on balances (§4.3); the ledger itself does not touch the
    /// `BalanceLedger`.
    pub fn replace(&self, new_chain: Vec<Block>) {
        let mut guard = self.inner.write().expect("ledger lock poisoned");
        guard.store.replace_all(new_chain);
        guard.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::store::InMemoryLedgerStore;
    use crate::types::{Address, Amount, Block, Transaction};

    fn fresh_ledger() -> Ledger<InMemoryLedgerStore> {
        Ledger::new(InMemoryLedgerStore::new(), 1_700_000_000)
    }

    // S1 - genesis linkage.
    #[test]
    fn genesis_linkage() {
        let ledger = fresh_ledger();
        assert_eq!(ledger.count(), 1);
        let last = ledger.last();
        assert_eq!(last.index, 0);
        assert_eq!(last.previous_hash, "0");
        assert!(last.hash_is_valid());
    }

    #[test]
    fn append_requires_exact_next_index() {
        let ledger = fresh_ledger();
        let last = ledger.last();
        let bad = Block::new(2, last.hash.0.clone(), 1_700_000_001, vec![], Address::new("genesis"), vec![]);
        let err = ledger.append(bad).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidIndex { expected: 1, found: 2 }));
    }

    #[test]
    fn append_requires_matching_previous_hash() {
        let ledger = fresh_ledger();
        let bad = Block::new(1, "not-the-real-hash".to_string(), 1_700_000_001, vec![], Address::new("genesis"), vec![]);
        let err = ledger.append(bad).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidPrevHash));
    }

    #[test]
    fn append_rejects_tampered_hash() {
        let ledger = fresh_ledger();
        let last = ledger.last();
        let mut block = Block::new(1, last.hash.0.clone(), 1_700_000_001, vec![], Address::new("genesis"), vec![]);
        block.hash = crate::types::BlockHash("0".repeat(64));
        let err = ledger.append(block).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidHash));
    }

    #[test]
    fn append_clears_pending_pool() {
        let ledger = fresh_ledger();
        let tx = Transaction::new(Address::derive(b"a"), Address::derive(b"b"), Amount::from_whole(10), 1, vec![]);
        ledger.submit(tx.clone()).unwrap();
        assert_eq!(ledger.pending().len(), 1);

        let last = ledger.last();
        let block = Block::new(1, last.hash.0.clone(), 2, vec![tx], Address::new("genesis"), vec![]);
        ledger.append(block).unwrap();

        assert!(ledger.pending().is_empty());
        assert_eq!(ledger.count(), 2);
    }

    #[test]
    fn by_index_out_of_range() {
        let ledger = fresh_ledger();
        let err = ledger.by_index(5).unwrap_err();
        assert!(matches!(err, LedgerError::OutOfRange { index: 5, len: 1 }));
    }

    #[test]
    fn replace_is_a_no_op_modulo_pending() {
        let ledger = fresh_ledger();
        let tx = Transaction::new(Address::derive(b"a"), Address::derive(b"b"), Amount::from_whole(1), 1, vec![]);
        ledger.submit(tx).unwrap();

        let snapshot = ledger.all();
        ledger.replace(snapshot.clone());

        assert_eq!(ledger.all().len(), snapshot.len());
        assert!(ledger.pending().is_empty());
    }
}
