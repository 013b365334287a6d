//! Storage abstraction used by the ledger.

use std::collections::HashMap;

use crate::types::Block;

/// Abstract persistence interface consumed by [`super::Ledger`] (§6).
///
/// Implementations can be backed by in-memory maps, a relational store, a
/// file store, etc. `replace_all` MUST be all-or-nothing: either every
/// block in `blocks` is durably stored and readable afterwards, or the
/// store is left exactly as it was before the call.
pub trait LedgerStore {
    /// Persists a single block, keyed by its index.
    fn put_block(&mut self, block: Block);

    /// Fetches the block at `index`, if present.
    fn get_block(&self, index: u64) -> Option<Block>;

    /// Atomically replaces the entire stored chain.
    fn replace_all(&mut self, blocks: Vec<Block>);

    /// Returns the number of blocks currently stored.
    fn count_blocks(&self) -> u64;

    /// Returns every stored block, ordered by index.
    fn all_blocks(&self) -> Vec<Block>;
}

/// In-memory implementation of [`LedgerStore`].
///
/// This is the only `LedgerStore` implementation provided by this crate: a
/// persistence backend (file or relational store) is an external
/// collaborator concern per §1 and is not modelled beyond this trait.
#[derive(Default)]
pub struct InMemoryLedgerStore {
    blocks: HashMap<u64, Block>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn put_block(&mut self, block: Block) {
        self.blocks.insert(block.index, block);
    }

    fn get_block(&self, index: u64) -> Option<Block> {
        self.blocks.get(&index).cloned()
    }

    fn replace_all(&mut self, blocks: Vec<Block>) {
        let mut new_map = HashMap::with_capacity(blocks.len());
        for block in blocks {
            new_map.insert(block.index, block);
        }
        self.blocks = new_map;
    }

    fn count_blocks(&self) -> u64 {
        self.blocks.len() as u64
    }

    fn all_blocks(&self) -> Vec<Block> {
        let mut blocks: Vec<Block> = self.blocks.values().cloned().collect();
        blocks.sort_by_key(|b| b.index);
        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Block;

    #[test]
    fn put_and_get_block_roundtrip() {
        let mut store = InMemoryLedgerStore::new();
        let genesis = Block::genesis(1_700_000_000);
        store.put_block(genesis.clone());

        let fetched = store.get_block(0).expect("block should be present");
        assert_eq!(fetched.hash, genesis.hash);
        assert_eq!(store.count_blocks(), 1);
    }

    #[test]
    fn replace_all_is_atomic_from_the_caller_perspective() {
        let mut store = InMemoryLedgerStore::new();
        store.put_block(Block::genesis(1));

        let replacement = vec![Block::genesis(2)];
        store.replace_all(replacement);

        assert_eq!(store.count_blocks(), 1);
        assert_eq!(store.get_block(0).unwrap().timestamp, 2);
    }

    #[test]
    fn all_blocks_is_ordered_by_index() {
        let mut store = InMemoryLedgerStore::new();
        let genesis = Block::genesis(1);
        store.put_block(genesis.clone());
        let mut next = genesis.clone();
        next.index = 1;
        store.put_block(next);

        let all = store.all_blocks();
        assert_eq!(all[0].index, 0);
        assert_eq!(all[1].index, 1);
    }
}
