// src/types/block.rs

//! Block type and canonical hashing.
//!
//! Serialization for hashing purposes is **not** a generic serde format:
//! the data model requires a bit-exact, cross-platform-stable concatenation
//! of fields (§4.1), so [`Block::canonical_bytes`] builds the byte string by
//! hand instead of going through `serde`/`bincode`.

use serde::{Deserialize, Serialize};

use crate::hash;

use super::{Address, Transaction};

/// Strongly-typed block hash: 64 lowercase hex digits, no prefix.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BlockHash(pub String);

impl BlockHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A block in the append-only chain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub previous_hash: String,
    pub timestamp: u64,
    pub data: Vec<Transaction>,
    pub hash: BlockHash,
    pub validator: Address,
    /// Opaque signature bytes; not verified by the core (§6).
    pub signature: Vec<u8>,
}

impl Block {
    /// Returns the canonical byte representation used to derive this
    /// block's hash: `index ‖ previousHash ‖ timestamp ‖ data ‖ validator`,
    /// with no separators other than implicit ASCII concatenation. Neither
    /// the block's own `hash` nor its `signature` feed into this.
    pub fn canonical_bytes(index: u64, previous_hash: &str, timestamp: u64, data: &[Transaction], validator: &str) -> Vec<u8> {
        let mut buf = String::new();
        buf.push_str(&index.to_string());
        buf.push_str(previous_hash);
        buf.push_str(&timestamp.to_string());
        for tx in data {
            buf.push_str(&tx.id.0);
            buf.push_str(tx.from.as_str());
            buf.push_str(tx.to.as_str());
            buf.push_str(&tx.amount.to_string());
            buf.push_str(&tx.timestamp.to_string());
        }
        buf.push_str(validator);
        buf.into_bytes()
    }

    /// Computes the canonical SHA-256 hash for the given block fields.
    pub fn compute_hash(index: u64, previous_hash: &str, timestamp: u64, data: &[Transaction], validator: &str) -> BlockHash {
        let bytes = Self::canonical_bytes(index, previous_hash, timestamp, data, validator);
        BlockHash(hash::sha256_hex(&bytes))
    }

    /// Builds a new block with its hash computed from the other fields.
    pub fn new(index: u64, previous_hash: String, timestamp: u64, data: Vec<Transaction>, validator: Address, signature: Vec<u8>) -> Self {
        let hash = Self::compute_hash(index, &previous_hash, timestamp, &data, validator.as_str());
        Self {
            index,
            previous_hash,
            timestamp,
            data,
            hash,
            validator,
            signature,
        }
    }

    /// Re-derives this block's hash from its own fields and compares it to
    /// the stored `hash`. Used by the ledger on `append` and by the auditor.
    pub fn hash_is_valid(&self) -> bool {
        let recomputed = Self::compute_hash(self.index, &self.previous_hash, self.timestamp, &self.data, self.validator.as_str());
        recomputed == self.hash
    }

    /// The literal genesis block: index 0, `previousHash = "0"`, no
    /// transactions, validator `"genesis"`.
    pub fn genesis(timestamp: u64) -> Self {
        Self::new(
            0,
            hash::GENESIS_PREV_HASH.to_string(),
            timestamp,
            Vec::new(),
            Address::new("genesis"),
            Vec::new(),
        )
    }
}
