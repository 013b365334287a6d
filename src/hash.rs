//! Canonical digests and the bit-exact identifier formats used everywhere
//! else in this crate.
//!
//! Every externally visible identifier (addresses, transaction IDs, block
//! hashes) is derived through the functions in this module so that the hex
//! formatting and prefixing rules live in exactly one place.

use sha2::{Digest, Sha256};

/// 4-character ASCII marker on every address and transaction ID.
pub const ID_PREFIX: &str = "AdNe";

/// Total length of an address string (`AdNe` + 62 hex digits).
pub const ADDRESS_LEN: usize = 66;

/// Total length of a transaction ID string (`AdNe` + 60 hex digits).
pub const TX_ID_LEN: usize = 64;

/// Total length of a raw block hash string (64 hex digits, no prefix).
pub const BLOCK_HASH_LEN: usize = 64;

/// Lowercase hex SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    hex::encode(digest)
}

/// Derives an `AdNe`-prefixed identifier of the given total length from
/// `data`, by hashing and truncating the hex digest to fill the remainder
/// after the prefix.
///
/// `total_len` must be at least `ID_PREFIX.len()`; callers pass the two
/// concrete lengths used in this crate (`ADDRESS_LEN`, `TX_ID_LEN`).
fn prefixed_id(data: &[u8], total_len: usize) -> String {
    let digest_hex = sha256_hex(data);
    let remainder = total_len - ID_PREFIX.len();
    let mut out = String::with_capacity(total_len);
    out.push_str(ID_PREFIX);
    out.push_str(&digest_hex[..remainder]);
    out
}

/// Derives a transaction ID from the fields the data model specifies:
/// `{from, to, amount, timestamp}`, concatenated in that order.
pub fn transaction_id(from: &str, to: &str, amount: &str, timestamp: u64) -> String {
    let mut buf = String::new();
    buf.push_str(from);
    buf.push_str(to);
    buf.push_str(amount);
    buf.push_str(&timestamp.to_string());
    prefixed_id(buf.as_bytes(), TX_ID_LEN)
}

/// Derives an address from arbitrary seed bytes (e.g. a public key or a
/// deterministic test seed). Not used by user-submitted transactions, which
/// already carry their `from`/`to` as strings; used by bootstrap code that
/// needs to mint fresh demo addresses.
pub fn address_from(seed: &[u8]) -> String {
    prefixed_id(seed, ADDRESS_LEN)
}

/// Returns `true` iff `s` has the exact length and `AdNe` prefix required of
/// an address. Does not check that the remainder is valid hex: core never
/// rejects on hex well-formedness, only on shape, per the reserved-account
/// carve-out in the data model.
pub fn is_well_formed_address(s: &str) -> bool {
    s.len() == ADDRESS_LEN && s.starts_with(ID_PREFIX)
}

/// Returns `true` iff `s` has the exact length and `AdNe` prefix required of
/// a transaction ID.
pub fn is_well_formed_tx_id(s: &str) -> bool {
    s.len() == TX_ID_LEN && s.starts_with(ID_PREFIX)
}

/// Derives an audit event ID from arbitrary seed bytes, using the same
/// `AdNe`-prefixed scheme as transaction IDs.
pub fn event_id(seed: &[u8]) -> String {
    prefixed_id(seed, TX_ID_LEN)
}

/// Reserved logical account names that are exempt from the `AdNe` address
/// shape constraint.
pub const RESERVED_ACCOUNTS: &[&str] = &["treasury", "genesis", "community", "founder"];

/// Returns `true` iff `s` is one of the reserved logical account names.
pub fn is_reserved_account(s: &str) -> bool {
    RESERVED_ACCOUNTS.contains(&s)
}

/// Literal `previousHash` carried by the genesis block.
pub const GENESIS_PREV_HASH: &str = "0";
