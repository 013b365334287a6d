//! Transaction type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hash;

use super::{Address, Amount};

/// Fee ratio applied to every transaction's `amount`: 0.1%.
pub fn fee_ratio() -> Decimal {
    Decimal::new(1, 3)
}

/// Strongly-typed transaction identifier.
///
/// 64 characters, `AdNe`-prefixed, derived as the SHA-256 digest of
/// `{from, to, amount, timestamp}` concatenated in that order (§4.1).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TxId(pub String);

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A value-transfer transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TxId,
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
    pub timestamp: u64,
    /// Opaque signature bytes; the core never verifies this (§6,
    /// `WalletVerifier` is a collaborator concern).
    pub signature: Vec<u8>,
}

impl Transaction {
    /// Builds a transaction with a freshly derived ID.
    pub fn new(from: Address, to: Address, amount: Amount, timestamp: u64, signature: Vec<u8>) -> Self {
        let id = TxId(hash::transaction_id(
            from.as_str(),
            to.as_str(),
            &amount.to_string(),
            timestamp,
        ));
        Self {
            id,
            from,
            to,
            amount,
            timestamp,
            signature,
        }
    }

    /// `amount * 0.001`, rounded to 8 fractional digits.
    pub fn fee(&self) -> Amount {
        self.amount.scaled_by(fee_ratio())
    }

    /// `true` iff `self.id` has the bit-exact `AdNe` shape required of every
    /// committed transaction (invariant 2, §3).
    pub fn has_well_formed_id(&self) -> bool {
        hash::is_well_formed_tx_id(&self.id.0)
    }

    /// Re-derives `id` from `{from, to, amount, timestamp}` and compares it
    /// against the stored value. Unlike [`Self::has_well_formed_id`], which
    /// only checks the `AdNe` shape, this catches a transaction whose `id`
    /// no longer matches its own payload — the integrity check the
    /// execution engine runs before applying a transaction.
    pub fn integrity_holds(&self) -> bool {
        let recomputed = hash::transaction_id(self.from.as_str(), self.to.as_str(), &self.amount.to_string(), self.timestamp);
        recomputed == self.id.0
    }
}
