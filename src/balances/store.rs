//! Storage abstraction used by the balance ledger (§6).

use std::collections::HashMap;

use crate::types::{Address, Amount};

/// Abstract balance-map persistence interface consumed by
/// [`super::BalanceLedger`].
pub trait BalanceStore {
    fn get(&self, addr: &Address) -> Option<Amount>;
    fn set(&mut self, addr: &Address, amount: Amount);
    fn get_system(&self, key: &str) -> Option<Amount>;
    fn set_system(&mut self, key: &str, amount: Amount);
}

/// In-memory implementation of [`BalanceStore`].
///
/// The only implementation provided here: a relational or file-backed
/// store is an external collaborator concern per §1.
#[derive(Default)]
pub struct InMemoryBalanceStore {
    balances: HashMap<String, Amount>,
    system: HashMap<String, Amount>,
}

impl InMemoryBalanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BalanceStore for InMemoryBalanceStore {
    fn get(&self, addr: &Address) -> Option<Amount> {
        self.balances.get(addr.as_str()).copied()
    }

    fn set(&mut self, addr: &Address, amount: Amount) {
        self.balances.insert(addr.as_str().to_string(), amount);
    }

    fn get_system(&self, key: &str) -> Option<Amount> {
        self.system.get(key).copied()
    }

    fn set_system(&mut self, key: &str, amount: Amount) {
        self.system.insert(key.to_string(), amount);
    }
}
