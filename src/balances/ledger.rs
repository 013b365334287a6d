//! Address-keyed balance ledger (§4.3).

use std::sync::Mutex;

use crate::types::{Address, Amount};

use super::error::BalanceError;
use super::store::BalanceStore;

const MAX_SUPPLY_UNITS: u64 = 1_000_000_000;
const CIRCULATING_KEY: &str = "circulating_supply";

/// Address→balance mapping with transfer, mint, burn, and circulating
/// supply accounting.
///
/// Transfer and mint are serialized behind a single [`Mutex`]: the backing
/// [`BalanceStore`] is not assumed to support its own transactions.
pub struct BalanceLedger<S> {
    inner: Mutex<S>,
}

impl<S: BalanceStore> BalanceLedger<S> {
    /// Creates a balance ledger with the full `MAX_SUPPLY` credited to the
    /// `treasury` account, matching the data model's bootstrap rule.
    pub fn new(mut store: S) -> Self {
        if store.get_system(CIRCULATING_KEY).is_none() {
            let max_supply = Amount::from_whole(MAX_SUPPLY_UNITS);
            store.set(&Address::new("treasury"), max_supply);
            store.set_system(CIRCULATING_KEY, max_supply);
        }
        Self {
            inner: Mutex::new(store),
        }
    }

    /// Debits `from` and credits `to`. `to` is created with a zero balance
    /// if it has never been seen before.
    pub fn transfer(&self, from: &Address, to: &Address, amount: Amount) -> Result<(), BalanceError> {
        let mut store = self.inner.lock().expect("balance ledger lock poisoned");

        let from_balance = store.get(from).ok_or(BalanceError::UnknownSender)?;
        let new_from_balance = from_balance.checked_sub(amount).ok_or(BalanceError::InsufficientBalance)?;

        let to_balance = store.get(to).unwrap_or(Amount::ZERO);
        let new_to_balance = to_balance
            .checked_add(amount)
            .expect("transfer amount bounded by circulating supply cannot overflow Decimal");

        store.set(from, new_from_balance);
        store.set(to, new_to_balance);
        Ok(())
    }

    /// Current balance of `addr`; zero for unknown addresses.
    pub fn balance(&self, addr: &Address) -> Amount {
        let store = self.inner.lock().expect("balance ledger lock poisoned");
        store.get(addr).unwrap_or(Amount::ZERO)
    }

    /// Credits `to` and increases circulating supply. Rejected if it would
    /// push circulating supply above `MAX_SUPPLY`.
    pub fn mint(&self, to: &Address, amount: Amount) -> Result<(), BalanceError> {
        let mut store = self.inner.lock().expect("balance ledger lock poisoned");

        let circulating = store.get_system(CIRCULATING_KEY).unwrap_or(Amount::ZERO);
        let new_circulating = circulating.checked_add(amount).ok_or(BalanceError::ExceedsMaxSupply)?;
        if new_circulating.as_decimal() > Amount::from_whole(MAX_SUPPLY_UNITS).as_decimal() {
            return Err(BalanceError::ExceedsMaxSupply);
        }

        let to_balance = store.get(to).unwrap_or(Amount::ZERO);
        let new_to_balance = to_balance
            .checked_add(amount)
            .expect("mint amount bounded by MAX_SUPPLY cannot overflow Decimal");

        store.set(to, new_to_balance);
        store.set_system(CIRCULATING_KEY, new_circulating);
        Ok(())
    }

    /// Decreases circulating supply only. Does NOT touch any address
    /// balance — burns are accounted at the supply level alone (§4.3).
    pub fn burn(&self, amount: Amount) {
        if amount.is_zero() {
            return;
        }
        let mut store = self.inner.lock().expect("balance ledger lock poisoned");
        let circulating = store.get_system(CIRCULATING_KEY).unwrap_or(Amount::ZERO);
        let new_circulating = circulating.checked_sub(amount).unwrap_or(Amount::ZERO);
        store.set_system(CIRCULATING_KEY, new_circulating);
    }

    /// Debits `from` and decreases circulating supply by the same amount,
    /// destroying funds that were actually held in a balance (as opposed to
    /// [`Self::burn`], which only adjusts the supply counter).
    pub fn burn_from(&self, from: &Address, amount: Amount) -> Result<(), BalanceError> {
        if amount.is_zero() {
            return Ok(());
        }
        let mut store = self.inner.lock().expect("balance ledger lock poisoned");

        let from_balance = store.get(from).ok_or(BalanceError::UnknownSender)?;
        let new_from_balance = from_balance.checked_sub(amount).ok_or(BalanceError::InsufficientBalance)?;
        store.set(from, new_from_balance);

        let circulating = store.get_system(CIRCULATING_KEY).unwrap_or(Amount::ZERO);
        let new_circulating = circulating.checked_sub(amount).unwrap_or(Amount::ZERO);
        store.set_system(CIRCULATING_KEY, new_circulating);
        Ok(())
    }

    pub fn circulating(&self) -> Amount {
        let store = self.inner.lock().expect("balance ledger lock poisoned");
        store.get_system(CIRCULATING_KEY).unwrap_or(Amount::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balances::store::InMemoryBalanceStore;

    fn fresh() -> BalanceLedger<InMemoryBalanceStore> {
        BalanceLedger::new(InMemoryBalanceStore::new())
    }

    #[test]
    fn treasury_starts_with_max_supply() {
        let ledger = fresh();
        let treasury = Address::new("treasury");
        assert_eq!(ledger.balance(&treasury), Amount::from_whole(MAX_SUPPLY_UNITS));
        assert_eq!(ledger.circulating(), Amount::from_whole(MAX_SUPPLY_UNITS));
    }

    #[test]
    fn transfer_from_unknown_sender_fails() {
        let ledger = fresh();
        let ghost = Address::derive(b"ghost");
        let bob = Address::derive(b"bob");
        let err = ledger.transfer(&ghost, &bob, Amount::from_whole(1)).unwrap_err();
        assert!(matches!(err, BalanceError::UnknownSender));
    }

    #[test]
    fn transfer_insufficient_balance_fails() {
        let ledger = fresh();
        let treasury = Address::new("treasury");
        let bob = Address::derive(b"bob");
        let err = ledger
            .transfer(&treasury, &bob, Amount::from_whole(MAX_SUPPLY_UNITS + 1))
            .unwrap_err();
        assert!(matches!(err, BalanceError::InsufficientBalance));
    }

    #[test]
    fn transfer_creates_recipient_with_transferred_amount() {
        let ledger = fresh();
        let treasury = Address::new("treasury");
        let bob = Address::derive(b"bob");
        ledger.transfer(&treasury, &bob, Amount::from_whole(100)).unwrap();
        assert_eq!(ledger.balance(&bob), Amount::from_whole(100));
    }

    #[test]
    fn circulating_supply_is_invariant_under_transfer() {
        let ledger = fresh();
        let treasury = Address::new("treasury");
        let bob = Address::derive(b"bob");
        let before = ledger.circulating();
        ledger.transfer(&treasury, &bob, Amount::from_whole(100)).unwrap();
        assert_eq!(ledger.circulating(), before);
    }

    #[test]
    fn mint_beyond_max_supply_is_rejected() {
        let ledger = fresh();
        let bob = Address::derive(b"bob");
        let err = ledger.mint(&bob, Amount::from_whole(1)).unwrap_err();
        assert!(matches!(err, BalanceError::ExceedsMaxSupply));
    }

    #[test]
    fn burn_decreases_circulating_without_touching_balances() {
        let ledger = fresh();
        let treasury = Address::new("treasury");
        let before_balance = ledger.balance(&treasury);
        ledger.burn(Amount::from_whole(1_000));
        assert_eq!(ledger.balance(&treasury), before_balance);
        assert_eq!(ledger.circulating(), Amount::from_whole(MAX_SUPPLY_UNITS - 1_000));
    }
}
