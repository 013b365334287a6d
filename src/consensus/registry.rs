//! Delegate registry: DPoS weighted voting, round-robin production, and
//! the deterministic fee-distribution rule (§4.4).

use std::sync::RwLock;

use rust_decimal::Decimal;

use crate::balances::BalanceLedger;
use crate::balances::store::BalanceStore;
use crate::types::{Address, Amount, Block, Delegate, Vote};

use super::config::ConsensusConfig;
use super::error::ConsensusError;

struct State {
    delegates: Vec<Delegate>,
    votes: Vec<Vote>,
    /// Index into the votes-sorted active set of the current producer slot.
    producer_slot: usize,
    last_block_time: u64,
}

/// DPoS delegate registry.
///
/// A single [`RwLock`] guards the whole state, including producer
/// advancement: the reference implementation advances the producer slot
/// under a read-then-write-then-read sequence, which is racy (§9 open
/// question). This implementation instead performs "observe elapsed time,
/// advance slot, update `last_block_time`" as one write-locked critical
/// section.
pub struct DelegateRegistry {
    config: ConsensusConfig,
    state: RwLock<State>,
}

impl DelegateRegistry {
    pub fn new(config: ConsensusConfig) -> Self {
        Self {
            config,
            state: RwLock::new(State {
                delegates: Vec::new(),
                votes: Vec::new(),
                producer_slot: 0,
                last_block_time: 0,
            }),
        }
    }

    /// Delegates ordered by `votes_received` descending, ties broken by
    /// `registered_at` ascending (invariant 6, §3). Only active delegates
    /// are included, but this crate never deactivates a delegate once
    /// registered (deactivation is an operator policy hook, §4.4).
    fn sorted_active(state: &State) -> Vec<Delegate> {
        let mut active: Vec<Delegate> = state.delegates.iter().filter(|d| d.active).cloned().collect();
        active.sort_by(|a, b| {
            b.votes_received
                .cmp(&a.votes_received)
                .then(a.registered_at.cmp(&b.registered_at))
        });
        active
    }

    pub fn register_delegate(&self, address: Address, stake: Amount, now: u64) -> Result<(), ConsensusError> {
        if stake < self.config.min_delegate_stake {
            return Err(ConsensusError::BelowMinStake);
        }

        let mut state = self.state.write().expect("registry lock poisoned");

        if state.delegates.iter().any(|d| d.address == address) {
            return Err(ConsensusError::AlreadyRegistered);
        }
        let active_count = state.delegates.iter().filter(|d| d.active).count();
        if active_count >= self.config.max_delegates {
            return Err(ConsensusError::MaxReached);
        }

        state.delegates.push(Delegate::new(address, stake, now));
        Ok(())
    }

    pub fn vote_for_delegate(&self, voter: Address, delegate: Address, amount: Amount, now: u64) -> Result<(), ConsensusError> {
        let mut state = self.state.write().expect("registry lock poisoned");

        let target = state
            .delegates
            .iter_mut()
            .find(|d| d.address == delegate)
            .ok_or(ConsensusError::DelegateNotFound)?;

        target.votes_received = target
            .votes_received
            .checked_add(amount)
            .expect("vote tallies bounded by circulating supply cannot overflow Decimal");

        state.votes.push(Vote {
            voter_address: voter,
            delegate_address: delegate,
            amount,
            timestamp: now,
        });
        Ok(())
    }

    /// Producer of the current block slot, advancing the round-robin
    /// position whenever `now - last_block_time >= block_time_secs`. If
    /// the active set is empty, returns `founder`.
    pub fn active_producer(&self, now: u64, founder: &Address) -> Address {
        let mut state = self.state.write().expect("registry lock poisoned");
        let sorted = Self::sorted_active(&state);

        if sorted.is_empty() {
            return founder.clone();
        }

        let elapsed = now.saturating_sub(state.last_block_time);
        if elapsed >= self.config.block_time_secs {
            state.producer_slot = (state.producer_slot + 1) % sorted.len();
            state.last_block_time = now;
        }

        let slot = state.producer_slot % sorted.len();
        sorted[slot].address.clone()
    }

    pub fn active_count(&self) -> usize {
        let state = self.state.read().expect("registry lock poisoned");
        state.delegates.iter().filter(|d| d.active).count()
    }

    /// Snapshot of active delegates, ordered by `votes_received` desc.
    pub fn delegates(&self) -> Vec<Delegate> {
        let state = self.state.read().expect("registry lock poisoned");
        Self::sorted_active(&state)
    }

    /// `true` iff `block.validator` is an active delegate, or the active
    /// set is empty and `block.validator == founder`.
    pub fn validate_block(&self, block: &Block, founder: &Address) -> bool {
        let state = self.state.read().expect("registry lock poisoned");
        let sorted = Self::sorted_active(&state);
        if sorted.is_empty() {
            return &block.validator == founder;
        }
        sorted.iter().any(|d| d.address == block.validator)
    }

    /// Splits `total` among active delegates (equal share) and the
    /// community/founder accounts, burning the configured ratio plus any
    /// non-distributable remainder from the equal split (§4.4). No-op when
    /// `total <= 0`.
    ///
    /// `total` is sourced from the `treasury` account: each recipient's
    /// share is transferred out of `treasury` (preserving circulating
    /// supply), and the burn portion plus split dust is removed from
    /// `treasury`'s balance via [`BalanceLedger::burn_from`], which lowers
    /// circulating supply by the same amount.
    pub fn distribute_fees<BS: BalanceStore>(&self, total: Amount, balances: &BalanceLedger<BS>) {
        if !total.is_positive() {
            return;
        }

        let treasury = Address::new("treasury");
        let split = &self.config.fee_split;
        let delegate_pool = total.scaled_by(split.delegate);
        let burn_amount = total.scaled_by(split.burn);
        let community_amount = total.scaled_by(split.community);
        let founder_amount = total.scaled_by(split.founder);

        let mut state = self.state.write().expect("registry lock poisoned");
        let active_indices: Vec<usize> = state
            .delegates
            .iter()
            .enumerate()
            .filter(|(_, d)| d.active)
            .map(|(i, _)| i)
            .collect();

        let mut dust = delegate_pool;
        if !active_indices.is_empty() {
            let n = Decimal::from(active_indices.len());
            let share = Amount::new((delegate_pool.as_decimal() / n).round_dp(8))
                .expect("share of a non-negative pool is non-negative");
            let distributed = share.scaled_by(n);
            dust = delegate_pool.checked_sub(distributed).unwrap_or(Amount::ZERO);

            for idx in active_indices {
                let delegate = &mut state.delegates[idx];
                if balances.transfer(&treasury, &delegate.address, share).is_ok() {
                    delegate.total_rewards = delegate
                        .total_rewards
                        .checked_add(share)
                        .unwrap_or(delegate.total_rewards);
                }
            }
        }
        drop(state);

        let _ = balances.transfer(&treasury, &Address::new("community"), community_amount);
        let _ = balances.transfer(&treasury, &Address::new("founder"), founder_amount);
        let _ = balances.burn_from(&treasury, burn_amount.checked_add(dust).unwrap_or(burn_amount));
    }
}
