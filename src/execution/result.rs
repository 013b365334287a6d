use crate::types::{Amount, TxId};

use super::error::TxError;

/// The outcome of applying a single transaction within a batch.
///
/// `index` is the transaction's position in the batch as submitted, which
/// [`super::ExecutionEngine::run_batch`] preserves even when the batch ran
/// in [`super::ExecutionMode::Parallel`] (§4.5, §8 S4).
#[derive(Clone, Debug)]
pub struct TransactionResult {
    pub index: usize,
    pub tx_id: TxId,
    /// `Ok(fee)` carries the fee collected for this transaction, for the
    /// caller to accumulate and eventually hand to
    /// [`crate::consensus::DelegateRegistry::distribute_fees`].
    pub outcome: Result<Amount, TxError>,
}

impl TransactionResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}
