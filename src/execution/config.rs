use std::time::Duration;

/// Which code path [`super::ExecutionEngine::run_batch`] takes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecutionMode {
    /// Apply transactions one at a time, in order.
    Sequential,
    /// Apply transactions concurrently, bounded by `max_workers`.
    Parallel,
}

/// Tunable knobs for the execution engine (§4.5, §4.6).
///
/// [`Self::default`] matches the "balanced" preset; [`Self::safe`] and
/// [`Self::aggressive`] are the other two production-optimization presets
/// [`crate::protocol::ProtocolCoordinator::apply_production_optimization`]
/// switches between.
#[derive(Clone, Debug)]
pub struct ExecutionConfig {
    /// Number of active delegates strictly above which [`ExecutionMode::Parallel`]
    /// is selected; at or below it, [`ExecutionMode::Sequential`].
    pub delegate_threshold: usize,
    /// Upper bound on concurrently in-flight transactions in parallel mode.
    pub max_workers: usize,
    /// Maximum number of transactions handled by a single `run_batch` call.
    pub batch_size: usize,
    /// Per-transaction timeout.
    pub timeout: Duration,
    /// Whether [`crate::types::Transaction::integrity_holds`] is checked
    /// before applying each transaction.
    pub integrity_checks: bool,
}

impl ExecutionConfig {
    fn available_parallelism() -> usize {
        std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
    }

    /// Conservative preset: few workers, small batches, integrity checks on.
    pub fn safe() -> Self {
        Self {
            delegate_threshold: 6,
            max_workers: std::cmp::max(2, Self::available_parallelism() / 2),
            batch_size: 25,
            timeout: Duration::from_secs(60),
            integrity_checks: true,
        }
    }

    /// Default preset: scales workers to the host, keeps integrity checks on.
    pub fn balanced() -> Self {
        Self {
            delegate_threshold: 11,
            max_workers: Self::available_parallelism(),
            batch_size: 100,
            timeout: Duration::from_secs(30),
            integrity_checks: true,
        }
    }

    /// Throughput-optimized preset. Disables integrity checks — callers
    /// should only use this once they trust the chain's upstream validation.
    pub fn aggressive() -> Self {
        Self {
            delegate_threshold: 11,
            max_workers: Self::available_parallelism() * 2,
            batch_size: 250,
            timeout: Duration::from_secs(15),
            integrity_checks: false,
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::balanced()
    }
}
