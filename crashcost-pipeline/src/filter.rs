use async_trait::async_trait;

use crate::error::EstimateResult;
use crate::util;

/// Result of a filter operation, partitioning candidates into kept and
/// removed.
pub struct FilterResult<C> {
    pub kept: Vec<C>,
    pub removed: Vec<C>,
}

/// Filters run sequentially and partition candidates into kept and
/// removed sets. Removed candidates are counted for reporting but never
/// reach pricing.
#[async_trait]
pub trait Filter<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this filter should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Partition candidates into kept (continue to the next stage) and
    /// removed (excluded from further processing).
    async fn filter(&self, query: &Q, candidates: Vec<C>) -> EstimateResult<FilterResult<C>>;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
