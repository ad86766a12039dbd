use async_trait::async_trait;

use crate::error::EstimateResult;
use crate::util;

/// Scorers assign or adjust priority scores without reordering or
/// removing candidates.
///
/// `score` returns a full parallel vector; `update` copies only the
/// fields this scorer owns back onto the live candidate, so scorers
/// compose without clobbering each other.
#[async_trait]
pub trait Scorer<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this scorer should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Score candidates, returning a vector parallel to the input.
    async fn score(&self, query: &Q, candidates: &[C]) -> EstimateResult<Vec<C>>;

    /// Copy this scorer's fields from the scored copy onto the candidate.
    fn update(&self, candidate: &mut C, scored: C);

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
