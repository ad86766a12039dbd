use async_trait::async_trait;

use crate::error::EstimateResult;
use crate::util;

/// Hydrators enrich candidates with fields computed from the query or
/// external lookups (severity, pricing). Like scorers, they return a
/// parallel vector and copy only their own fields back via `update`.
#[async_trait]
pub trait Hydrator<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this hydrator should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Hydrate candidates, returning a vector parallel to the input.
    async fn hydrate(&self, query: &Q, candidates: &[C]) -> EstimateResult<Vec<C>>;

    /// Copy this hydrator's fields from the hydrated copy onto the
    /// candidate.
    fn update(&self, candidate: &mut C, hydrated: C);

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
