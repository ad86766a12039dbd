use async_trait::async_trait;

use crate::error::EstimateResult;
use crate::util;

/// Sources produce the initial candidate set for a query.
///
/// The estimation pipeline's source runs detection fusion; a future
/// multi-image pipeline would add one source per image.
#[async_trait]
pub trait Source<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this source should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Produce candidates for the given query.
    async fn get_candidates(&self, query: &Q) -> EstimateResult<Vec<C>>;

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
