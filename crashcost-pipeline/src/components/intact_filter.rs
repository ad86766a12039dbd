use async_trait::async_trait;

use crate::error::EstimateResult;
use crate::filter::{Filter, FilterResult};
use crate::types::{DamageCandidate, EstimateQuery};

/// Drops intact parts from the candidate set.
///
/// Disabled when the query asks to keep them (`include_intact`); the
/// pricing hydrator still refuses to price intact candidates either way.
pub struct IntactFilter;

#[async_trait]
impl Filter<EstimateQuery, DamageCandidate> for IntactFilter {
    fn enable(&self, query: &EstimateQuery) -> bool {
        !query.include_intact
    }

    async fn filter(
        &self,
        _query: &EstimateQuery,
        candidates: Vec<DamageCandidate>,
    ) -> EstimateResult<FilterResult<DamageCandidate>> {
        let (kept, removed): (Vec<_>, Vec<_>) =
            candidates.into_iter().partition(|c| !c.is_intact());
        Ok(FilterResult { kept, removed })
    }
}
