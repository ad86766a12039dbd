use async_trait::async_trait;

use crashcost_core::severity::score;

use crate::error::EstimateResult;
use crate::hydrator::Hydrator;
use crate::types::{DamageCandidate, EstimateQuery};

/// Fills the severity field on damaged candidates.
///
/// A severity already present on the candidate is a caller override and
/// survives unchanged. Intact candidates never get one.
pub struct SeverityHydrator;

#[async_trait]
impl Hydrator<EstimateQuery, DamageCandidate> for SeverityHydrator {
    async fn hydrate(
        &self,
        _query: &EstimateQuery,
        candidates: &[DamageCandidate],
    ) -> EstimateResult<Vec<DamageCandidate>> {
        let hydrated = candidates
            .iter()
            .map(|c| {
                let severity = if c.is_intact() {
                    None
                } else {
                    let requested = c.severity.map(|s| s.as_str());
                    Some(score(&c.damage_type, c.confidence, requested))
                };
                DamageCandidate {
                    severity,
                    ..DamageCandidate::default()
                }
            })
            .collect();
        Ok(hydrated)
    }

    fn update(&self, candidate: &mut DamageCandidate, hydrated: DamageCandidate) {
        candidate.severity = hydrated.severity;
    }
}
