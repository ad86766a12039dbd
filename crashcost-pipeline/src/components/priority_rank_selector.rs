use crate::selector::Selector;
use crate::types::{DamageCandidate, EstimateQuery};

/// Orders candidates by priority score, highest first, keeping all of
/// them: an estimate covers every damaged part, so there is no top-K
/// cut here. Unscored candidates rank below scored ones.
pub struct PriorityRankSelector;

impl Selector<EstimateQuery, DamageCandidate> for PriorityRankSelector {
    fn score(&self, candidate: &DamageCandidate) -> f64 {
        candidate.priority_score.unwrap_or(f64::NEG_INFINITY)
    }
}
