use async_trait::async_trait;

use crashcost_core::severity::Severity;

use crate::error::EstimateResult;
use crate::scorer::Scorer;
use crate::types::{DamageCandidate, EstimateQuery};

/// Scores candidates by severity-weighted confidence so the report leads
/// with the repairs an estimator should look at first.
///
/// Each severity tier gets a fixed multiplier; intact candidates (alive
/// only under `include_intact`) score zero and sink to the bottom.
pub struct SeverityPriorityScorer {
    pub severe_weight: f64,
    pub moderate_weight: f64,
    pub minor_weight: f64,
}

impl Default for SeverityPriorityScorer {
    fn default() -> Self {
        Self {
            severe_weight: 3.0,
            moderate_weight: 2.0,
            minor_weight: 1.0,
        }
    }
}

impl SeverityPriorityScorer {
    fn weight(&self, severity: Option<Severity>) -> f64 {
        match severity {
            Some(Severity::Severe) => self.severe_weight,
            Some(Severity::Moderate) => self.moderate_weight,
            Some(Severity::Minor) => self.minor_weight,
            None => 0.0,
        }
    }
}

#[async_trait]
impl Scorer<EstimateQuery, DamageCandidate> for SeverityPriorityScorer {
    async fn score(
        &self,
        _query: &EstimateQuery,
        candidates: &[DamageCandidate],
    ) -> EstimateResult<Vec<DamageCandidate>> {
        let scored = candidates
            .iter()
            .map(|c| DamageCandidate {
                priority_score: Some(c.confidence * self.weight(c.severity)),
                ..DamageCandidate::default()
            })
            .collect();
        Ok(scored)
    }

    fn update(&self, candidate: &mut DamageCandidate, scored: DamageCandidate) {
        candidate.priority_score = scored.priority_score;
    }
}
