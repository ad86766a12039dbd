use async_trait::async_trait;

use crashcost_core::fusion::{fuse, RawDetection};
use crashcost_core::severity::Severity;

use crate::error::EstimateResult;
use crate::source::Source;
use crate::types::{DamageCandidate, EstimateQuery};

/// Source that fuses the two detector outputs into per-part candidates.
///
/// Holds the raw detections for one request. Damage detections are
/// processed in delivery order, so the greedy tie-break in the fusion
/// step stays reproducible for a fixed input.
///
/// Callers may attach a severity override per part detection; fusion
/// output is part-keyed and ordered, so overrides ride along by index
/// and land on the matching candidate before the severity hydrator runs.
pub struct FusionSource {
    parts: Vec<RawDetection>,
    damages: Vec<RawDetection>,
    overrides: Vec<Option<Severity>>,
}

impl FusionSource {
    pub fn new(parts: Vec<RawDetection>, damages: Vec<RawDetection>) -> Self {
        Self {
            parts,
            damages,
            overrides: Vec::new(),
        }
    }

    /// Attach caller severity overrides, parallel to `parts`.
    pub fn with_overrides(
        parts: Vec<RawDetection>,
        damages: Vec<RawDetection>,
        overrides: Vec<Option<Severity>>,
    ) -> Self {
        Self {
            parts,
            damages,
            overrides,
        }
    }
}

#[async_trait]
impl Source<EstimateQuery, DamageCandidate> for FusionSource {
    fn enable(&self, _query: &EstimateQuery) -> bool {
        // No parts means an empty estimate, not an error.
        !self.parts.is_empty()
    }

    async fn get_candidates(&self, query: &EstimateQuery) -> EstimateResult<Vec<DamageCandidate>> {
        let fused = fuse(&self.parts, &self.damages, query.iou_threshold);
        Ok(fused
            .into_iter()
            .enumerate()
            .map(|(idx, detection)| {
                let mut candidate =
                    DamageCandidate::from_detection(format!("det-{idx}"), detection);
                if let Some(&requested) = self.overrides.get(idx) {
                    candidate.severity = requested;
                }
                candidate
            })
            .collect())
    }
}
