//! Detection fusion: combine part detections and damage detections into
//! per-part damage assessments.
//!
//! The two detectors run independently. Fusion keys the result on parts:
//! every detected part yields exactly one `FusedDetection`, starting as
//! "intact" and picking up a damage label when a damage region overlaps
//! it. Matching is greedy highest-confidence-wins, not an optimal
//! bipartite assignment; damage detections are processed in delivery
//! order so ties break reproducibly.

use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;
use crate::labels::canonicalize;
use crate::severity::Severity;

/// Damage label reported for parts with no matched damage region.
pub const INTACT: &str = "intact";

/// A labeled, confidence-scored box from one of the detection models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub label: String,
    pub confidence: f64,
    pub bbox: BoundingBox,
}

/// One per-part damage assessment.
///
/// `damage_type` is the canonical damage label, or [`INTACT`] when no
/// damage region matched. `severity` stays unset until scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedDetection {
    pub part: String,
    pub damage_type: String,
    pub confidence: f64,
    pub bbox: BoundingBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl FusedDetection {
    pub fn is_intact(&self) -> bool {
        self.damage_type == INTACT
    }
}

/// Best damage claim on a part so far: canonical label and the damage
/// detection's own confidence.
struct Claim {
    damage_type: String,
    confidence: f64,
}

/// Fuse part detections with damage detections.
///
/// Every part starts intact at its own confidence. Each damage detection
/// (skipping ones labeled intact) matches the part with maximum IoU; the
/// match claims the part when IoU >= `iou_threshold` and either the part
/// is still intact or the damage confidence strictly exceeds the
/// incumbent claim's. Damage detections that match no part are dropped.
///
/// The reported confidence for a damaged part is min(part, damage): the
/// conclusion is only as strong as the weaker of the two detections.
pub fn fuse(
    parts: &[RawDetection],
    damages: &[RawDetection],
    iou_threshold: f64,
) -> Vec<FusedDetection> {
    if parts.is_empty() {
        log::info!(
            "no part detections; dropping {} damage detection(s)",
            damages.len()
        );
        return Vec::new();
    }

    let mut claims: Vec<Option<Claim>> = (0..parts.len()).map(|_| None).collect();

    for damage in damages {
        let damage_type = canonicalize(&damage.label);
        if damage_type == INTACT {
            continue;
        }

        let mut best_idx = None;
        let mut best_iou = 0.0;
        for (idx, part) in parts.iter().enumerate() {
            let iou = damage.bbox.iou(&part.bbox);
            if iou > best_iou {
                best_iou = iou;
                best_idx = Some(idx);
            }
        }

        let Some(idx) = best_idx.filter(|_| best_iou >= iou_threshold) else {
            log::debug!(
                "damage '{}' (conf {:.2}) matched no part above IoU {:.2}; dropped",
                damage.label,
                damage.confidence,
                iou_threshold
            );
            continue;
        };

        let incumbent = &claims[idx];
        if incumbent
            .as_ref()
            .map_or(true, |c| damage.confidence > c.confidence)
        {
            claims[idx] = Some(Claim {
                damage_type: damage_type.clone(),
                confidence: damage.confidence,
            });
        }
    }

    parts
        .iter()
        .zip(claims)
        .map(|(part, claim)| {
            let part_label = canonicalize(&part.label);
            match claim {
                Some(claim) => FusedDetection {
                    part: part_label,
                    damage_type: claim.damage_type,
                    confidence: part.confidence.min(claim.confidence),
                    bbox: part.bbox,
                    severity: None,
                },
                None => FusedDetection {
                    part: part_label,
                    damage_type: INTACT.to_string(),
                    confidence: part.confidence,
                    bbox: part.bbox,
                    severity: None,
                },
            }
        })
        .collect()
}
