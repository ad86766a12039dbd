use serde::Serialize;

use crashcost_core::fusion::{FusedDetection, INTACT};
use crashcost_core::geometry::BoundingBox;
use crashcost_core::severity::Severity;
use crashcost_core::thresholds::{DEFAULT_CAR_TYPE, DEFAULT_IOU_THRESHOLD, DEFAULT_LABOR_RATE};

use crate::candidate_pipeline::HasRequestId;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Per-request estimation settings.
#[derive(Clone, Debug)]
pub struct EstimateQuery {
    pub request_id: String,
    /// Hourly labor rate used for every line item.
    pub labor_rate: f64,
    /// Price with new (OEM) parts when true, used parts otherwise.
    pub use_oem_parts: bool,
    /// Car-type segment for rule lookup; blank means "use the default".
    pub car_type: String,
    /// Keep intact parts in the pipeline output (they still never price).
    pub include_intact: bool,
    /// Minimum IoU for a damage region to claim a part.
    pub iou_threshold: f64,
}

impl EstimateQuery {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            labor_rate: DEFAULT_LABOR_RATE,
            use_oem_parts: true,
            car_type: DEFAULT_CAR_TYPE.to_string(),
            include_intact: false,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
        }
    }
}

impl HasRequestId for EstimateQuery {
    fn request_id(&self) -> &str {
        &self.request_id
    }
}

// ---------------------------------------------------------------------------
// Candidate types
// ---------------------------------------------------------------------------

/// A per-part damage assessment flowing through the pipeline.
///
/// Fusion creates one per detected part; the severity hydrator fills
/// `severity`, scorers fill `priority_score`, and the pricing hydrator
/// fills `line` for everything that is not intact.
#[derive(Clone, Debug, Serialize)]
pub struct DamageCandidate {
    pub id: String,
    /// Canonical part label from the part detector.
    pub part: String,
    /// Canonical damage label, or "intact".
    pub damage_type: String,
    pub confidence: f64,
    pub bbox: BoundingBox,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    // Scoring fields (populated by scorers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_score: Option<f64>,

    // Pricing (populated post-selection)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineItem>,
}

impl DamageCandidate {
    pub fn from_detection(id: impl Into<String>, detection: FusedDetection) -> Self {
        Self {
            id: id.into(),
            part: detection.part,
            damage_type: detection.damage_type,
            confidence: detection.confidence,
            bbox: detection.bbox,
            severity: detection.severity,
            priority_score: None,
            line: None,
        }
    }

    pub fn is_intact(&self) -> bool {
        self.damage_type == INTACT
    }
}

impl Default for DamageCandidate {
    fn default() -> Self {
        Self {
            id: String::new(),
            part: String::new(),
            damage_type: INTACT.to_string(),
            confidence: 0.0,
            bbox: BoundingBox::new(0.0, 0.0, 0.0, 0.0),
            severity: None,
            priority_score: None,
            line: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One priced repair, new-part and used-part variants side by side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LineItem {
    pub part: String,
    pub damage_type: String,
    pub severity: Severity,
    pub labor_hours: f64,
    pub labor_cost: f64,
    pub part_cost_new: f64,
    pub part_cost_used: f64,
    pub total_new: f64,
    pub total_used: f64,
}

/// Estimate totals. min/likely/max are directional labels, not hard
/// bounds: a rule table where a used part outprices the new one will
/// produce min > likely, and that is the table's problem, not ours.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Totals {
    pub min: f64,
    pub likely: f64,
    pub max: f64,
}

impl Totals {
    pub fn zero() -> Self {
        Self {
            min: 0.0,
            likely: 0.0,
            max: 0.0,
        }
    }
}

/// The output boundary record handed to the report layer.
#[derive(Clone, Debug, Serialize)]
pub struct EstimateReport {
    pub line_items: Vec<LineItem>,
    pub totals: Totals,
    /// Candidates removed by pipeline filters (intact parts, by default).
    pub filtered_count: usize,
}
