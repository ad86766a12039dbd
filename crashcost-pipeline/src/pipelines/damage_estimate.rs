use async_trait::async_trait;
use std::sync::Arc;

use crashcost_core::fusion::RawDetection;
use crashcost_core::severity::Severity;

use crate::candidate_pipeline::CandidatePipeline;
use crate::components::car_type_query_hydrator::CarTypeQueryHydrator;
use crate::components::estimate_audit_side_effect::EstimateAuditSideEffect;
use crate::components::fusion_source::FusionSource;
use crate::components::intact_filter::IntactFilter;
use crate::components::pricing_hydrator::PricingHydrator;
use crate::components::priority_rank_selector::PriorityRankSelector;
use crate::components::severity_hydrator::SeverityHydrator;
use crate::components::severity_priority_scorer::SeverityPriorityScorer;
use crate::error::EstimateResult;
use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::pricing::compute_totals;
use crate::query_hydrator::QueryHydrator;
use crate::rules::RuleTable;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::SideEffect;
use crate::source::Source;
use crate::types::{DamageCandidate, EstimateQuery, EstimateReport};

/// The repair-estimate pipeline.
///
/// Pipeline flow:
/// 1. CarTypeQueryHydrator fills in the default car type and labor rate
/// 2. FusionSource fuses part and damage detections into candidates
/// 3. SeverityHydrator scores severity (caller overrides win)
/// 4. IntactFilter removes undamaged parts (unless include_intact)
/// 5. SeverityPriorityScorer assigns priority scores
/// 6. PriorityRankSelector orders candidates, highest priority first
/// 7. PricingHydrator attaches rule-table line items post-selection
/// 8. EstimateAuditSideEffect logs the outcome
pub struct DamageEstimatePipeline {
    query_hydrators: Vec<Box<dyn QueryHydrator<EstimateQuery>>>,
    sources: Vec<Box<dyn Source<EstimateQuery, DamageCandidate>>>,
    hydrators: Vec<Box<dyn Hydrator<EstimateQuery, DamageCandidate>>>,
    filters: Vec<Box<dyn Filter<EstimateQuery, DamageCandidate>>>,
    scorers: Vec<Box<dyn Scorer<EstimateQuery, DamageCandidate>>>,
    selector: PriorityRankSelector,
    post_selection_hydrators: Vec<Box<dyn Hydrator<EstimateQuery, DamageCandidate>>>,
    post_selection_filters: Vec<Box<dyn Filter<EstimateQuery, DamageCandidate>>>,
    side_effects: Arc<Vec<Box<dyn SideEffect<EstimateQuery, DamageCandidate>>>>,
}

impl DamageEstimatePipeline {
    /// Create a pipeline for one request's detections, pricing against
    /// the given rule table.
    pub fn new(
        parts: Vec<RawDetection>,
        damages: Vec<RawDetection>,
        table: Arc<RuleTable>,
    ) -> Self {
        Self::with_overrides(parts, damages, Vec::new(), table)
    }

    /// Same, with caller severity overrides parallel to `parts`.
    pub fn with_overrides(
        parts: Vec<RawDetection>,
        damages: Vec<RawDetection>,
        overrides: Vec<Option<Severity>>,
        table: Arc<RuleTable>,
    ) -> Self {
        let query_hydrators: Vec<Box<dyn QueryHydrator<EstimateQuery>>> =
            vec![Box::new(CarTypeQueryHydrator)];

        let sources: Vec<Box<dyn Source<EstimateQuery, DamageCandidate>>> =
            vec![Box::new(FusionSource::with_overrides(parts, damages, overrides))];

        let hydrators: Vec<Box<dyn Hydrator<EstimateQuery, DamageCandidate>>> =
            vec![Box::new(SeverityHydrator)];

        let filters: Vec<Box<dyn Filter<EstimateQuery, DamageCandidate>>> =
            vec![Box::new(IntactFilter)];

        let scorers: Vec<Box<dyn Scorer<EstimateQuery, DamageCandidate>>> =
            vec![Box::new(SeverityPriorityScorer::default())];

        let post_selection_hydrators: Vec<Box<dyn Hydrator<EstimateQuery, DamageCandidate>>> =
            vec![Box::new(PricingHydrator::new(table))];

        let side_effects: Arc<Vec<Box<dyn SideEffect<EstimateQuery, DamageCandidate>>>> =
            Arc::new(vec![Box::new(EstimateAuditSideEffect)]);

        Self {
            query_hydrators,
            sources,
            hydrators,
            filters,
            scorers,
            selector: PriorityRankSelector,
            post_selection_hydrators,
            post_selection_filters: Vec::new(),
            side_effects,
        }
    }

    /// Run the pipeline and fold the outcome into the output boundary
    /// record: ordered line items plus aggregated totals.
    pub async fn estimate(&self, query: EstimateQuery) -> EstimateResult<EstimateReport> {
        let use_oem_parts = query.use_oem_parts;
        let outcome = self.run(query).await?;
        let line_items: Vec<_> = outcome
            .selected
            .iter()
            .filter_map(|c| c.line.clone())
            .collect();
        let totals = compute_totals(&line_items, use_oem_parts);
        Ok(EstimateReport {
            line_items,
            totals,
            filtered_count: outcome.filtered_count,
        })
    }
}

#[async_trait]
impl CandidatePipeline<EstimateQuery, DamageCandidate> for DamageEstimatePipeline {
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<EstimateQuery>>] {
        &self.query_hydrators
    }

    fn sources(&self) -> &[Box<dyn Source<EstimateQuery, DamageCandidate>>] {
        &self.sources
    }

    fn hydrators(&self) -> &[Box<dyn Hydrator<EstimateQuery, DamageCandidate>>] {
        &self.hydrators
    }

    fn filters(&self) -> &[Box<dyn Filter<EstimateQuery, DamageCandidate>>] {
        &self.filters
    }

    fn scorers(&self) -> &[Box<dyn Scorer<EstimateQuery, DamageCandidate>>] {
        &self.scorers
    }

    fn selector(&self) -> &dyn Selector<EstimateQuery, DamageCandidate> {
        &self.selector
    }

    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<EstimateQuery, DamageCandidate>>] {
        &self.post_selection_hydrators
    }

    fn post_selection_filters(&self) -> &[Box<dyn Filter<EstimateQuery, DamageCandidate>>] {
        &self.post_selection_filters
    }

    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<EstimateQuery, DamageCandidate>>>> {
        Arc::clone(&self.side_effects)
    }
}
