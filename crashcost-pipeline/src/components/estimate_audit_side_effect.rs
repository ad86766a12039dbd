use async_trait::async_trait;
use std::sync::Arc;

use crate::error::EstimateResult;
use crate::side_effect::{SideEffect, SideEffectInput};
use crate::types::{DamageCandidate, EstimateQuery};

/// Logs a one-line audit summary for the finished estimate. Purely
/// observational; nothing downstream depends on it.
pub struct EstimateAuditSideEffect;

#[async_trait]
impl SideEffect<EstimateQuery, DamageCandidate> for EstimateAuditSideEffect {
    async fn run(
        &self,
        input: Arc<SideEffectInput<EstimateQuery, DamageCandidate>>,
    ) -> EstimateResult<()> {
        let priced = input
            .selected_candidates
            .iter()
            .filter(|c| c.line.is_some())
            .count();
        let likely: f64 = input
            .selected_candidates
            .iter()
            .filter_map(|c| c.line.as_ref())
            .map(|l| {
                if input.query.use_oem_parts {
                    l.total_new
                } else {
                    l.total_used
                }
            })
            .sum();
        log::info!(
            "request_id={} estimated {} part(s), {} priced, likely total {:.2}",
            input.query.request_id,
            input.selected_candidates.len(),
            priced,
            likely
        );
        Ok(())
    }
}
