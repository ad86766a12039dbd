//! The generic candidate pipeline runner.
//!
//! A pipeline is a fixed sequence of pluggable stages:
//!
//! 1. Query hydrators fill defaults on the query
//! 2. Sources produce candidates
//! 3. Hydrators enrich candidates
//! 4. Filters partition candidates (removals are counted)
//! 5. Scorers assign priority scores
//! 6. The selector orders (and optionally truncates) candidates
//! 7. Post-selection hydrators enrich only the survivors
//! 8. Post-selection filters make the final cut
//! 9. Side effects observe the result; their failures never fail the run
//!
//! Stages are skipped when their `enable` returns false for the query.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::EstimateResult;
use crate::filter::{Filter, FilterResult};
use crate::hydrator::Hydrator;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::{SideEffect, SideEffectInput};
use crate::source::Source;

/// Queries carry a request id for log correlation.
pub trait HasRequestId {
    fn request_id(&self) -> &str;
}

/// What a pipeline run produced: the selected candidates plus how many
/// were removed by filters along the way.
#[derive(Clone, Debug)]
pub struct PipelineOutcome<C> {
    pub selected: Vec<C>,
    pub filtered_count: usize,
}

#[async_trait]
pub trait CandidatePipeline<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + HasRequestId + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<Q>>];
    fn sources(&self) -> &[Box<dyn Source<Q, C>>];
    fn hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];
    fn filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn scorers(&self) -> &[Box<dyn Scorer<Q, C>>];
    fn selector(&self) -> &dyn Selector<Q, C>;
    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];
    fn post_selection_filters(&self) -> &[Box<dyn Filter<Q, C>>];
    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<Q, C>>>>;

    /// Run the full pipeline for one query.
    async fn run(&self, query: Q) -> EstimateResult<PipelineOutcome<C>> {
        let mut query = query;
        for qh in self.query_hydrators() {
            if qh.enable(&query) {
                let hydrated = qh.hydrate(&query).await?;
                qh.update(&mut query, hydrated);
            }
        }

        let mut candidates: Vec<C> = Vec::new();
        for source in self.sources() {
            if source.enable(&query) {
                candidates.extend(source.get_candidates(&query).await?);
            }
        }
        log::debug!(
            "request_id={} sourced {} candidate(s)",
            query.request_id(),
            candidates.len()
        );

        apply_hydrators(self.hydrators(), &query, &mut candidates).await?;

        let mut filtered_count = 0;
        candidates =
            apply_filters(self.filters(), &query, candidates, &mut filtered_count).await?;

        for scorer in self.scorers() {
            if scorer.enable(&query) {
                let scored = scorer.score(&query, &candidates).await?;
                for (candidate, s) in candidates.iter_mut().zip(scored) {
                    scorer.update(candidate, s);
                }
            }
        }

        let mut selected = if self.selector().enable(&query) {
            self.selector().select(&query, candidates)
        } else {
            candidates
        };

        apply_hydrators(self.post_selection_hydrators(), &query, &mut selected).await?;
        selected = apply_filters(
            self.post_selection_filters(),
            &query,
            selected,
            &mut filtered_count,
        )
        .await?;

        let input = Arc::new(SideEffectInput {
            query: Arc::new(query.clone()),
            selected_candidates: selected.clone(),
        });
        for effect in self.side_effects().iter() {
            if effect.enable(Arc::clone(&input.query)) {
                if let Err(e) = effect.run(Arc::clone(&input)).await {
                    log::warn!(
                        "request_id={} side effect {} failed: {}",
                        query.request_id(),
                        effect.name(),
                        e
                    );
                }
            }
        }

        Ok(PipelineOutcome {
            selected,
            filtered_count,
        })
    }
}

async fn apply_hydrators<Q, C>(
    hydrators: &[Box<dyn Hydrator<Q, C>>],
    query: &Q,
    candidates: &mut [C],
) -> EstimateResult<()>
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    for hydrator in hydrators {
        if hydrator.enable(query) {
            let hydrated = hydrator.hydrate(query, candidates).await?;
            for (candidate, h) in candidates.iter_mut().zip(hydrated) {
                hydrator.update(candidate, h);
            }
        }
    }
    Ok(())
}

async fn apply_filters<Q, C>(
    filters: &[Box<dyn Filter<Q, C>>],
    query: &Q,
    mut candidates: Vec<C>,
    filtered_count: &mut usize,
) -> EstimateResult<Vec<C>>
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    for filter in filters {
        if filter.enable(query) {
            let FilterResult { kept, removed } = filter.filter(query, candidates).await?;
            *filtered_count += removed.len();
            candidates = kept;
        }
    }
    Ok(candidates)
}
