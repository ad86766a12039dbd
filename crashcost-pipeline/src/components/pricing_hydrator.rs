use async_trait::async_trait;
use std::sync::Arc;

use crashcost_core::labels::{map_damage_type, map_part};
use crashcost_core::severity::Severity;

use crate::error::EstimateResult;
use crate::hydrator::Hydrator;
use crate::pricing::build_line_item;
use crate::rules::RuleTable;
use crate::types::{DamageCandidate, EstimateQuery};

/// Attaches a priced line item to every damaged candidate.
///
/// Runs post-selection so only surviving candidates hit the rule table.
/// Intact candidates (alive under `include_intact`) get no line item and
/// contribute nothing to the totals. Lookup misses resolve through the
/// table's fallback chain, so every damaged candidate prices.
pub struct PricingHydrator {
    table: Arc<RuleTable>,
}

impl PricingHydrator {
    pub fn new(table: Arc<RuleTable>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl Hydrator<EstimateQuery, DamageCandidate> for PricingHydrator {
    async fn hydrate(
        &self,
        query: &EstimateQuery,
        candidates: &[DamageCandidate],
    ) -> EstimateResult<Vec<DamageCandidate>> {
        let hydrated = candidates
            .iter()
            .map(|c| {
                let line = map_damage_type(&c.damage_type).map(|damage| {
                    let part = map_part(&c.part);
                    let severity = c.severity.unwrap_or(Severity::Minor);
                    let fact =
                        self.table
                            .lookup(&query.car_type, part, damage, severity.as_str());
                    build_line_item(part, damage, severity, &fact, query.labor_rate)
                });
                DamageCandidate {
                    line,
                    ..DamageCandidate::default()
                }
            })
            .collect();
        Ok(hydrated)
    }

    fn update(&self, candidate: &mut DamageCandidate, hydrated: DamageCandidate) {
        candidate.line = hydrated.line;
    }
}
