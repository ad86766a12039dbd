use async_trait::async_trait;

use crashcost_core::thresholds::{DEFAULT_CAR_TYPE, DEFAULT_LABOR_RATE};

use crate::error::EstimateResult;
use crate::query_hydrator::QueryHydrator;
use crate::types::EstimateQuery;

/// Fills in a default car type and sanitizes the labor rate before any
/// candidate work happens. Downstream stages can then assume both fields
/// are usable.
pub struct CarTypeQueryHydrator;

#[async_trait]
impl QueryHydrator<EstimateQuery> for CarTypeQueryHydrator {
    async fn hydrate(&self, query: &EstimateQuery) -> EstimateResult<EstimateQuery> {
        let mut hydrated = query.clone();
        if hydrated.car_type.trim().is_empty() {
            hydrated.car_type = DEFAULT_CAR_TYPE.to_string();
        }
        if !hydrated.labor_rate.is_finite() || hydrated.labor_rate < 0.0 {
            log::warn!(
                "request_id={} unusable labor rate {}; defaulting to {}",
                query.request_id,
                query.labor_rate,
                DEFAULT_LABOR_RATE
            );
            hydrated.labor_rate = DEFAULT_LABOR_RATE;
        }
        Ok(hydrated)
    }

    fn update(&self, query: &mut EstimateQuery, hydrated: EstimateQuery) {
        query.car_type = hydrated.car_type;
        query.labor_rate = hydrated.labor_rate;
    }
}
