pub mod candidate_pipeline;
pub mod components;
pub mod error;
pub mod filter;
pub mod hydrator;
pub mod pipelines;
pub mod pricing;
pub mod query_hydrator;
pub mod rules;
pub mod scorer;
pub mod selector;
pub mod side_effect;
pub mod source;
pub mod types;
pub mod util;

pub use error::EstimateError;
pub use pipelines::damage_estimate::DamageEstimatePipeline;
pub use rules::{PricingFact, RuleTable};
pub use types::{DamageCandidate, EstimateQuery, EstimateReport, LineItem, Totals};
