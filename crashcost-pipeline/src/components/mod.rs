pub mod car_type_query_hydrator;
pub mod estimate_audit_side_effect;
pub mod fusion_source;
pub mod intact_filter;
pub mod pricing_hydrator;
pub mod priority_rank_selector;
pub mod severity_hydrator;
pub mod severity_priority_scorer;
