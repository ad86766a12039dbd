//! Line-item construction and totals aggregation.
//!
//! Costs are computed from the rule table's pricing facts:
//!   labor_cost = labor_hours x labor_rate
//!   total_new  = labor_cost + new_part_cost
//!   total_used = labor_cost + used_part_cost
//!
//! Totals: min = sum of used totals; likely = new or used sum depending
//! on the OEM preference; max = likely x buffer. Zero line items is a
//! normal outcome and yields zero totals.

use crashcost_core::fusion::FusedDetection;
use crashcost_core::labels::{map_damage_type, map_part};
use crashcost_core::severity::Severity;
use crashcost_core::thresholds::ESTIMATE_BUFFER;

use crate::rules::{PricingFact, RuleTable};
use crate::types::{EstimateReport, LineItem, Totals};

/// Build one line item from a resolved pricing fact.
pub fn build_line_item(
    part: &str,
    damage_type: &str,
    severity: Severity,
    fact: &PricingFact,
    labor_rate: f64,
) -> LineItem {
    let labor_cost = fact.labor_hours * labor_rate;
    LineItem {
        part: part.to_string(),
        damage_type: damage_type.to_string(),
        severity,
        labor_hours: fact.labor_hours,
        labor_cost,
        part_cost_new: fact.new_part_cost,
        part_cost_used: fact.used_part_cost,
        total_new: labor_cost + fact.new_part_cost,
        total_used: labor_cost + fact.used_part_cost,
    }
}

/// Aggregate totals over line items.
pub fn compute_totals(items: &[LineItem], use_oem_parts: bool) -> Totals {
    if items.is_empty() {
        return Totals::zero();
    }
    let total_new: f64 = items.iter().map(|i| i.total_new).sum();
    let total_used: f64 = items.iter().map(|i| i.total_used).sum();
    let likely = if use_oem_parts { total_new } else { total_used };
    Totals {
        min: total_used,
        likely,
        max: likely * ESTIMATE_BUFFER,
    }
}

/// Price one damaged detection against the rule table.
///
/// Returns `None` only for intact detections. A detection with no
/// severity prices as minor; a combination with no rule prices via the
/// table's fallback fact. Either way the caller gets a usable line item.
pub fn price_detection(
    detection: &FusedDetection,
    table: &RuleTable,
    labor_rate: f64,
    car_type: &str,
) -> Option<LineItem> {
    let damage = map_damage_type(&detection.damage_type)?;
    let part = map_part(&detection.part);
    let severity = detection.severity.unwrap_or(Severity::Minor);
    let fact = table.lookup(car_type, part, damage, severity.as_str());
    Some(build_line_item(part, damage, severity, &fact, labor_rate))
}

/// Price a full set of severity-scored detections.
///
/// Intact detections are skipped; everything else produces exactly one
/// line item. This is the direct, pipeline-free entry point for callers
/// that already hold fused detections.
pub fn price(
    detections: &[FusedDetection],
    table: &RuleTable,
    labor_rate: f64,
    use_oem_parts: bool,
    car_type: &str,
) -> EstimateReport {
    let line_items: Vec<LineItem> = detections
        .iter()
        .filter_map(|d| price_detection(d, table, labor_rate, car_type))
        .collect();
    let totals = compute_totals(&line_items, use_oem_parts);
    let filtered_count = detections.len() - line_items.len();
    EstimateReport {
        line_items,
        totals,
        filtered_count,
    }
}
