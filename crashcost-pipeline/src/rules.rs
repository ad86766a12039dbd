//! CSV-backed pricing rule table.
//!
//! Parses the repair-cost CSV into a `RuleTable` keyed by
//! (car_type, part, damage_type, severity), all trimmed + lowercased.
//! Expected CSV columns:
//!   Car_Type, Part, Damage_Type, Severity, New_Part_Cost,
//!   Used_Part_Cost, Labor_Hours
//!
//! Lookup never fails: exact key, then the default car-type tier, then a
//! synthetic fallback fact with a warning. Loading can fail (missing or
//! malformed file) and that failure is fatal to pricing; `shared()`
//! caches the first load outcome for the process lifetime so the failure
//! surfaces once and is never retried against the disk.

use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;

use crashcost_core::thresholds::{
    FALLBACK_LABOR_HOURS, FALLBACK_NEW_PART_COST, FALLBACK_USED_PART_COST,
};

use crate::error::{EstimateError, EstimateResult};

/// Car-type tier consulted when the requested tier has no rule.
const DEFAULT_CAR_TYPE_KEY: &str = "super";

/// One row of the rule table CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleRecord {
    #[serde(rename = "Car_Type", default)]
    pub car_type: String,
    #[serde(rename = "Part")]
    pub part: String,
    #[serde(rename = "Damage_Type")]
    pub damage_type: String,
    #[serde(rename = "Severity")]
    pub severity: String,
    #[serde(rename = "New_Part_Cost")]
    pub new_part_cost: f64,
    #[serde(rename = "Used_Part_Cost")]
    pub used_part_cost: f64,
    #[serde(rename = "Labor_Hours")]
    pub labor_hours: f64,
}

/// The pricing facts attached to one rule key.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingFact {
    pub labor_hours: f64,
    pub new_part_cost: f64,
    pub used_part_cost: f64,
}

impl PricingFact {
    /// Synthetic fact used when no rule covers a combination.
    pub fn fallback() -> Self {
        Self {
            labor_hours: FALLBACK_LABOR_HOURS,
            new_part_cost: FALLBACK_NEW_PART_COST,
            used_part_cost: FALLBACK_USED_PART_COST,
        }
    }
}

type RuleKey = (String, String, String, String);

/// In-memory pricing rule index, loaded once per process.
#[derive(Debug)]
pub struct RuleTable {
    rules: HashMap<RuleKey, PricingFact>,
}

/// Trim + lowercase. Rule keys keep their internal spaces ("front bumper"),
/// unlike detector labels, so this is not `labels::canonicalize`.
fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

impl RuleTable {
    /// Parse rules from a CSV reader.
    pub fn from_reader<R: Read>(reader: R) -> EstimateResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rules = HashMap::new();
        for (line_num, result) in csv_reader.deserialize().enumerate() {
            let record: RuleRecord = result.map_err(|source| EstimateError::RuleTableParse {
                // +2: one for the header row, one for 1-based numbering
                line: line_num + 2,
                source,
            })?;
            let car_type = if record.car_type.trim().is_empty() {
                DEFAULT_CAR_TYPE_KEY.to_string()
            } else {
                normalize(&record.car_type)
            };
            let key = (
                car_type,
                normalize(&record.part),
                normalize(&record.damage_type),
                normalize(&record.severity),
            );
            rules.insert(
                key,
                PricingFact {
                    labor_hours: record.labor_hours,
                    new_part_cost: record.new_part_cost,
                    used_part_cost: record.used_part_cost,
                },
            );
        }

        Ok(Self { rules })
    }

    /// Load rules from a CSV file path.
    pub fn load(path: &str) -> EstimateResult<Self> {
        let file = std::fs::File::open(path).map_err(|source| EstimateError::RuleTableIo {
            path: path.to_string(),
            source,
        })?;
        let table = Self::from_reader(file)?;
        log::info!("loaded {} pricing rules from {}", table.len(), path);
        Ok(table)
    }

    /// The process-lifetime shared table.
    ///
    /// The first call loads the CSV; every later call, from any thread,
    /// gets the cached outcome. Concurrent first access is serialized by
    /// the `OnceLock`, so the table is built exactly once, and a failed
    /// load is replayed as `RuleTableUnavailable` without touching the
    /// disk again.
    pub fn shared(path: &str) -> EstimateResult<Arc<RuleTable>> {
        static SHARED: OnceLock<Result<Arc<RuleTable>, String>> = OnceLock::new();
        SHARED
            .get_or_init(|| RuleTable::load(path).map(Arc::new).map_err(|e| e.to_string()))
            .clone()
            .map_err(EstimateError::RuleTableUnavailable)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve the pricing fact for a combination.
    ///
    /// Policy, in order: exact key; same rule under the default car type;
    /// synthetic fallback with a warning. Never fails.
    pub fn lookup(
        &self,
        car_type: &str,
        part: &str,
        damage_type: &str,
        severity: &str,
    ) -> PricingFact {
        let car_key = {
            let normalized = normalize(car_type);
            if normalized.is_empty() {
                DEFAULT_CAR_TYPE_KEY.to_string()
            } else {
                normalized
            }
        };
        let part_key = normalize(part);
        let damage_key = normalize(damage_type);
        let severity_key = normalize(severity);

        let exact = (
            car_key.clone(),
            part_key.clone(),
            damage_key.clone(),
            severity_key.clone(),
        );
        if let Some(fact) = self.rules.get(&exact) {
            return fact.clone();
        }

        let default_tier = (
            DEFAULT_CAR_TYPE_KEY.to_string(),
            part_key.clone(),
            damage_key.clone(),
            severity_key.clone(),
        );
        if let Some(fact) = self.rules.get(&default_tier) {
            return fact.clone();
        }

        log::warn!(
            "missing pricing rule for car_type={} part={} damage={} severity={}; using fallback values",
            car_key,
            part_key,
            damage_key,
            severity_key
        );
        PricingFact::fallback()
    }
}
