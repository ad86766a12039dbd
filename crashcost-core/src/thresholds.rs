//! Centralized tuning constants for detection fusion and pricing.
//!
//! Changing a value here affects BOTH the fusion/severity stages (in
//! `fusion.rs` / `severity.rs`) and the pipeline components that consume
//! them (`crashcost-pipeline`).

/// Minimum IoU between a damage region and a part detection to consider a
/// match. Damage regions are usually small relative to the part they sit
/// on, so this is deliberately low.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.1;

/// Car-type segment assumed when a request does not name one. The rule
/// table also uses this segment as its lookup fallback tier.
pub const DEFAULT_CAR_TYPE: &str = "Super";

/// Hourly labor rate assumed when a request supplies none (or a garbage
/// value).
pub const DEFAULT_LABOR_RATE: f64 = 150.0;

/// Confidence at or above which a crack is scored severe.
pub const CRACK_SEVERE_CONF: f64 = 0.8;
/// Confidence at or above which a crack is scored moderate.
pub const CRACK_MODERATE_CONF: f64 = 0.5;

/// Confidence at or above which a dent is scored severe.
pub const DENT_SEVERE_CONF: f64 = 0.85;
/// Confidence at or above which a dent is scored moderate.
pub const DENT_MODERATE_CONF: f64 = 0.5;

/// Confidence at or above which scrape-family damage is scored moderate.
pub const SCRAPE_MODERATE_CONF: f64 = 0.7;

/// Labor hours charged when no pricing rule covers a combination.
pub const FALLBACK_LABOR_HOURS: f64 = 3.0;
/// New-part cost charged when no pricing rule covers a combination.
pub const FALLBACK_NEW_PART_COST: f64 = 1500.0;
/// Used-part cost charged when no pricing rule covers a combination.
pub const FALLBACK_USED_PART_COST: f64 = 750.0;

/// Multiplier applied to the likely total to produce the max estimate.
pub const ESTIMATE_BUFFER: f64 = 1.2;
