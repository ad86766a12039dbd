//! Deterministic severity scoring.
//!
//! Severity is a pure function of (damage type, confidence) unless the
//! caller supplies an explicit override, which always wins. No randomness
//! and no external state: the same detection scores the same way on every
//! run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::thresholds::{
    CRACK_MODERATE_CONF, CRACK_SEVERE_CONF, DENT_MODERATE_CONF, DENT_SEVERE_CONF,
    SCRAPE_MODERATE_CONF,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minor" => Ok(Severity::Minor),
            "moderate" => Ok(Severity::Moderate),
            "severe" => Ok(Severity::Severe),
            _ => Err(()),
        }
    }
}

/// Parse a caller-supplied severity override. Case and surrounding
/// whitespace are ignored; anything outside the closed set is rejected.
pub fn parse_override(raw: &str) -> Option<Severity> {
    raw.parse().ok()
}

/// Score severity for a damage assessment.
///
/// A valid `requested` override is returned unchanged. Otherwise a fixed
/// decision table applies:
/// - missing/broken parts are severe regardless of confidence;
/// - cracks and dents escalate with confidence;
/// - scrape-family damage (scratches, paint chips, flaking, corrosion)
///   tops out at moderate;
/// - anything unrecognized is minor.
pub fn score(damage_type: &str, confidence: f64, requested: Option<&str>) -> Severity {
    if let Some(sev) = requested.and_then(parse_override) {
        return sev;
    }
    let dt = crate::labels::canonicalize(damage_type);
    match dt.as_str() {
        t if t.contains("missing") || t.contains("broken") => Severity::Severe,
        t if t.contains("crack") => {
            if confidence >= CRACK_SEVERE_CONF {
                Severity::Severe
            } else if confidence >= CRACK_MODERATE_CONF {
                Severity::Moderate
            } else {
                Severity::Minor
            }
        }
        "dent" => {
            if confidence >= DENT_SEVERE_CONF {
                Severity::Severe
            } else if confidence >= DENT_MODERATE_CONF {
                Severity::Moderate
            } else {
                Severity::Minor
            }
        }
        "scratch" | "scrape" | "paint_chip" | "flaking" | "corrosion" => {
            if confidence >= SCRAPE_MODERATE_CONF {
                Severity::Moderate
            } else {
                Severity::Minor
            }
        }
        _ => Severity::Minor,
    }
}
