//! Per-state return configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Residency for one state return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidencyType {
    FullYear,
    PartYear,
    Nonresident,
}

/// Configuration for one elected state return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateReturnConfig {
    /// Two-letter state code ("CA", "NY", ...).
    pub state_code: String,
    pub residency_type: ResidencyType,
    /// First day of residency, for part-year returns.
    #[serde(default)]
    pub move_in_date: Option<NaiveDate>,
    /// Last day of residency, for part-year returns.
    #[serde(default)]
    pub move_out_date: Option<NaiveDate>,
    /// Opaque state-specific facts (rent paid, county code, ...). Each
    /// state module documents the keys it reads; unknown keys are ignored.
    #[serde(default)]
    pub state_specific: BTreeMap<String, String>,
}

impl StateReturnConfig {
    /// Full-year resident return for a state, no extras.
    pub fn full_year(state_code: &str) -> Self {
        Self {
            state_code: state_code.to_string(),
            residency_type: ResidencyType::FullYear,
            move_in_date: None,
            move_out_date: None,
            state_specific: BTreeMap::new(),
        }
    }

    /// Reads a state-specific decimal-dollar amount, when present.
    pub fn state_specific_amount(&self, key: &str) -> Option<crate::money::Money> {
        let raw = self.state_specific.get(key)?;
        let dollars: i64 = raw.parse().ok()?;
        Some(crate::money::Money::from_dollars(dollars))
    }

    /// Reads a state-specific boolean flag ("true"/"1").
    pub fn state_specific_flag(&self, key: &str) -> bool {
        matches!(
            self.state_specific.get(key).map(String::as_str),
            Some("true") | Some("1")
        )
    }
}
