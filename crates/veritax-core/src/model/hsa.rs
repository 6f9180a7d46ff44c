//! Health savings account data (Form 8889 inputs).

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// HDHP coverage tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HsaCoverage {
    SelfOnly,
    Family,
}

/// The taxpayer's HSA facts for the year.
///
/// Presence of this structure is what triggers Form 8889; an account with
/// zero activity still files the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsaInfo {
    pub coverage: HsaCoverage,
    /// Contributions the account holder made directly (not through the
    /// employer; those arrive as W-2 box 12 code W).
    #[serde(default)]
    pub taxpayer_contributions: Money,
    /// Unreimbursed qualified medical expenses paid from the account.
    #[serde(default)]
    pub qualified_medical_expenses: Money,
    /// Age 55 or older at year end (catch-up contribution).
    #[serde(default)]
    pub age_55_or_older: bool,
    /// Age 65+ or disabled at distribution time (waives the 20% penalty).
    #[serde(default)]
    pub age_65_or_disabled: bool,
}

/// Traditional/Roth IRA contributions made for the year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IraContributions {
    /// Traditional IRA contributions (deduction candidate).
    pub traditional: Money,
    /// Roth IRA contributions (saver's-credit base only).
    pub roth: Money,
    /// Spouse's traditional IRA contributions.
    pub spouse_traditional: Money,
    /// Spouse's Roth IRA contributions.
    pub spouse_roth: Money,
    /// Nondeductible basis already on file (Form 8606 line 2).
    pub prior_basis: Money,
    /// Year-end value of all traditional IRAs (Form 8606 line 6);
    /// the pro-rata denominator for basis recovery.
    pub year_end_value: Money,
}

impl IraContributions {
    pub fn any(&self) -> bool {
        !(self.traditional.is_zero()
            && self.roth.is_zero()
            && self.spouse_traditional.is_zero()
            && self.spouse_roth.is_zero())
    }
}
