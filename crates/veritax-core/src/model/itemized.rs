//! Itemized-deduction worksheet (Schedule A inputs).

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One mortgage on the itemized worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageEntry {
    /// Lender name from the Form 1098.
    #[serde(default)]
    pub lender: String,
    /// Interest paid (1098 box 1).
    pub interest_paid: Money,
    /// Average outstanding principal; absent when unknown, in which case
    /// the interest passes through unlimited.
    #[serde(default)]
    pub average_principal: Option<Money>,
}

/// The itemized-deduction worksheet attached when the model elects
/// the itemized method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemizedWorksheet {
    /// Unreimbursed medical and dental expenses, before the AGI floor.
    pub medical_expenses: Money,

    /// State and local income taxes paid (5a), beyond W-2 withholding.
    pub state_local_income_taxes: Money,
    /// State and local real estate taxes (5b).
    pub real_estate_taxes: Money,
    /// State and local personal property taxes (5c).
    pub personal_property_taxes: Money,
    /// Other deductible taxes (5d / line 6).
    pub other_taxes: Money,

    /// Home mortgages.
    pub mortgages: Vec<MortgageEntry>,
    /// Investment interest paid (Form 4952 input).
    pub investment_interest: Money,
    /// Investment-interest carryforward from the prior year
    /// (Form 4952 line 2).
    pub investment_interest_carryforward: Money,

    /// Charitable contributions by cash or check.
    pub charitable_cash: Money,
    /// Charitable contributions other than cash.
    pub charitable_noncash: Money,

    /// Casualty and theft losses from federally declared disasters.
    pub casualty_losses: Money,
    /// Other itemized deductions (line 16).
    pub other_deductions: Money,
}
