//! Form 8880: Credit for Qualified Retirement Savings Contributions.

use crate::model::ReturnModel;
use crate::money::{Money, Rounding};
use crate::rules::Rules2025;
use crate::trace::{NodeRef, Trace};
use crate::types::Owner;
use serde::{Deserialize, Serialize};

/// Computed Form 8880 (non-refundable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form8880Result {
    pub credit: NodeRef,
}

/// Contribution base per person: elective deferrals (W-2 box 12) plus
/// IRA contributions, capped at $2,000 each; the AGI table sets the rate.
pub fn compute(
    model: &ReturnModel,
    rules: &Rules2025,
    agi: &NodeRef,
    trace: &mut Trace,
) -> Option<Form8880Result> {
    let rate_bps = rules.savers_credit_bps(model.filing_status, agi.amount);
    if rate_bps == 0 {
        return None;
    }
    // Dependents of other filers cannot take the credit.
    if model.taxpayer.can_be_claimed_as_dependent {
        return None;
    }

    let ira = model.ira_contributions.clone().unwrap_or_default();
    let cap = rules.savers_contribution_cap();

    let taxpayer_deferrals: Money = model
        .wage_statements
        .iter()
        .filter(|w| w.owner == Owner::Taxpayer)
        .map(|w| w.retirement_deferrals())
        .sum();
    let spouse_deferrals: Money = model
        .wage_statements
        .iter()
        .filter(|w| w.owner == Owner::Spouse)
        .map(|w| w.retirement_deferrals())
        .sum();

    let taxpayer_base = (taxpayer_deferrals + ira.traditional + ira.roth).min(cap);
    let spouse_base = if model.spouse.is_some() {
        (spouse_deferrals + ira.spouse_traditional + ira.spouse_roth).min(cap)
    } else {
        Money::ZERO
    };

    let base = taxpayer_base + spouse_base;
    if base.is_zero() {
        return None;
    }

    let credit = trace.worksheet(
        "form8880.credit",
        base.pct(rate_bps, Rounding::HalfEven),
        format!("saver's credit at {}%", rate_bps / 100),
        &[agi],
    );
    Some(Form8880Result { credit })
}
