//! Form 6251: Alternative Minimum Tax — Individuals.

use crate::money::{Money, Rounding};
use crate::rules::Rules2025;
use crate::trace::{NodeRef, Trace};
use crate::types::FilingStatus;
use serde::{Deserialize, Serialize};

/// Computed Form 6251.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form6251Result {
    /// Line 4: alternative minimum taxable income.
    pub amti: NodeRef,
    /// Line 5: exemption after phase-out.
    pub exemption: NodeRef,
    /// Line 7: tentative minimum tax.
    pub tentative_minimum_tax: NodeRef,
    /// Line 11: AMT owed on top of the regular tax.
    pub amt: NodeRef,
}

/// Computes AMT. `deduction_add_back` is the amount removed from taxable
/// income that AMT disallows: the standard deduction when taken, or the
/// SALT deduction (Schedule A line 7) when itemizing.
pub fn compute(
    rules: &Rules2025,
    status: FilingStatus,
    taxable_income: &NodeRef,
    deduction_add_back: &NodeRef,
    regular_tax: &NodeRef,
    trace: &mut Trace,
) -> Form6251Result {
    let amti = trace.sum("form6251.amti", &[taxable_income, deduction_add_back]);

    // Exemption phases out at 25 cents per dollar of AMTI above the start.
    let full_exemption = rules.amt_exemption(status);
    let phase_out_start = rules.amt_exemption_phase_out_start(status);
    let reduction = amti
        .amount
        .saturating_sub(phase_out_start)
        .pct(Rules2025::AMT_PHASE_OUT_BPS, Rounding::HalfEven);
    let exemption = trace.worksheet(
        "form6251.exemption",
        full_exemption.saturating_sub(reduction),
        "AMT exemption after phase-out",
        &[&amti],
    );

    let base = amti.amount.saturating_sub(exemption.amount);
    let rate_break = rules.amt_rate_break(status);
    let tmt_amount = if base <= rate_break {
        base.pct(2_600, Rounding::HalfEven)
    } else {
        rate_break.pct(2_600, Rounding::HalfEven)
            + (base - rate_break).pct(2_800, Rounding::HalfEven)
    };
    let tentative_minimum_tax = trace.worksheet(
        "form6251.tentativeMinimumTax",
        tmt_amount,
        "26%/28% tentative minimum tax",
        &[&amti, &exemption],
    );

    let excess = trace.sub("form6251.excess", &tentative_minimum_tax, regular_tax);
    let amt = trace.clamp_zero("form6251.amt", &excess);

    Form6251Result {
        amti,
        exemption,
        tentative_minimum_tax,
        amt,
    }
}
