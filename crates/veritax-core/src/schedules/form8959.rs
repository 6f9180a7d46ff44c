//! Form 8959: Additional Medicare Tax.

use crate::money::{Money, Rounding};
use crate::rules::Rules2025;
use crate::trace::{NodeRef, Trace};
use crate::types::FilingStatus;
use serde::{Deserialize, Serialize};

/// Computed Form 8959.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form8959Result {
    /// Medicare wages plus self-employment earnings.
    pub medicare_income: NodeRef,
    /// The 0.9% additional tax.
    pub additional_tax: NodeRef,
}

pub fn compute(
    rules: &Rules2025,
    status: FilingStatus,
    medicare_wages: Money,
    se_medicare_earnings: Money,
    trace: &mut Trace,
) -> Form8959Result {
    let wages = trace.input("form8959.medicareWages", medicare_wages, "W-2 box 5 totals");
    let se = trace.input(
        "form8959.seEarnings",
        se_medicare_earnings.clamp_zero(),
        "Schedule SE net earnings",
    );
    let medicare_income = trace.sum("form8959.medicareIncome", &[&wages, &se]);

    let threshold = rules.additional_medicare_threshold(status);
    let threshold_node = trace.literal(
        "form8959.threshold",
        threshold,
        "Additional Medicare Tax threshold",
    );
    let over = trace.sub("form8959.overThreshold", &medicare_income, &threshold_node);
    let base = trace.clamp_zero("form8959.base", &over);
    let additional_tax = trace.pct(
        "form8959.additionalTax",
        &base,
        Rules2025::ADDITIONAL_MEDICARE_BPS,
        Rounding::HalfEven,
    );

    Form8959Result {
        medicare_income,
        additional_tax,
    }
}
