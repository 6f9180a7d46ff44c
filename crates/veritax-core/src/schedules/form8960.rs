//! Form 8960: Net Investment Income Tax.

use crate::money::{Money, Rounding};
use crate::rules::Rules2025;
use crate::trace::{NodeRef, Trace};
use crate::types::FilingStatus;
use serde::{Deserialize, Serialize};

/// Computed Form 8960.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form8960Result {
    /// Line 8: total net investment income.
    pub net_investment_income: NodeRef,
    /// Line 17: the 3.8% tax.
    pub tax: NodeRef,
}

/// Computes NIIT: 3.8% of the smaller of net investment income and the
/// AGI excess over the status threshold.
pub fn compute(
    rules: &Rules2025,
    status: FilingStatus,
    net_investment_income: Money,
    agi: &NodeRef,
    trace: &mut Trace,
) -> Form8960Result {
    let nii = trace.input(
        "form8960.netInvestmentIncome",
        net_investment_income.clamp_zero(),
        "interest, dividends, net capital gain, passive income",
    );

    let threshold = trace.literal(
        "form8960.threshold",
        rules.niit_threshold(status),
        "NIIT threshold",
    );
    let over = trace.sub("form8960.agiOverThreshold", agi, &threshold);
    let over_clamped = trace.clamp_zero("form8960.agiExcess", &over);
    let base = trace.min("form8960.base", &nii, &over_clamped);
    let tax = trace.pct("form8960.tax", &base, Rules2025::NIIT_BPS, Rounding::HalfEven);

    Form8960Result {
        net_investment_income: nii,
        tax,
    }
}
