//! Form 8962: Premium Tax Credit reconciliation.

use crate::model::ReturnModel;
use crate::money::{Money, Rounding};
use crate::rules::Rules2025;
use crate::trace::{NodeRef, Trace};
use serde::{Deserialize, Serialize};

/// Computed Form 8962.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form8962Result {
    /// Household income as a percent of the federal poverty line.
    pub fpl_percent: i64,
    /// Net premium tax credit (refundable, Schedule 3 line 9 path).
    pub net_credit: NodeRef,
    /// Excess advance PTC to repay (Schedule 2), after the statutory cap.
    pub repayment: NodeRef,
}

/// Repayment cap for excess advance PTC, by % FPL (None = uncapped).
fn repayment_cap(fpl_percent: i64, is_joint_or_hoh: bool) -> Option<Money> {
    let (single, family) = match fpl_percent {
        p if p < 200 => (375, 750),
        p if p < 300 => (950, 1_900),
        p if p < 400 => (1_575, 3_150),
        _ => return None,
    };
    Some(Money::from_dollars(if is_joint_or_hoh { family } else { single }))
}

/// Reconciles advance PTC against the allowed credit. `household_income`
/// is MAGI for this purpose (AGI plus tax-exempt interest).
pub fn compute(
    model: &ReturnModel,
    rules: &Rules2025,
    household_income: &NodeRef,
    trace: &mut Trace,
) -> Option<Form8962Result> {
    if model.marketplace_statements.is_empty() {
        return None;
    }

    let premiums: Money = model
        .marketplace_statements
        .iter()
        .map(|s| s.annual_premium)
        .sum();
    let slcsp: Money = model
        .marketplace_statements
        .iter()
        .map(|s| s.annual_slcsp_premium)
        .sum();
    let advance: Money = model
        .marketplace_statements
        .iter()
        .map(|s| s.annual_advance_ptc)
        .sum();

    let household_size = 1
        + model.spouse.is_some() as u8
        + model.dependents.len() as u8;
    let fpl = rules.federal_poverty_line(household_size);
    let fpl_percent = if fpl.is_positive() {
        household_income.amount.clamp_zero().as_cents() * 100 / fpl.as_cents()
    } else {
        0
    };

    let contribution = household_income
        .amount
        .clamp_zero()
        .pct(rules.ptc_applicable_bps(fpl_percent), Rounding::HalfEven);
    let allowed = slcsp.saturating_sub(contribution).min(premiums);

    let net = allowed - advance;
    let (net_credit_amount, repayment_amount) = if net >= Money::ZERO {
        (net, Money::ZERO)
    } else {
        let family = model.filing_status.is_joint()
            || model.filing_status == crate::types::FilingStatus::HeadOfHousehold;
        let owed = match repayment_cap(fpl_percent, family) {
            Some(cap) => net.abs().min(cap),
            None => net.abs(),
        };
        (Money::ZERO, owed)
    };

    let net_credit = trace.worksheet(
        "form8962.netCredit",
        net_credit_amount,
        "premium tax credit net of advance payments",
        &[household_income],
    );
    let repayment = trace.worksheet(
        "form8962.repayment",
        repayment_amount,
        "excess advance PTC repayment after cap",
        &[household_income],
    );

    Some(Form8962Result {
        fpl_percent,
        net_credit,
        repayment,
    })
}
