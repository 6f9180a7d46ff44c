//! Form 4952: Investment Interest Expense Deduction.

use crate::money::Money;
use crate::trace::{NodeRef, Trace};
use serde::{Deserialize, Serialize};

/// Computed Form 4952.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form4952Result {
    /// Line 3: investment interest paid plus prior-year carryforward.
    pub total_interest: NodeRef,
    /// Line 8: allowed deduction (limited to net investment income).
    pub allowed: NodeRef,
    /// Line 9 of next year's form: the disallowed carryforward.
    pub carryforward: Money,
}

/// Limits investment interest to net investment income; the excess
/// carries forward indefinitely.
pub fn compute(
    interest_paid: Money,
    carryforward_in: Money,
    net_investment_income: Money,
    trace: &mut Trace,
) -> Form4952Result {
    let paid = trace.input(
        "form4952.interestPaid",
        interest_paid,
        "investment interest paid",
    );
    let carried = trace.input(
        "form4952.carryforwardIn",
        carryforward_in,
        "prior-year disallowed investment interest",
    );
    let total_interest = trace.sum("form4952.totalInterest", &[&paid, &carried]);

    let nii = trace.input(
        "form4952.netInvestmentIncome",
        net_investment_income.clamp_zero(),
        "net investment income",
    );
    let allowed = trace.min("form4952.allowed", &total_interest, &nii);
    let carryforward = total_interest.amount - allowed.amount;

    Form4952Result {
        total_interest,
        allowed,
        carryforward,
    }
}
