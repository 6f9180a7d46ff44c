//! Above-the-line adjustments: IRA deduction, student loan interest,
//! educator expenses, SE health insurance.

use crate::model::ReturnModel;
use crate::money::Money;
use crate::rules::Rules2025;
use crate::trace::{NodeRef, Trace};
use crate::types::TAX_YEAR;
use serde::{Deserialize, Serialize};

/// Computed adjustment amounts (Schedule 1 Part II components).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentsResult {
    /// Traditional IRA deduction after the active-participant phase-out.
    pub ira_deduction: NodeRef,
    /// Student loan interest, capped and phased out by MAGI.
    pub student_loan_interest: NodeRef,
    /// Educator expenses, capped per educator.
    pub educator_expenses: NodeRef,
    /// SE health insurance, limited to net SE profit.
    pub se_health_insurance: NodeRef,
    /// SEP/SIMPLE contributions.
    pub sep_simple: NodeRef,
}

fn is_50_or_older(dob: Option<chrono::NaiveDate>) -> bool {
    use chrono::Datelike;
    dob.map(|d| i32::from(TAX_YEAR) - d.year() >= 50).unwrap_or(false)
}

/// Computes the adjustments. `magi_estimate` approximates MAGI for the
/// phase-outs (total income before these adjustments); `total_se_profit`
/// limits the SE health-insurance deduction.
pub fn compute(
    model: &ReturnModel,
    rules: &Rules2025,
    magi_estimate: Money,
    total_se_profit: Money,
    trace: &mut Trace,
) -> AdjustmentsResult {
    // IRA deduction. The phase-out applies only when the filer is an
    // active participant in a workplace plan (W-2 box 13).
    let ira = model.ira_contributions.clone().unwrap_or_default();
    let taxpayer_limit = rules.ira_contribution_limit(is_50_or_older(model.taxpayer.date_of_birth));
    let spouse_limit = rules.ira_contribution_limit(
        model
            .spouse
            .as_ref()
            .and_then(|s| s.date_of_birth)
            .map(|d| is_50_or_older(Some(d)))
            .unwrap_or(false),
    );
    let covered = model.wage_statements.iter().any(|w| w.retirement_plan);
    let mut deductible = ira.traditional.min(taxpayer_limit);
    if model.spouse.is_some() {
        deductible += ira.spouse_traditional.min(spouse_limit);
    }
    if covered {
        deductible = rules
            .ira_deduction_phase_out(model.filing_status)
            .apply(deductible, magi_estimate);
    }
    let ira_deduction = trace.worksheet(
        "adjustments.iraDeduction",
        deductible,
        "traditional IRA deduction after phase-out",
        &[],
    );

    // Student loan interest: capped at $2,500, MAGI phase-out.
    let capped = model
        .adjustments
        .student_loan_interest_paid
        .min(rules.student_loan_interest_cap());
    let student_loan = rules
        .student_loan_phase_out(model.filing_status)
        .apply(capped, magi_estimate);
    let student_loan_interest = trace.worksheet(
        "adjustments.studentLoanInterest",
        student_loan,
        "student loan interest after MAGI phase-out",
        &[],
    );

    // Educator expenses: $300 per educator.
    let cap = rules.educator_expense_cap();
    let mut educator = model.adjustments.educator_expenses.min(cap);
    if model.spouse.is_some() {
        educator += model.adjustments.spouse_educator_expenses.min(cap);
    }
    let educator_expenses = trace.input(
        "adjustments.educatorExpenses",
        educator,
        "educator expenses after per-educator cap",
    );

    // SE health insurance: premiums, limited to SE profit.
    let premiums: Money = model
        .businesses
        .iter()
        .map(|b| b.health_insurance_premiums)
        .sum();
    let se_health_insurance = trace.worksheet(
        "adjustments.seHealthInsurance",
        premiums.min(total_se_profit.clamp_zero()),
        "SE health insurance limited to SE profit",
        &[],
    );

    let sep: Money = model
        .businesses
        .iter()
        .map(|b| b.sep_simple_contributions)
        .sum();
    let sep_simple = trace.input(
        "adjustments.sepSimple",
        sep,
        "SEP/SIMPLE plan contributions",
    );

    AdjustmentsResult {
        ira_deduction,
        student_loan_interest,
        educator_expenses,
        se_health_insurance,
        sep_simple,
    }
}
