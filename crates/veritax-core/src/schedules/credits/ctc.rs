//! Schedule 8812: Credits for Qualifying Children and Other Dependents.

use crate::model::ReturnModel;
use crate::money::{Money, Rounding};
use crate::rules::Rules2025;
use crate::trace::{NodeRef, Trace};
use crate::types::{Dependent, TAX_YEAR};
use serde::{Deserialize, Serialize};

/// Computed Schedule 8812.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form8812Result {
    pub qualifying_children: u32,
    pub other_dependents: u32,
    /// Credit after the AGI phase-out, before the tax limit.
    pub credit_after_phase_out: NodeRef,
    /// Non-refundable portion (Form 1040 line 19).
    pub non_refundable: NodeRef,
    /// Refundable additional child tax credit (Form 1040 line 28).
    pub refundable: NodeRef,
}

/// A qualifying child for the CTC: qualifying-child relationship, under
/// 17 at year end, more than half the year in the home, SSN and DOB
/// both present.
fn is_qualifying_child(dependent: &Dependent) -> bool {
    let Some(age) = dependent.age_at_year_end(TAX_YEAR) else {
        return false;
    };
    dependent.relationship.is_qualifying_child_relationship()
        && age < 17
        && dependent.months_lived_with_taxpayer > 6
        && dependent.ssn.is_some()
}

/// An ODC dependent: not a qualifying child, but identified (DOB + SSN).
fn is_other_dependent(dependent: &Dependent) -> bool {
    !is_qualifying_child(dependent) && dependent.ssn.is_some() && dependent.date_of_birth.is_some()
}

/// Computes the CTC/ODC/ACTC. `tax_before_credit` is the liability the
/// non-refundable portion can offset; `earned_income` drives the ACTC.
pub fn compute(
    model: &ReturnModel,
    rules: &Rules2025,
    agi: &NodeRef,
    tax_before_credit: &NodeRef,
    earned_income: Money,
    trace: &mut Trace,
) -> Form8812Result {
    let qualifying_children = model.dependents.iter().filter(|d| is_qualifying_child(d)).count() as u32;
    let other_dependents = model.dependents.iter().filter(|d| is_other_dependent(d)).count() as u32;

    let initial_amount = rules
        .child_tax_credit_max()
        .mul_rational(qualifying_children as i64, 1, Rounding::HalfEven)
        + rules
            .credit_for_other_dependents()
            .mul_rational(other_dependents as i64, 1, Rounding::HalfEven);
    let initial = trace.literal(
        "form8812.initialCredit",
        initial_amount,
        format!("{qualifying_children} qualifying children and {other_dependents} other dependents"),
    );

    // Phase-out: $50 per $1,000 (or fraction) of AGI over the threshold.
    let threshold = rules.child_tax_credit_phase_out().threshold.get(model.filing_status);
    let excess = agi.amount.saturating_sub(threshold);
    let excess_rounded_up = if excess.is_zero() {
        Money::ZERO
    } else {
        let thousand = Money::from_dollars(1_000).as_cents();
        let blocks = (excess.as_cents() + thousand - 1) / thousand;
        Money::from_cents(blocks * thousand)
    };
    let reduction = excess_rounded_up.pct(500, Rounding::HalfEven);
    let credit_after_phase_out = trace.worksheet(
        "form8812.creditAfterPhaseOut",
        initial.amount.saturating_sub(reduction),
        "phase-out at $50 per $1,000 of AGI over the threshold",
        &[&initial, agi],
    );

    let non_refundable = trace.min(
        "form8812.nonRefundable",
        &credit_after_phase_out,
        tax_before_credit,
    );

    // ACTC: capped per child, limited by 15% of earned income over
    // $2,500, and by what the non-refundable portion left behind.
    let remaining = credit_after_phase_out.amount - non_refundable.amount;
    let per_child_cap = rules
        .additional_child_tax_credit_max()
        .mul_rational(qualifying_children as i64, 1, Rounding::HalfEven);
    let earned_excess = earned_income.saturating_sub(rules.actc_earned_income_threshold());
    let earned_limit = earned_excess.pct(1_500, Rounding::HalfEven);
    let refundable = trace.worksheet(
        "form8812.refundable",
        remaining.min(per_child_cap).min(earned_limit).clamp_zero(),
        "additional child tax credit limits",
        &[&credit_after_phase_out, &non_refundable],
    );

    Form8812Result {
        qualifying_children,
        other_dependents,
        credit_after_phase_out,
        non_refundable,
        refundable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DependentRelationship, FilingStatus, PersonInfo};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn child(dob: &str) -> Dependent {
        Dependent {
            first_name: "Kid".to_string(),
            last_name: "Example".to_string(),
            ssn: Some("987-65-4321".to_string()),
            relationship: DependentRelationship::Daughter,
            date_of_birth: NaiveDate::parse_from_str(dob, "%Y-%m-%d").ok(),
            months_lived_with_taxpayer: 12,
            is_disabled: false,
            is_student: false,
        }
    }

    fn model_with(dependents: Vec<Dependent>, status: FilingStatus) -> ReturnModel {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Parent".to_string(),
            last_name: "Example".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.filing_status = status;
        model.dependents = dependents;
        model
    }

    fn run(model: &ReturnModel, agi: i64, tax_cents: i64, earned: i64) -> Form8812Result {
        let rules = Rules2025::new();
        let mut trace = Trace::new();
        let agi_node = trace.literal("form1040.line11", Money::from_dollars(agi), "test");
        let tax_node = trace.literal("tax", Money::from_cents(tax_cents), "test");
        compute(
            model,
            &rules,
            &agi_node,
            &tax_node,
            Money::from_dollars(earned),
            &mut trace,
        )
    }

    #[test]
    fn test_age_boundary() {
        // Born 2009-01-01: still 16 at the end of 2025 — qualifies.
        let model = model_with(vec![child("2009-01-01")], FilingStatus::Single);
        let result = run(&model, 80_000, 1_000_000, 80_000);
        assert_eq!(result.qualifying_children, 1);

        // Born 2008-12-31: turned 17 during 2025 — an other dependent.
        let model = model_with(vec![child("2008-12-31")], FilingStatus::Single);
        let result = run(&model, 80_000, 1_000_000, 80_000);
        assert_eq!(result.qualifying_children, 0);
        assert_eq!(result.other_dependents, 1);
    }

    #[test]
    fn test_full_credit_under_threshold() {
        let model = model_with(
            vec![child("2018-05-10"), child("2020-09-01")],
            FilingStatus::MarriedFilingJointly,
        );
        let result = run(&model, 150_000, 1_500_000, 150_000);
        assert_eq!(result.credit_after_phase_out.amount, Money::from_dollars(4_400));
        assert_eq!(result.non_refundable.amount, Money::from_dollars(4_400));
        assert_eq!(result.refundable.amount, Money::ZERO);
    }

    #[test]
    fn test_phase_out_rounds_excess_up() {
        let model = model_with(vec![child("2018-05-10")], FilingStatus::MarriedFilingJointly);
        // AGI $400,500: excess rounds up to $1,000 -> $50 reduction.
        let result = run(&model, 400_500, 2_000_000, 200_000);
        assert_eq!(result.credit_after_phase_out.amount, Money::from_dollars(2_150));
    }

    #[test]
    fn test_actc_limited_by_earned_income() {
        let model = model_with(vec![child("2018-05-10")], FilingStatus::Single);
        // No tax liability; earned income $8,000: 15% of 5,500 = $825.
        let result = run(&model, 8_000, 0, 8_000);
        assert_eq!(result.non_refundable.amount, Money::ZERO);
        assert_eq!(result.refundable.amount, Money::from_dollars(825));
    }

    #[test]
    fn test_missing_ssn_disqualifies() {
        let mut no_ssn = child("2018-05-10");
        no_ssn.ssn = None;
        let model = model_with(vec![no_ssn], FilingStatus::Single);
        let result = run(&model, 80_000, 1_000_000, 80_000);
        assert_eq!(result.qualifying_children, 0);
        assert_eq!(result.other_dependents, 0);
    }
}
