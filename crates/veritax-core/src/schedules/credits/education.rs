//! Form 8863: Education Credits (AOTC and Lifetime Learning).

use crate::model::ReturnModel;
use crate::money::{Money, Rounding};
use crate::rules::Rules2025;
use crate::trace::{NodeRef, Trace};
use serde::{Deserialize, Serialize};

/// Computed Form 8863.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form8863Result {
    /// Non-refundable education credit (60% of AOTC plus all of LLC).
    pub non_refundable: NodeRef,
    /// Refundable 40% of the AOTC (Form 1040 line 29).
    pub refundable: NodeRef,
}

/// AOTC per student: 100% of the first $2,000 of qualified expenses plus
/// 25% of the next $2,000. LLC: 20% of up to $10,000 of remaining
/// expenses, one limit per return. MAGI phase-out applies to both.
pub fn compute(
    model: &ReturnModel,
    rules: &Rules2025,
    magi: &NodeRef,
    trace: &mut Trace,
) -> Option<Form8863Result> {
    if model.education_expenses.is_empty() {
        return None;
    }

    let mut aotc = Money::ZERO;
    let mut llc_expenses = Money::ZERO;
    for expense in &model.education_expenses {
        if expense.aotc_eligible {
            let first = expense.qualified_expenses.min(Money::from_dollars(2_000));
            let next = (expense.qualified_expenses - first).min(Money::from_dollars(2_000));
            aotc += first + next.mul_rational(1, 4, Rounding::HalfEven);
        } else {
            llc_expenses += expense.qualified_expenses;
        }
    }
    let llc = llc_expenses
        .min(Money::from_dollars(10_000))
        .pct(2_000, Rounding::HalfEven);

    let phase_out = rules.education_phase_out(model.filing_status);
    let aotc = phase_out.apply(aotc, magi.amount);
    let llc = phase_out.apply(llc, magi.amount);

    // 40% of the AOTC is refundable; the rest joins the LLC as
    // non-refundable.
    let refundable_amount = aotc.pct(4_000, Rounding::HalfEven);
    let refundable = trace.worksheet(
        "form8863.refundable",
        refundable_amount,
        "refundable 40% of American Opportunity Credit",
        &[magi],
    );
    let non_refundable = trace.worksheet(
        "form8863.nonRefundable",
        aotc - refundable_amount + llc,
        "education credits after MAGI phase-out",
        &[magi],
    );

    Some(Form8863Result {
        non_refundable,
        refundable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EducationExpense;
    use crate::types::PersonInfo;
    use pretty_assertions::assert_eq;

    fn model_with(expenses: Vec<EducationExpense>) -> ReturnModel {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Quinn".to_string(),
            last_name: "Adams".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.education_expenses = expenses;
        model
    }

    fn run(expenses: Vec<EducationExpense>, magi: i64) -> Option<Form8863Result> {
        let model = model_with(expenses);
        let rules = Rules2025::new();
        let mut trace = Trace::new();
        let magi_node = trace.literal("magi", Money::from_dollars(magi), "test");
        compute(&model, &rules, &magi_node, &mut trace)
    }

    #[test]
    fn test_aotc_full() {
        let result = run(
            vec![EducationExpense {
                student_name: "Quinn".to_string(),
                qualified_expenses: Money::from_dollars(4_000),
                aotc_eligible: true,
            }],
            60_000,
        )
        .unwrap();
        // $2,500 total: $1,000 refundable, $1,500 non-refundable.
        assert_eq!(result.refundable.amount, Money::from_dollars(1_000));
        assert_eq!(result.non_refundable.amount, Money::from_dollars(1_500));
    }

    #[test]
    fn test_llc_only() {
        let result = run(
            vec![EducationExpense {
                student_name: "Quinn".to_string(),
                qualified_expenses: Money::from_dollars(12_000),
                aotc_eligible: false,
            }],
            60_000,
        )
        .unwrap();
        // 20% of the $10,000 cap.
        assert_eq!(result.non_refundable.amount, Money::from_dollars(2_000));
        assert_eq!(result.refundable.amount, Money::ZERO);
    }

    #[test]
    fn test_phase_out_midpoint() {
        let result = run(
            vec![EducationExpense {
                student_name: "Quinn".to_string(),
                qualified_expenses: Money::from_dollars(4_000),
                aotc_eligible: true,
            }],
            85_000,
        )
        .unwrap();
        // Half the credit survives at the middle of the 80k-90k range.
        assert_eq!(result.refundable.amount, Money::from_dollars(500));
        assert_eq!(result.non_refundable.amount, Money::from_dollars(750));
    }

    #[test]
    fn test_no_expenses_absent() {
        assert!(run(Vec::new(), 60_000).is_none());
    }
}
