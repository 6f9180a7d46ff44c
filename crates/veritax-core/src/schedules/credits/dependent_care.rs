//! Form 2441: Child and Dependent Care Expenses.

use crate::model::ReturnModel;
use crate::money::{Money, Rounding};
use crate::rules::Rules2025;
use crate::trace::{NodeRef, Trace};
use serde::{Deserialize, Serialize};

/// Computed Form 2441 (non-refundable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form2441Result {
    pub allowed_expenses: Money,
    pub credit: NodeRef,
}

/// Applicable rate: 35% minus 1% per $2,000 of AGI over $15,000,
/// floored at 20%.
fn rate_bps(agi: Money) -> i64 {
    let over = agi.saturating_sub(Money::from_dollars(15_000));
    let steps = over.as_cents() / Money::from_dollars(2_000).as_cents();
    // A partial step still reduces the rate.
    let steps = if over.as_cents() % Money::from_dollars(2_000).as_cents() > 0 {
        steps + 1
    } else {
        steps
    };
    (3_500 - steps * 100).max(2_000)
}

/// Computes the dependent-care credit. `earned_income` is the smaller of
/// the two spouses' earned incomes (or the filer's own).
pub fn compute(
    model: &ReturnModel,
    rules: &Rules2025,
    agi: &NodeRef,
    earned_income: Money,
    trace: &mut Trace,
) -> Option<Form2441Result> {
    let care = model.dependent_care.as_ref()?;
    if !care.expenses_paid.is_positive() || care.qualifying_persons == 0 {
        return None;
    }

    let cap = rules.dependent_care_expense_cap(care.qualifying_persons);
    let allowed = care.expenses_paid.min(cap).min(earned_income.clamp_zero());
    if allowed.is_zero() {
        return None;
    }

    let bps = rate_bps(agi.amount);
    let credit = trace.worksheet(
        "form2441.credit",
        allowed.pct(bps, Rounding::HalfEven),
        format!("dependent care credit at {}%", bps / 100),
        &[agi],
    );
    Some(Form2441Result {
        allowed_expenses: allowed,
        credit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DependentCareExpenses;
    use crate::types::PersonInfo;
    use pretty_assertions::assert_eq;

    fn run(paid: i64, persons: u8, agi: i64, earned: i64) -> Option<Money> {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Tess".to_string(),
            last_name: "Moran".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.dependent_care = Some(DependentCareExpenses {
            expenses_paid: Money::from_dollars(paid),
            qualifying_persons: persons,
            provider_name: "Care Co".to_string(),
            provider_tin: "12-7654321".to_string(),
        });
        let rules = Rules2025::new();
        let mut trace = Trace::new();
        let agi_node = trace.literal("form1040.line11", Money::from_dollars(agi), "test");
        compute(
            &model,
            &rules,
            &agi_node,
            Money::from_dollars(earned),
            &mut trace,
        )
        .map(|r| r.credit.amount)
    }

    #[test]
    fn test_high_agi_uses_20_percent() {
        // $5,000 paid, one child: capped at 3,000; 20% = 600.
        assert_eq!(run(5_000, 1, 120_000, 80_000), Some(Money::from_dollars(600)));
    }

    #[test]
    fn test_two_children_higher_cap() {
        assert_eq!(run(8_000, 2, 120_000, 80_000), Some(Money::from_dollars(1_200)));
    }

    #[test]
    fn test_low_agi_higher_rate() {
        // AGI $15,000: full 35%.
        assert_eq!(run(3_000, 1, 15_000, 20_000), Some(Money::from_dollars(1_050)));
    }

    #[test]
    fn test_limited_by_earned_income() {
        assert_eq!(run(3_000, 1, 120_000, 1_000), Some(Money::from_dollars(200)));
    }
}
