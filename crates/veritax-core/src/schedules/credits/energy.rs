//! Form 5695: Energy Efficient Home Improvement Credit.

use crate::model::ReturnModel;
use crate::money::{Money, Rounding};
use crate::trace::{NodeRef, Trace};
use serde::{Deserialize, Serialize};

/// Computed Form 5695 (non-refundable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form5695Result {
    pub credit: NodeRef,
}

/// 30% of qualified costs with per-category caps: windows $600, doors
/// $500, audits $150; the envelope items share a $1,200 annual cap, heat
/// pumps get their own $2,000 cap.
pub fn compute(model: &ReturnModel, trace: &mut Trace) -> Option<Form5695Result> {
    let improvements = model.energy_improvements.as_ref()?;
    if !improvements.any() {
        return None;
    }

    let thirty = |amount: Money| amount.pct(3_000, Rounding::HalfEven);

    let windows = thirty(improvements.windows).min(Money::from_dollars(600));
    let doors = thirty(improvements.doors).min(Money::from_dollars(500));
    let insulation = thirty(improvements.insulation);
    let audit = thirty(improvements.energy_audit).min(Money::from_dollars(150));
    let envelope = (windows + doors + insulation + audit).min(Money::from_dollars(1_200));

    let heat_pumps = thirty(improvements.heat_pumps).min(Money::from_dollars(2_000));

    let credit = trace.worksheet(
        "form5695.credit",
        envelope + heat_pumps,
        "30% of qualified costs with category caps",
        &[],
    );
    Some(Form5695Result { credit })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EnergyImprovements;
    use crate::types::PersonInfo;
    use pretty_assertions::assert_eq;

    fn run(improvements: EnergyImprovements) -> Option<Money> {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Ren".to_string(),
            last_name: "Ito".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.energy_improvements = Some(improvements);
        let mut trace = Trace::new();
        compute(&model, &mut trace).map(|r| r.credit.amount)
    }

    #[test]
    fn test_category_caps() {
        let credit = run(EnergyImprovements {
            windows: Money::from_dollars(5_000), // 30% = 1,500, capped 600
            doors: Money::from_dollars(2_000),   // 30% = 600, capped 500
            insulation: Money::ZERO,
            heat_pumps: Money::from_dollars(8_000), // 30% = 2,400, capped 2,000
            energy_audit: Money::from_dollars(400), // 30% = 120
        })
        .unwrap();
        // Envelope: 600 + 500 + 120 = 1,220 -> capped at 1,200.
        assert_eq!(credit, Money::from_dollars(3_200));
    }

    #[test]
    fn test_absent_when_empty() {
        assert!(run(EnergyImprovements::default()).is_none());
    }
}
