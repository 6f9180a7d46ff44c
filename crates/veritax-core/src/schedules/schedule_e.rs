//! Schedule E: Supplemental Income and Loss (rental real estate, K-1s).

use crate::model::ReturnModel;
use crate::money::Money;
use crate::rules::Rules2025;
use crate::schedules::form8582::{self, Form8582Result, PassiveActivity};
use crate::trace::{NodeRef, Trace};
use serde::{Deserialize, Serialize};

/// One rental property's computed lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalResult {
    pub property_id: String,
    /// Line 3: rents received.
    pub rents: NodeRef,
    /// Line 20: total expenses.
    pub total_expenses: NodeRef,
    /// Line 21: income or loss before the passive limitation.
    pub net: NodeRef,
}

/// Computed Schedule E.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEResult {
    pub rentals: Vec<RentalResult>,
    /// K-1 nonpassive ordinary income entering Part II directly.
    pub k1_nonpassive: NodeRef,
    /// The passive-loss limitation applied to rentals and passive K-1s.
    pub form8582: Form8582Result,
    /// Line 26-equivalent: the total flowing to Schedule 1 line 5.
    pub total: NodeRef,
}

/// Computes Schedule E. `magi_estimate` is the modified AGI used by the
/// Form 8582 special-allowance phase-out (income before passive items).
pub fn compute(
    model: &ReturnModel,
    rules: &Rules2025,
    magi_estimate: Money,
    trace: &mut Trace,
) -> ScheduleEResult {
    let mut rentals = Vec::with_capacity(model.rental_properties.len());
    let mut activities = Vec::new();

    for (i, property) in model.rental_properties.iter().enumerate() {
        let prefix = format!("scheduleE.rental{i}");
        let rents = trace.input(
            format!("{prefix}.rents"),
            property.rents_received,
            format!("rents received for {}", property.address),
        );
        let total_expenses = trace.input(
            format!("{prefix}.totalExpenses"),
            property.expenses.total(),
            format!("expense categories for {}", property.address),
        );
        let net = trace.sub(format!("{prefix}.net"), &rents, &total_expenses);

        activities.push(PassiveActivity {
            activity_id: property.id.clone(),
            net: net.amount,
            prior_suspended: property.prior_suspended_loss,
            active_participation: property.active_participation,
        });
        rentals.push(RentalResult {
            property_id: property.id.clone(),
            rents,
            total_expenses,
            net,
        });
    }

    // Passive K-1 entries join the limitation; nonpassive ones bypass it.
    let mut nonpassive_parts = Vec::new();
    for (i, k1) in model.k1_passthroughs.iter().enumerate() {
        let amount = k1.box1_ordinary_income + k1.box2_rental_income;
        if amount.is_zero() {
            continue;
        }
        if k1.is_passive {
            activities.push(PassiveActivity {
                activity_id: k1.id.clone(),
                net: amount,
                prior_suspended: Money::ZERO,
                active_participation: false,
            });
        } else {
            nonpassive_parts.push(trace.input(
                format!("scheduleE.k1.{i}"),
                amount,
                format!("K-1 boxes 1-2 from {}", k1.entity_name),
            ));
        }
    }

    let k1_nonpassive = {
        let refs: Vec<&NodeRef> = nonpassive_parts.iter().collect();
        trace.sum("scheduleE.k1Nonpassive", &refs)
    };

    let form8582 = form8582::compute(&activities, rules, model.filing_status, magi_estimate, trace);

    let passive_reported = trace.worksheet(
        "scheduleE.passiveReported",
        form8582.reported_net,
        "passive activities after Form 8582 limitation",
        &[&form8582.allowed_loss],
    );
    let total = trace.sum("scheduleE.total", &[&passive_reported, &k1_nonpassive]);

    ScheduleEResult {
        rentals,
        k1_nonpassive,
        form8582,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RentalExpenses, RentalProperty};
    use crate::types::PersonInfo;
    use pretty_assertions::assert_eq;

    fn rental(id: &str, rents: i64, expenses: i64, active: bool) -> RentalProperty {
        RentalProperty {
            id: id.to_string(),
            address: format!("{id} Main St"),
            fair_rental_days: 365,
            personal_use_days: 0,
            rents_received: Money::from_dollars(rents),
            expenses: RentalExpenses {
                repairs: Money::from_dollars(expenses),
                ..RentalExpenses::default()
            },
            active_participation: active,
            qbi_safe_harbor: false,
            prior_suspended_loss: Money::ZERO,
        }
    }

    fn run(properties: Vec<RentalProperty>, magi: i64) -> ScheduleEResult {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Ira".to_string(),
            last_name: "Vance".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.rental_properties = properties;
        let rules = Rules2025::new();
        let mut trace = Trace::new();
        compute(&model, &rules, Money::from_dollars(magi), &mut trace)
    }

    #[test]
    fn test_profitable_rental_flows_whole() {
        let result = run(vec![rental("r1", 24_000, 10_000, true)], 90_000);
        assert_eq!(result.total.amount, Money::from_dollars(14_000));
        assert!(!result.form8582.required);
    }

    #[test]
    fn test_rental_loss_limited() {
        let result = run(vec![rental("r1", 12_000, 42_000, true)], 120_000);
        // $30,000 loss; allowance = 25,000 − 10,000 = 15,000.
        assert_eq!(result.total.amount, Money::from_dollars(-15_000));
        assert_eq!(result.form8582.suspended, Money::from_dollars(15_000));
    }
}
