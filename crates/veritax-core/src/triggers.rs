//! Attachment triggering: pure predicates deciding which schedules and
//! forms the computed return requires.

use crate::model::{HomeOfficeMethod, ReturnModel};
use crate::result::FederalResult;
use crate::schedules::credits::foreign_tax::ForeignTaxPath;
use crate::schedules::qbi::QbiForm;
use crate::types::ScheduleTag;
use std::collections::BTreeSet;

/// Evaluates every predicate against the model and the computed result.
pub fn executed_schedules(model: &ReturnModel, result: &FederalResult) -> BTreeSet<ScheduleTag> {
    let mut tags = BTreeSet::new();
    let f = &result.form1040;

    if result.schedule_a.is_some() {
        tags.insert(ScheduleTag::ScheduleA);
    }
    if result.schedule_b.required {
        tags.insert(ScheduleTag::ScheduleB);
    }
    if result.schedule_d.is_some() {
        tags.insert(ScheduleTag::ScheduleD);
        if result.form8949.has_transactions() {
            tags.insert(ScheduleTag::Form8949);
        }
    }
    if !model.businesses.is_empty() {
        tags.insert(ScheduleTag::ScheduleC);
    }
    if result
        .schedule_se
        .as_ref()
        .is_some_and(|se| se.total_se_tax.amount.is_positive())
    {
        tags.insert(ScheduleTag::ScheduleSe);
    }
    if !model.rental_properties.is_empty() {
        tags.insert(ScheduleTag::ScheduleE);
    }
    if model.businesses.iter().any(|b| {
        b.home_office
            .as_ref()
            .is_some_and(|h| h.method == HomeOfficeMethod::Regular)
    }) && result.schedule_c.as_ref().is_some_and(|c| {
        c.businesses.iter().any(|b| {
            b.home_office
                .as_ref()
                .is_some_and(|h| h.deduction.amount.is_positive())
        })
    }) {
        tags.insert(ScheduleTag::Form8829);
    }

    // Schedule 1: any adjustment, or any additional-income source.
    if f.line8.amount != crate::money::Money::ZERO || f.line10.amount.is_positive() {
        tags.insert(ScheduleTag::Schedule1);
    }
    // Schedule 2: anything on either part.
    if result.schedule2.part1_total.amount.is_positive()
        || result.schedule2.part2_total.amount.is_positive()
    {
        tags.insert(ScheduleTag::Schedule2);
    }
    // Schedule 3: non-refundable credits or the refundable PTC.
    if f.line20.amount.is_positive() || result.schedule3.refundable_ptc.amount.is_positive() {
        tags.insert(ScheduleTag::Schedule3);
    }

    if (f.line19.amount + f.line28.amount).is_positive() {
        tags.insert(ScheduleTag::Form8812);
    }
    if result.form8863.is_some() {
        tags.insert(ScheduleTag::Form8863);
    }
    if result
        .form6251
        .as_ref()
        .is_some_and(|a| a.amt.amount.is_positive())
    {
        tags.insert(ScheduleTag::Form6251);
    }
    if model.hsa.is_some() {
        tags.insert(ScheduleTag::Form8889);
    }
    if let Some(q) = &result.qbi {
        tags.insert(match q.form {
            QbiForm::Form8995 => ScheduleTag::Form8995,
            QbiForm::Form8995A => ScheduleTag::Form8995A,
        });
    }
    if result
        .foreign_tax
        .as_ref()
        .is_some_and(|ftc| ftc.path == ForeignTaxPath::Form1116)
    {
        tags.insert(ScheduleTag::Form1116);
    }
    if result
        .schedule_e
        .as_ref()
        .is_some_and(|e| e.form8582.required)
    {
        tags.insert(ScheduleTag::Form8582);
    }
    if result.form8606.is_some() {
        tags.insert(ScheduleTag::Form8606);
    }
    if result
        .form8959
        .as_ref()
        .is_some_and(|m| m.additional_tax.amount.is_positive())
    {
        tags.insert(ScheduleTag::Form8959);
    }
    if result
        .form8960
        .as_ref()
        .is_some_and(|n| n.tax.amount.is_positive())
    {
        tags.insert(ScheduleTag::Form8960);
    }
    if result.form8962.is_some() {
        tags.insert(ScheduleTag::Form8962);
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form1040;
    use crate::model::{InterestStatement, WageStatement};
    use crate::money::Money;
    use crate::trace::Trace;
    use crate::types::{Owner, PersonInfo};

    fn base_model() -> ReturnModel {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Vi".to_string(),
            last_name: "Tran".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.wage_statements = vec![WageStatement {
            id: "w2".to_string(),
            owner: Owner::Taxpayer,
            employer_name: "Acme".to_string(),
            employer_ein: "12-3456789".to_string(),
            box1_wages: Money::from_dollars(60_000),
            box2_federal_withholding: Money::from_dollars(6_000),
            box3_social_security_wages: Money::from_dollars(60_000),
            box4_social_security_withheld: Money::ZERO,
            box5_medicare_wages: Money::from_dollars(60_000),
            box6_medicare_withheld: Money::ZERO,
            box12: Vec::new(),
            retirement_plan: false,
            third_party_sick_pay: false,
            state_rows: Vec::new(),
        }];
        model
    }

    #[test]
    fn test_wage_only_return_triggers_nothing() {
        let model = base_model();
        let mut trace = Trace::new();
        let result = form1040::compute(&model, &mut trace).unwrap();
        assert!(result.executed_schedules.is_empty());
    }

    #[test]
    fn test_schedule_b_triggered_above_threshold() {
        let mut model = base_model();
        model.interest_statements = vec![InterestStatement {
            id: "int".to_string(),
            owner: Owner::Taxpayer,
            payer_name: "Bank".to_string(),
            payer_tin: "12-0000001".to_string(),
            box1_interest: Money::from_dollars(2_000),
            box2_early_withdrawal_penalty: Money::ZERO,
            box3_us_government_interest: Money::ZERO,
            box4_federal_withholding: Money::ZERO,
            box8_tax_exempt_interest: Money::ZERO,
        }];
        let mut trace = Trace::new();
        let result = form1040::compute(&model, &mut trace).unwrap();
        assert!(result.executed_schedules.contains(&ScheduleTag::ScheduleB));
    }
}
