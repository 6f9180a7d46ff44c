//! Arizona: Form 140, flat rate with dependent credits.

use crate::error::TaxResult;
use crate::model::{ResidencyType, ReturnModel, StateReturnConfig};
use crate::money::{Money, Rounding};
use crate::result::FederalResult;
use crate::states::{self, StateComputeResult, StateDetail, StateModule, apportion};
use crate::trace::Trace;
use crate::types::{FilingStatus, TAX_YEAR};

pub struct Arizona;

/// Flat rate: 2.5% in basis points.
const RATE_BPS: i64 = 250;
const DEPENDENT_CREDIT_UNDER_17: i64 = 100;
const DEPENDENT_CREDIT_17_PLUS: i64 = 25;

fn standard_deduction(status: FilingStatus) -> Money {
    // Arizona conforms to the federal standard deduction.
    match status {
        FilingStatus::Single | FilingStatus::MarriedFilingSeparately => Money::from_dollars(15_750),
        FilingStatus::HeadOfHousehold => Money::from_dollars(23_625),
        _ => Money::from_dollars(31_500),
    }
}

impl StateModule for Arizona {
    fn state_code(&self) -> &'static str {
        "AZ"
    }

    fn form_label(&self) -> &'static str {
        "Form 140"
    }

    fn sidebar_label(&self) -> &'static str {
        "Arizona"
    }

    fn compute(
        &self,
        model: &ReturnModel,
        federal: &FederalResult,
        config: &StateReturnConfig,
        trace: &mut Trace,
    ) -> TaxResult<StateComputeResult> {
        let prefix = "form140";
        let ratio = states::apportionment_ratio(config)?;

        let federal_agi = trace.rebind(&federal.form1040.line11, format!("{prefix}.federalAgi"));
        let subtractions = federal.form1040.line6b.amount;
        let resident_agi = (federal_agi.amount - subtractions).clamp_zero();
        let agi_amount = match config.residency_type {
            ResidencyType::Nonresident => states::sourced_wages(model, "AZ"),
            _ => resident_agi,
        };
        let state_agi = trace.worksheet(
            format!("{prefix}.stateAgi"),
            agi_amount,
            "federal AGI less Social Security",
            &[&federal_agi],
        );

        let taxable = trace.worksheet(
            format!("{prefix}.taxableIncome"),
            state_agi
                .amount
                .saturating_sub(standard_deduction(model.filing_status)),
            "state AGI less the standard deduction",
            &[&state_agi],
        );

        let state_tax = trace.worksheet(
            format!("{prefix}.azTax"),
            taxable.amount.pct(RATE_BPS, Rounding::HalfEven),
            "2.5% flat tax",
            &[&taxable],
        );

        // Dependent credit by age at year end.
        let mut dependent_credit = Money::ZERO;
        for dependent in &model.dependents {
            let under_17 = dependent
                .age_at_year_end(TAX_YEAR)
                .map(|age| age < 17)
                .unwrap_or(false);
            dependent_credit += Money::from_dollars(if under_17 {
                DEPENDENT_CREDIT_UNDER_17
            } else {
                DEPENDENT_CREDIT_17_PLUS
            });
        }

        let after = state_tax.amount.saturating_sub(dependent_credit);
        let after = if config.residency_type == ResidencyType::PartYear {
            apportion(after, ratio)
        } else {
            after
        };
        let tax_after_credits = trace.worksheet(
            format!("{prefix}.taxAfterCredits"),
            after,
            "tax less dependent credits",
            &[&state_tax],
        );

        let withholding = states::withholding_node(model, "AZ", prefix, trace);
        let total_payments = trace.rebind(&withholding, format!("{prefix}.totalPayments"));
        let (overpaid, amount_owed) =
            states::reconcile(prefix, &tax_after_credits, &total_payments, trace);

        Ok(StateComputeResult {
            state_code: "AZ".to_string(),
            form_label: self.form_label().to_string(),
            residency_type: config.residency_type,
            apportionment_ratio: ratio,
            state_agi,
            state_taxable_income: taxable,
            state_tax,
            tax_after_credits,
            state_withholding: withholding,
            total_payments,
            overpaid,
            amount_owed,
            detail: StateDetail::Arizona { dependent_credit },
            disclosures: Vec::new(),
            requires_income_tax_filing: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form1040;
    use crate::model::{W2StateRow, WageStatement};
    use crate::trace::Trace;
    use crate::types::{Dependent, DependentRelationship, Owner, PersonInfo};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn dependent(dob: &str) -> Dependent {
        Dependent {
            first_name: "Kid".to_string(),
            last_name: "Yazzie".to_string(),
            ssn: Some("987-65-4321".to_string()),
            relationship: DependentRelationship::Daughter,
            date_of_birth: NaiveDate::parse_from_str(dob, "%Y-%m-%d").ok(),
            months_lived_with_taxpayer: 12,
            is_disabled: false,
            is_student: false,
        }
    }

    fn az_model() -> ReturnModel {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Rosa".to_string(),
            last_name: "Yazzie".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.wage_statements = vec![WageStatement {
            id: "w2".to_string(),
            owner: Owner::Taxpayer,
            employer_name: "Desert Co".to_string(),
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
            state_rows: vec![W2StateRow {
                box15_state: "AZ".to_string(),
                box16_state_wages: Money::from_dollars(60_000),
                box17_state_withholding: Money::from_dollars(1_500),
            }],
        }];
        model.dependents = vec![dependent("2018-03-01"), dependent("2005-05-01")];
        model.state_returns = vec![StateReturnConfig::full_year("AZ")];
        model
    }

    #[test]
    fn test_dependent_credit_by_age_tier() {
        let model = az_model();
        let mut trace = Trace::new();
        let federal = form1040::compute(&model, &mut trace).unwrap();
        let result = Arizona
            .compute(&model, &federal, &model.state_returns[0], &mut trace)
            .unwrap();

        // 2.5% of (60,000 - 15,750) = $1,106.25.
        assert_eq!(result.state_tax.amount, Money::from_cents(110_625));
        // $100 for the child under 17, $25 for the adult dependent.
        match result.detail {
            StateDetail::Arizona { dependent_credit } => {
                assert_eq!(dependent_credit, Money::from_dollars(125));
            }
            ref other => panic!("unexpected detail: {other:?}"),
        }
        assert_eq!(result.tax_after_credits.amount, Money::from_cents(98_125));
    }
}
