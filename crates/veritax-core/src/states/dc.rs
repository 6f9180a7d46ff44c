//! District of Columbia: Form D-40. Nonresidents are never taxed.

use crate::error::TaxResult;
use crate::model::{ResidencyType, ReturnModel, StateReturnConfig};
use crate::money::Money;
use crate::result::FederalResult;
use crate::rules::{TaxBracket, tax_from_brackets};
use crate::states::{self, StateComputeResult, StateDetail, StateModule, apportion};
use crate::trace::Trace;
use crate::types::FilingStatus;
use rust_decimal_macros::dec;

pub struct DistrictOfColumbia;

fn brackets() -> Vec<TaxBracket> {
    build(&[
        (dec!(0.04), Some(10_000)),
        (dec!(0.06), Some(40_000)),
        (dec!(0.065), Some(60_000)),
        (dec!(0.085), Some(250_000)),
        (dec!(0.0925), Some(500_000)),
        (dec!(0.0975), Some(1_000_000)),
        (dec!(0.1075), None),
    ])
}

fn build(rows: &[(rust_decimal::Decimal, Option<i64>)]) -> Vec<TaxBracket> {
    let mut out = Vec::with_capacity(rows.len());
    let mut min = Money::ZERO;
    for (rate, max) in rows {
        let max = max.map(Money::from_dollars);
        out.push(TaxBracket { rate: *rate, min, max });
        if let Some(m) = max {
            min = m;
        }
    }
    out
}

fn standard_deduction(status: FilingStatus) -> Money {
    // DC conforms to the federal standard deduction.
    match status {
        FilingStatus::Single | FilingStatus::MarriedFilingSeparately => Money::from_dollars(15_750),
        FilingStatus::HeadOfHousehold => Money::from_dollars(23_625),
        _ => Money::from_dollars(31_500),
    }
}

impl StateModule for DistrictOfColumbia {
    fn state_code(&self) -> &'static str {
        "DC"
    }

    fn form_label(&self) -> &'static str {
        "Form D-40"
    }

    fn sidebar_label(&self) -> &'static str {
        "District of Columbia"
    }

    fn compute(
        &self,
        model: &ReturnModel,
        federal: &FederalResult,
        config: &StateReturnConfig,
        trace: &mut Trace,
    ) -> TaxResult<StateComputeResult> {
        let prefix = "formd40";
        let ratio = states::apportionment_ratio(config)?;
        let mut disclosures = Vec::new();

        // DC may not tax nonresidents at all; any DC withholding for a
        // nonresident refunds in full.
        let nonresident = config.residency_type == ResidencyType::Nonresident;

        let federal_agi = trace.rebind(&federal.form1040.line11, format!("{prefix}.federalAgi"));
        let subtractions = federal.form1040.line6b.amount;
        let agi_amount = if nonresident {
            Money::ZERO
        } else {
            (federal_agi.amount - subtractions).clamp_zero()
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
            "state AGI less the DC standard deduction",
            &[&state_agi],
        );

        let state_tax = trace.worksheet(
            format!("{prefix}.dcTax"),
            tax_from_brackets(&brackets(), taxable.amount),
            "DC bracket tax",
            &[&taxable],
        );

        let after = if config.residency_type == ResidencyType::PartYear {
            apportion(state_tax.amount, ratio)
        } else {
            state_tax.amount
        };
        let tax_after_credits = trace.worksheet(
            format!("{prefix}.taxAfterCredits"),
            after,
            "no nonrefundable credits modeled",
            &[&state_tax],
        );

        let withholding = states::withholding_node(model, "DC", prefix, trace);
        let total_payments = trace.rebind(&withholding, format!("{prefix}.totalPayments"));
        let (overpaid, amount_owed) =
            states::reconcile(prefix, &tax_after_credits, &total_payments, trace);

        if nonresident && withholding.amount.is_positive() {
            disclosures
                .push("DC does not tax nonresidents; withholding refunds in full".to_string());
        }

        Ok(StateComputeResult {
            state_code: "DC".to_string(),
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
            detail: StateDetail::DistrictOfColumbia {
                reciprocity_applied: nonresident,
            },
            disclosures,
            requires_income_tax_filing: !nonresident,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form1040;
    use crate::model::{W2StateRow, WageStatement};
    use crate::trace::Trace;
    use crate::types::{Owner, PersonInfo};
    use pretty_assertions::assert_eq;

    fn dc_model(residency: ResidencyType) -> ReturnModel {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Asha".to_string(),
            last_name: "Bell".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.wage_statements = vec![WageStatement {
            id: "w2".to_string(),
            owner: Owner::Taxpayer,
            employer_name: "Capitol LLC".to_string(),
            employer_ein: "12-3456789".to_string(),
            box1_wages: Money::from_dollars(80_000),
            box2_federal_withholding: Money::from_dollars(8_000),
            box3_social_security_wages: Money::from_dollars(80_000),
            box4_social_security_withheld: Money::ZERO,
            box5_medicare_wages: Money::from_dollars(80_000),
            box6_medicare_withheld: Money::ZERO,
            box12: Vec::new(),
            retirement_plan: false,
            third_party_sick_pay: false,
            state_rows: vec![W2StateRow {
                box15_state: "DC".to_string(),
                box16_state_wages: Money::from_dollars(80_000),
                box17_state_withholding: Money::from_dollars(4_000),
            }],
        }];
        let mut config = StateReturnConfig::full_year("DC");
        config.residency_type = residency;
        model.state_returns = vec![config];
        model
    }

    #[test]
    fn test_full_year_bracket_tax() {
        let model = dc_model(ResidencyType::FullYear);
        let mut trace = Trace::new();
        let federal = form1040::compute(&model, &mut trace).unwrap();
        let result = DistrictOfColumbia
            .compute(&model, &federal, &model.state_returns[0], &mut trace)
            .unwrap();

        // Taxable 64,250: 4% of 10,000 + 6% of 30,000 + 6.5% of 20,000
        // + 8.5% of 4,250.
        assert_eq!(
            result.state_taxable_income.amount,
            Money::from_dollars(64_250)
        );
        assert_eq!(result.state_tax.amount, Money::from_cents(386_125));
        assert!(result.requires_income_tax_filing);
    }

    #[test]
    fn test_nonresident_never_taxed() {
        let model = dc_model(ResidencyType::Nonresident);
        let mut trace = Trace::new();
        let federal = form1040::compute(&model, &mut trace).unwrap();
        let result = DistrictOfColumbia
            .compute(&model, &federal, &model.state_returns[0], &mut trace)
            .unwrap();

        assert_eq!(result.tax_after_credits.amount, Money::ZERO);
        assert!(!result.requires_income_tax_filing);
        // Withheld tax refunds in full, with a disclosure.
        assert_eq!(result.overpaid.amount, Money::from_dollars(4_000));
        assert!(!result.disclosures.is_empty());
    }
}
