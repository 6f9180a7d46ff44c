//! Virginia: Form 760, with MD/DC commuter reciprocity.

use crate::error::TaxResult;
use crate::model::{ResidencyType, ReturnModel, StateReturnConfig};
use crate::money::Money;
use crate::result::FederalResult;
use crate::rules::{TaxBracket, tax_from_brackets};
use crate::states::{self, StateComputeResult, StateDetail, StateModule, apportion};
use crate::trace::Trace;
use crate::types::TAX_YEAR;
use rust_decimal_macros::dec;

pub struct Virginia;

fn brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket {
            rate: dec!(0.02),
            min: Money::ZERO,
            max: Some(Money::from_dollars(3_000)),
        },
        TaxBracket {
            rate: dec!(0.03),
            min: Money::from_dollars(3_000),
            max: Some(Money::from_dollars(5_000)),
        },
        TaxBracket {
            rate: dec!(0.05),
            min: Money::from_dollars(5_000),
            max: Some(Money::from_dollars(17_000)),
        },
        TaxBracket {
            rate: dec!(0.0575),
            min: Money::from_dollars(17_000),
            max: None,
        },
    ]
}

const PERSONAL_EXEMPTION: i64 = 930;
const DEPENDENT_EXEMPTION: i64 = 930;
const AGE_DEDUCTION: i64 = 12_000;

/// States whose residents' Virginia wages are covered by reciprocity.
const RECIPROCITY_STATES: &[&str] = &["MD", "DC", "PA", "KY", "WV"];

impl StateModule for Virginia {
    fn state_code(&self) -> &'static str {
        "VA"
    }

    fn form_label(&self) -> &'static str {
        "Form 760"
    }

    fn sidebar_label(&self) -> &'static str {
        "Virginia"
    }

    fn compute(
        &self,
        model: &ReturnModel,
        federal: &FederalResult,
        config: &StateReturnConfig,
        trace: &mut Trace,
    ) -> TaxResult<StateComputeResult> {
        let prefix = "form760";
        let ratio = states::apportionment_ratio(config)?;
        let status = model.filing_status;
        let mut disclosures = Vec::new();

        // Commuter reciprocity: a nonresident who lives in a reciprocity
        // state and has only Virginia wage income owes no Virginia tax.
        let home_state = config
            .state_specific
            .get("home_state")
            .map(String::as_str)
            .unwrap_or("");
        let reciprocity_applied = config.residency_type == ResidencyType::Nonresident
            && RECIPROCITY_STATES.contains(&home_state);

        let federal_agi = trace.rebind(&federal.form1040.line11, format!("{prefix}.federalAgi"));
        let subtractions: Money = federal.form1040.line6b.amount
            + model
                .interest_statements
                .iter()
                .map(|s| s.box3_us_government_interest)
                .sum::<Money>();
        let resident_agi = (federal_agi.amount - subtractions).clamp_zero();
        let agi_amount = if reciprocity_applied {
            Money::ZERO
        } else {
            match config.residency_type {
                ResidencyType::Nonresident => states::sourced_wages(model, "VA"),
                _ => resident_agi,
            }
        };
        let state_agi = trace.worksheet(
            format!("{prefix}.stateAgi"),
            agi_amount,
            "federal AGI less Social Security and Treasury interest",
            &[&federal_agi],
        );

        let standard_deduction = if status.is_joint() {
            Money::from_dollars(17_000)
        } else {
            Money::from_dollars(8_500)
        };
        let mut exemptions = Money::from_dollars(PERSONAL_EXEMPTION);
        if status.is_joint() {
            exemptions += Money::from_dollars(PERSONAL_EXEMPTION);
        }
        exemptions += Money::from_dollars(DEPENDENT_EXEMPTION * model.dependents.len() as i64);

        // Age deduction for filers 65+.
        let mut age_deduction = Money::ZERO;
        if model.taxpayer.is_65_or_older(TAX_YEAR) {
            age_deduction += Money::from_dollars(AGE_DEDUCTION);
        }
        if let Some(spouse) = &model.spouse {
            if status.is_joint() && spouse.is_65_or_older(TAX_YEAR) {
                age_deduction += Money::from_dollars(AGE_DEDUCTION);
            }
        }

        let taxable = trace.worksheet(
            format!("{prefix}.taxableIncome"),
            state_agi
                .amount
                .saturating_sub(standard_deduction)
                .saturating_sub(exemptions)
                .saturating_sub(age_deduction),
            "state AGI less deduction, exemptions, and age deduction",
            &[&state_agi],
        );

        let state_tax = trace.worksheet(
            format!("{prefix}.vaTax"),
            tax_from_brackets(&brackets(), taxable.amount),
            "Virginia bracket tax",
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

        let withholding = states::withholding_node(model, "VA", prefix, trace);
        let total_payments = trace.rebind(&withholding, format!("{prefix}.totalPayments"));
        let (overpaid, amount_owed) =
            states::reconcile(prefix, &tax_after_credits, &total_payments, trace);

        if reciprocity_applied && withholding.amount.is_positive() {
            disclosures.push(format!(
                "Virginia withholding refunds in full under the {home_state} reciprocity agreement"
            ));
        }

        Ok(StateComputeResult {
            state_code: "VA".to_string(),
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
            detail: StateDetail::Virginia {
                age_deduction,
                reciprocity_applied,
            },
            disclosures,
            requires_income_tax_filing: !reciprocity_applied,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form1040;
    use crate::model::{W2StateRow, WageStatement};
    use crate::types::{Owner, PersonInfo};
    use pretty_assertions::assert_eq;

    fn va_nonresident_model(home: &str) -> ReturnModel {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Cal".to_string(),
            last_name: "Brooks".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.wage_statements = vec![WageStatement {
            id: "w2".to_string(),
            owner: Owner::Taxpayer,
            employer_name: "Arlington Inc".to_string(),
            employer_ein: "12-3456789".to_string(),
            box1_wages: Money::from_dollars(70_000),
            box2_federal_withholding: Money::from_dollars(7_000),
            box3_social_security_wages: Money::from_dollars(70_000),
            box4_social_security_withheld: Money::ZERO,
            box5_medicare_wages: Money::from_dollars(70_000),
            box6_medicare_withheld: Money::ZERO,
            box12: Vec::new(),
            retirement_plan: false,
            third_party_sick_pay: false,
            state_rows: vec![W2StateRow {
                box15_state: "VA".to_string(),
                box16_state_wages: Money::from_dollars(70_000),
                box17_state_withholding: Money::from_dollars(3_000),
            }],
        }];
        let mut config = StateReturnConfig::full_year("VA");
        config.residency_type = ResidencyType::Nonresident;
        config
            .state_specific
            .insert("home_state".to_string(), home.to_string());
        model.state_returns = vec![config];
        model
    }

    #[test]
    fn test_md_commuter_reciprocity() {
        let model = va_nonresident_model("MD");
        let mut trace = Trace::new();
        let federal = form1040::compute(&model, &mut trace).unwrap();
        let result = Virginia
            .compute(&model, &federal, &model.state_returns[0], &mut trace)
            .unwrap();
        assert_eq!(result.tax_after_credits.amount, Money::ZERO);
        assert!(!result.requires_income_tax_filing);
        // Withheld tax refunds in full.
        assert_eq!(result.overpaid.amount, Money::from_dollars(3_000));
        assert!(!result.disclosures.is_empty());
    }

    #[test]
    fn test_non_reciprocity_nonresident_taxed_on_sourced_wages() {
        let model = va_nonresident_model("OH");
        let mut trace = Trace::new();
        let federal = form1040::compute(&model, &mut trace).unwrap();
        let result = Virginia
            .compute(&model, &federal, &model.state_returns[0], &mut trace)
            .unwrap();
        assert_eq!(result.state_agi.amount, Money::from_dollars(70_000));
        assert!(result.state_tax.amount.is_positive());
    }
}
