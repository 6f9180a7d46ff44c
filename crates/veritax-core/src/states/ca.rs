//! California: Form 540.

use crate::error::TaxResult;
use crate::model::{ResidencyType, ReturnModel, StateReturnConfig};
use crate::money::{Money, Rounding};
use crate::result::FederalResult;
use crate::rules::{TaxBracket, tax_from_brackets};
use crate::states::{
    self, ReviewSection, StateComputeResult, StateDetail, StateModule, apportion,
};
use crate::trace::Trace;
use crate::types::FilingStatus;
use rust_decimal_macros::dec;

pub struct California;

/// 2025 California brackets, single/MFS.
fn brackets_single() -> Vec<TaxBracket> {
    build(&[
        (dec!(0.01), Some(10_756)),
        (dec!(0.02), Some(25_499)),
        (dec!(0.04), Some(40_245)),
        (dec!(0.06), Some(55_866)),
        (dec!(0.08), Some(70_606)),
        (dec!(0.093), Some(360_659)),
        (dec!(0.103), Some(432_787)),
        (dec!(0.113), Some(721_314)),
        (dec!(0.123), None),
    ])
}

/// MFJ/QSS brackets are doubled single; HOH has its own table.
fn brackets_mfj() -> Vec<TaxBracket> {
    build(&[
        (dec!(0.01), Some(21_512)),
        (dec!(0.02), Some(50_998)),
        (dec!(0.04), Some(80_490)),
        (dec!(0.06), Some(111_732)),
        (dec!(0.08), Some(141_212)),
        (dec!(0.093), Some(721_318)),
        (dec!(0.103), Some(865_574)),
        (dec!(0.113), Some(1_442_628)),
        (dec!(0.123), None),
    ])
}

fn brackets_hoh() -> Vec<TaxBracket> {
    build(&[
        (dec!(0.01), Some(21_527)),
        (dec!(0.02), Some(51_000)),
        (dec!(0.04), Some(65_744)),
        (dec!(0.06), Some(81_364)),
        (dec!(0.08), Some(96_107)),
        (dec!(0.093), Some(490_493)),
        (dec!(0.103), Some(588_593)),
        (dec!(0.113), Some(980_987)),
        (dec!(0.123), None),
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
    match status {
        FilingStatus::Single | FilingStatus::MarriedFilingSeparately => Money::from_dollars(5_706),
        _ => Money::from_dollars(11_412),
    }
}

const PERSONAL_EXEMPTION_CREDIT: i64 = 153;
const DEPENDENT_EXEMPTION_CREDIT: i64 = 475;
const RENTERS_CREDIT_AGI_LIMIT_SINGLE: i64 = 52_421;
const RENTERS_CREDIT_AGI_LIMIT_JOINT: i64 = 104_842;

impl StateModule for California {
    fn state_code(&self) -> &'static str {
        "CA"
    }

    fn form_label(&self) -> &'static str {
        "Form 540"
    }

    fn sidebar_label(&self) -> &'static str {
        "California"
    }

    fn review_layout(&self) -> Vec<ReviewSection> {
        vec![
            ReviewSection {
                title: "Income".to_string(),
                node_ids: vec!["form540.stateAgi".to_string(), "form540.taxableIncome".to_string()],
            },
            ReviewSection {
                title: "Tax and credits".to_string(),
                node_ids: vec![
                    "form540.caTax".to_string(),
                    "form540.exemptionCredits".to_string(),
                    "form540.taxAfterCredits".to_string(),
                ],
            },
        ]
    }

    fn compute(
        &self,
        model: &ReturnModel,
        federal: &FederalResult,
        config: &StateReturnConfig,
        trace: &mut Trace,
    ) -> TaxResult<StateComputeResult> {
        let prefix = "form540";
        let ratio = states::apportionment_ratio(config)?;
        let status = model.filing_status;
        let mut disclosures = Vec::new();

        // California starts from federal AGI, does not tax Social
        // Security or Treasury interest, and does not recognize HSAs.
        let federal_agi = trace.rebind(&federal.form1040.line11, format!("{prefix}.federalAgi"));
        let ss_subtraction = federal.form1040.line6b.amount;
        let treasury_subtraction: Money = model
            .interest_statements
            .iter()
            .map(|s| s.box3_us_government_interest)
            .sum();
        let hsa_addition =
            federal.schedule1.hsa_deduction.amount + model.employer_hsa_contributions();

        let resident_agi = (federal_agi.amount + hsa_addition
            - ss_subtraction
            - treasury_subtraction)
            .clamp_zero();
        let agi_amount = match config.residency_type {
            ResidencyType::Nonresident => states::sourced_wages(model, "CA"),
            _ => resident_agi,
        };
        let state_agi = trace.worksheet(
            format!("{prefix}.stateAgi"),
            agi_amount,
            "federal AGI plus HSA add-back, less Social Security and Treasury interest",
            &[&federal_agi],
        );

        let deduction = standard_deduction(status);
        let taxable = trace.worksheet(
            format!("{prefix}.taxableIncome"),
            state_agi.amount.saturating_sub(deduction),
            "state AGI less the California standard deduction",
            &[&state_agi],
        );

        let brackets = match status {
            FilingStatus::Single | FilingStatus::MarriedFilingSeparately => brackets_single(),
            FilingStatus::HeadOfHousehold => brackets_hoh(),
            _ => brackets_mfj(),
        };
        let base_tax = tax_from_brackets(&brackets, taxable.amount);

        // Mental Health Services surcharge: 1% above $1,000,000.
        let surcharge = taxable
            .amount
            .saturating_sub(Money::from_dollars(1_000_000))
            .pct(100, Rounding::HalfEven);

        let state_tax = trace.worksheet(
            format!("{prefix}.caTax"),
            base_tax + surcharge,
            "California bracket tax plus mental health surcharge",
            &[&taxable],
        );

        // Exemption credits reduce tax, not income.
        let mut exemption_credits =
            Money::from_dollars(PERSONAL_EXEMPTION_CREDIT);
        if status.is_joint() {
            exemption_credits += Money::from_dollars(PERSONAL_EXEMPTION_CREDIT);
        }
        exemption_credits += Money::from_dollars(
            DEPENDENT_EXEMPTION_CREDIT * model.dependents.len() as i64,
        );
        let exemption_node = trace.literal(
            format!("{prefix}.exemptionCredits"),
            exemption_credits,
            "personal and dependent exemption credits",
        );

        // Nonrefundable renter's credit, gated on AGI and the rent flag.
        let renters_limit = if status.is_joint() {
            Money::from_dollars(RENTERS_CREDIT_AGI_LIMIT_JOINT)
        } else {
            Money::from_dollars(RENTERS_CREDIT_AGI_LIMIT_SINGLE)
        };
        let renters_credit = if config.state_specific_flag("rented_all_year")
            && state_agi.amount <= renters_limit
        {
            if status.is_joint() {
                Money::from_dollars(120)
            } else {
                Money::from_dollars(60)
            }
        } else {
            Money::ZERO
        };

        let after_credits = state_tax
            .amount
            .saturating_sub(exemption_node.amount)
            .saturating_sub(renters_credit);
        // Part-year residents owe the resident tax scaled by the ratio.
        let after_credits = if config.residency_type == ResidencyType::PartYear {
            apportion(after_credits, ratio)
        } else {
            after_credits
        };
        let tax_after_credits = trace.worksheet(
            format!("{prefix}.taxAfterCredits"),
            after_credits,
            "tax less exemption and renter's credits",
            &[&state_tax, &exemption_node],
        );

        let withholding = states::withholding_node(model, "CA", prefix, trace);
        let total_payments = trace.rebind(&withholding, format!("{prefix}.totalPayments"));
        let (overpaid, amount_owed) = states::reconcile(prefix, &tax_after_credits, &total_payments, trace);

        if config.residency_type == ResidencyType::Nonresident && agi_amount.is_zero() {
            if withholding.amount.is_positive() {
                disclosures.push(
                    "California withholding reported without California-source wages".to_string(),
                );
            }
        }

        Ok(StateComputeResult {
            state_code: "CA".to_string(),
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
            detail: StateDetail::California {
                exemption_credits,
                renters_credit,
                mental_health_surcharge: surcharge,
            },
            disclosures,
            requires_income_tax_filing: true,
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

    fn ca_model(wages: i64, ca_withholding: i64) -> ReturnModel {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Gia".to_string(),
            last_name: "Lum".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.wage_statements = vec![WageStatement {
            id: "w2".to_string(),
            owner: Owner::Taxpayer,
            employer_name: "Tech Co".to_string(),
            employer_ein: "12-3456789".to_string(),
            box1_wages: Money::from_dollars(wages),
            box2_federal_withholding: Money::from_dollars(8_000),
            box3_social_security_wages: Money::from_dollars(wages),
            box4_social_security_withheld: Money::ZERO,
            box5_medicare_wages: Money::from_dollars(wages),
            box6_medicare_withheld: Money::ZERO,
            box12: Vec::new(),
            retirement_plan: false,
            third_party_sick_pay: false,
            state_rows: vec![W2StateRow {
                box15_state: "CA".to_string(),
                box16_state_wages: Money::from_dollars(wages),
                box17_state_withholding: Money::from_dollars(ca_withholding),
            }],
        }];
        model.state_returns = vec![StateReturnConfig::full_year("CA")];
        model
    }

    #[test]
    fn test_full_year_resident() {
        let model = ca_model(75_000, 4_000);
        let mut trace = Trace::new();
        let federal = form1040::compute(&model, &mut trace).unwrap();
        let result = California
            .compute(&model, &federal, &model.state_returns[0], &mut trace)
            .unwrap();

        assert_eq!(result.state_agi.amount, Money::from_dollars(75_000));
        assert_eq!(
            result.state_taxable_income.amount,
            Money::from_dollars(69_294)
        );
        assert!(result.state_tax.amount.is_positive());
        assert!(result.requires_income_tax_filing);
        // Exactly one of overpaid/owed is non-zero.
        assert!(
            result.overpaid.amount.is_zero() || result.amount_owed.amount.is_zero()
        );
    }

    #[test]
    fn test_exemption_credit_reduces_tax() {
        let model = ca_model(75_000, 4_000);
        let mut trace = Trace::new();
        let federal = form1040::compute(&model, &mut trace).unwrap();
        let result = California
            .compute(&model, &federal, &model.state_returns[0], &mut trace)
            .unwrap();
        assert_eq!(
            result.tax_after_credits.amount,
            result
                .state_tax
                .amount
                .saturating_sub(Money::from_dollars(PERSONAL_EXEMPTION_CREDIT))
        );
    }
}
