//! New Jersey: Form NJ-1040.

use crate::error::TaxResult;
use crate::model::{ResidencyType, ReturnModel, StateReturnConfig};
use crate::money::Money;
use crate::result::FederalResult;
use crate::rules::{TaxBracket, tax_from_brackets};
use crate::states::{self, StateComputeResult, StateDetail, StateModule, apportion};
use crate::trace::Trace;
use crate::types::FilingStatus;
use rust_decimal_macros::dec;

pub struct NewJersey;

fn brackets_single() -> Vec<TaxBracket> {
    build(&[
        (dec!(0.014), Some(20_000)),
        (dec!(0.0175), Some(35_000)),
        (dec!(0.035), Some(40_000)),
        (dec!(0.05525), Some(75_000)),
        (dec!(0.0637), Some(500_000)),
        (dec!(0.0897), Some(1_000_000)),
        (dec!(0.1075), None),
    ])
}

fn brackets_mfj() -> Vec<TaxBracket> {
    build(&[
        (dec!(0.014), Some(20_000)),
        (dec!(0.0175), Some(50_000)),
        (dec!(0.0245), Some(70_000)),
        (dec!(0.035), Some(80_000)),
        (dec!(0.05525), Some(150_000)),
        (dec!(0.0637), Some(500_000)),
        (dec!(0.0897), Some(1_000_000)),
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

const PERSONAL_EXEMPTION: i64 = 1_000;
const DEPENDENT_EXEMPTION: i64 = 1_500;
const PROPERTY_TAX_DEDUCTION_CAP: i64 = 15_000;

impl StateModule for NewJersey {
    fn state_code(&self) -> &'static str {
        "NJ"
    }

    fn form_label(&self) -> &'static str {
        "Form NJ-1040"
    }

    fn sidebar_label(&self) -> &'static str {
        "New Jersey"
    }

    fn compute(
        &self,
        model: &ReturnModel,
        federal: &FederalResult,
        config: &StateReturnConfig,
        trace: &mut Trace,
    ) -> TaxResult<StateComputeResult> {
        let prefix = "formnj1040";
        let ratio = states::apportionment_ratio(config)?;
        let status = model.filing_status;

        // New Jersey gross income: no federal AGI conformity, but wages,
        // interest, dividends, business and capital income line up with
        // the federal figures; Social Security is exempt.
        let federal_agi = trace.rebind(&federal.form1040.line11, format!("{prefix}.federalAgi"));
        let gross = (federal.form1040.line9.amount - federal.form1040.line6b.amount).clamp_zero();
        let agi_amount = match config.residency_type {
            ResidencyType::Nonresident => states::sourced_wages(model, "NJ"),
            _ => gross,
        };
        let state_agi = trace.worksheet(
            format!("{prefix}.stateAgi"),
            agi_amount,
            "gross income excluding Social Security",
            &[&federal_agi],
        );

        let mut exemptions = Money::from_dollars(PERSONAL_EXEMPTION);
        if status.is_joint() {
            exemptions += Money::from_dollars(PERSONAL_EXEMPTION);
        }
        exemptions += Money::from_dollars(DEPENDENT_EXEMPTION * model.dependents.len() as i64);

        // Property tax deduction from the state-specific bag, capped.
        let property_tax_deduction = config
            .state_specific_amount("property_tax_paid")
            .map(|p| p.min(Money::from_dollars(PROPERTY_TAX_DEDUCTION_CAP)))
            .unwrap_or(Money::ZERO);

        let taxable = trace.worksheet(
            format!("{prefix}.taxableIncome"),
            state_agi
                .amount
                .saturating_sub(exemptions)
                .saturating_sub(property_tax_deduction),
            "gross income less exemptions and property tax deduction",
            &[&state_agi],
        );

        let brackets = if status.is_joint() || status == FilingStatus::HeadOfHousehold {
            brackets_mfj()
        } else {
            brackets_single()
        };
        let state_tax = trace.worksheet(
            format!("{prefix}.njTax"),
            tax_from_brackets(&brackets, taxable.amount),
            "New Jersey bracket tax",
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

        let withholding = states::withholding_node(model, "NJ", prefix, trace);
        let total_payments = trace.rebind(&withholding, format!("{prefix}.totalPayments"));
        let (overpaid, amount_owed) =
            states::reconcile(prefix, &tax_after_credits, &total_payments, trace);

        Ok(StateComputeResult {
            state_code: "NJ".to_string(),
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
            detail: StateDetail::NewJersey {
                exemptions,
                property_tax_deduction,
            },
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
    use crate::types::{Owner, PersonInfo};
    use pretty_assertions::assert_eq;

    fn nj_model() -> ReturnModel {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Ines".to_string(),
            last_name: "Duarte".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.wage_statements = vec![WageStatement {
            id: "w2".to_string(),
            owner: Owner::Taxpayer,
            employer_name: "Turnpike Partners".to_string(),
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
                box15_state: "NJ".to_string(),
                box16_state_wages: Money::from_dollars(80_000),
                box17_state_withholding: Money::from_dollars(2_400),
            }],
        }];
        model.state_returns = vec![StateReturnConfig::full_year("NJ")];
        model
    }

    #[test]
    fn test_property_tax_deduction_capped() {
        let mut model = nj_model();
        model.state_returns[0]
            .state_specific
            .insert("property_tax_paid".to_string(), "20000".to_string());

        let mut trace = Trace::new();
        let federal = form1040::compute(&model, &mut trace).unwrap();
        let result = NewJersey
            .compute(&model, &federal, &model.state_returns[0], &mut trace)
            .unwrap();

        // 80,000 gross - 1,000 exemption - 15,000 capped deduction.
        assert_eq!(
            result.state_taxable_income.amount,
            Money::from_dollars(64_000)
        );
        match result.detail {
            StateDetail::NewJersey {
                property_tax_deduction,
                ..
            } => assert_eq!(property_tax_deduction, Money::from_dollars(15_000)),
            ref other => panic!("unexpected detail: {other:?}"),
        }
        // 1.4% of 20,000 + 1.75% of 15,000 + 3.5% of 5,000
        // + 5.525% of 24,000.
        assert_eq!(result.state_tax.amount, Money::from_cents(204_350));
    }
}
