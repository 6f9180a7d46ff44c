//! Illinois: Form IL-1040, flat rate on a retirement-friendly base.

use crate::error::TaxResult;
use crate::model::{ResidencyType, ReturnModel, StateReturnConfig};
use crate::money::{Money, Rounding};
use crate::result::FederalResult;
use crate::states::{self, StateComputeResult, StateDetail, StateModule, apportion};
use crate::trace::Trace;

pub struct Illinois;

/// Flat rate: 4.95% in basis points.
const RATE_BPS: i64 = 495;
const EXEMPTION_ALLOWANCE: i64 = 2_775;

impl StateModule for Illinois {
    fn state_code(&self) -> &'static str {
        "IL"
    }

    fn form_label(&self) -> &'static str {
        "Form IL-1040"
    }

    fn sidebar_label(&self) -> &'static str {
        "Illinois"
    }

    fn compute(
        &self,
        model: &ReturnModel,
        federal: &FederalResult,
        config: &StateReturnConfig,
        trace: &mut Trace,
    ) -> TaxResult<StateComputeResult> {
        let prefix = "formil1040";
        let ratio = states::apportionment_ratio(config)?;

        // Illinois exempts retirement income entirely: Social Security,
        // IRA distributions, and pensions all subtract from federal AGI.
        let federal_agi = trace.rebind(&federal.form1040.line11, format!("{prefix}.federalAgi"));
        let retirement_subtraction = federal.form1040.line6b.amount
            + federal.form1040.line4b.amount
            + federal.form1040.line5b.amount;
        let resident_agi = (federal_agi.amount - retirement_subtraction).clamp_zero();
        let agi_amount = match config.residency_type {
            ResidencyType::Nonresident => states::sourced_wages(model, "IL"),
            _ => resident_agi,
        };
        let state_agi = trace.worksheet(
            format!("{prefix}.stateAgi"),
            agi_amount,
            "federal AGI less retirement income",
            &[&federal_agi],
        );

        let mut exemptions = Money::from_dollars(EXEMPTION_ALLOWANCE);
        if model.filing_status.is_joint() {
            exemptions += Money::from_dollars(EXEMPTION_ALLOWANCE);
        }
        exemptions += Money::from_dollars(EXEMPTION_ALLOWANCE * model.dependents.len() as i64);

        let taxable = trace.worksheet(
            format!("{prefix}.taxableIncome"),
            state_agi.amount.saturating_sub(exemptions),
            "base income less exemption allowance",
            &[&state_agi],
        );

        let state_tax = trace.worksheet(
            format!("{prefix}.ilTax"),
            taxable.amount.pct(RATE_BPS, Rounding::HalfEven),
            "4.95% flat tax",
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

        let withholding = states::withholding_node(model, "IL", prefix, trace);
        let total_payments = trace.rebind(&withholding, format!("{prefix}.totalPayments"));
        let (overpaid, amount_owed) =
            states::reconcile(prefix, &tax_after_credits, &total_payments, trace);

        Ok(StateComputeResult {
            state_code: "IL".to_string(),
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
            detail: StateDetail::Illinois {
                exemption_allowance: exemptions,
                retirement_subtraction,
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
    use crate::model::{DistributionCode, RetirementDistribution, W2StateRow, WageStatement};
    use crate::trace::Trace;
    use crate::types::{Owner, PersonInfo};
    use pretty_assertions::assert_eq;

    fn il_model() -> ReturnModel {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Dev".to_string(),
            last_name: "Okoro".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.wage_statements = vec![WageStatement {
            id: "w2".to_string(),
            owner: Owner::Taxpayer,
            employer_name: "Loop Works".to_string(),
            employer_ein: "12-3456789".to_string(),
            box1_wages: Money::from_dollars(40_000),
            box2_federal_withholding: Money::from_dollars(4_000),
            box3_social_security_wages: Money::from_dollars(40_000),
            box4_social_security_withheld: Money::ZERO,
            box5_medicare_wages: Money::from_dollars(40_000),
            box6_medicare_withheld: Money::ZERO,
            box12: Vec::new(),
            retirement_plan: false,
            third_party_sick_pay: false,
            state_rows: vec![W2StateRow {
                box15_state: "IL".to_string(),
                box16_state_wages: Money::from_dollars(40_000),
                box17_state_withholding: Money::from_dollars(1_800),
            }],
        }];
        model.retirement_distributions = vec![RetirementDistribution {
            id: "r-1".to_string(),
            owner: Owner::Taxpayer,
            payer_name: "Custodian".to_string(),
            box1_gross: Money::from_dollars(20_000),
            box2a_taxable: Some(Money::from_dollars(20_000)),
            taxable_not_determined: false,
            total_distribution: false,
            box4_federal_withholding: Money::ZERO,
            box7_code: DistributionCode::Normal,
            ira_or_sep: true,
        }];
        model.state_returns = vec![StateReturnConfig::full_year("IL")];
        model
    }

    #[test]
    fn test_retirement_income_subtracted() {
        let model = il_model();
        let mut trace = Trace::new();
        let federal = form1040::compute(&model, &mut trace).unwrap();
        assert_eq!(federal.form1040.line11.amount, Money::from_dollars(60_000));

        let result = Illinois
            .compute(&model, &federal, &model.state_returns[0], &mut trace)
            .unwrap();
        // The IRA distribution comes back out of the base.
        assert_eq!(result.state_agi.amount, Money::from_dollars(40_000));
        assert_eq!(
            result.state_taxable_income.amount,
            Money::from_dollars(37_225)
        );
        // 4.95% flat.
        assert_eq!(result.state_tax.amount, Money::from_cents(184_264));
        match result.detail {
            StateDetail::Illinois {
                retirement_subtraction,
                ..
            } => assert_eq!(retirement_subtraction, Money::from_dollars(20_000)),
            ref other => panic!("unexpected detail: {other:?}"),
        }
    }
}
