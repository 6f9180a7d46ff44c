//! Pennsylvania: Form PA-40, flat rate on income classes.

use crate::error::TaxResult;
use crate::model::{ResidencyType, ReturnModel, StateReturnConfig};
use crate::money::{Money, Rounding};
use crate::result::FederalResult;
use crate::states::{self, StateComputeResult, StateDetail, StateModule, apportion};
use crate::trace::Trace;

pub struct Pennsylvania;

/// Flat rate: 3.07% in basis points.
const RATE_BPS: i64 = 307;

impl StateModule for Pennsylvania {
    fn state_code(&self) -> &'static str {
        "PA"
    }

    fn form_label(&self) -> &'static str {
        "Form PA-40"
    }

    fn sidebar_label(&self) -> &'static str {
        "Pennsylvania"
    }

    fn compute(
        &self,
        model: &ReturnModel,
        federal: &FederalResult,
        config: &StateReturnConfig,
        trace: &mut Trace,
    ) -> TaxResult<StateComputeResult> {
        let prefix = "formpa40";
        let ratio = states::apportionment_ratio(config)?;

        // Pennsylvania taxes income classes separately and never nets a
        // loss in one class against another. Retirement income and
        // Social Security are exempt; there is no standard deduction.
        let federal_agi = trace.rebind(&federal.form1040.line11, format!("{prefix}.federalAgi"));
        let compensation = federal.form1040.line1z.amount;
        let interest = federal.form1040.line2b.amount.clamp_zero();
        let dividends = federal.form1040.line3b.amount.clamp_zero();
        let business = federal
            .schedule_c
            .as_ref()
            .map(|c| c.total_net_profit.amount.clamp_zero())
            .unwrap_or(Money::ZERO);
        let gains = federal.form1040.line7.amount.clamp_zero();

        let resident_base = compensation + interest + dividends + business + gains;
        let base_amount = match config.residency_type {
            ResidencyType::Nonresident => states::sourced_wages(model, "PA"),
            _ => resident_base,
        };
        let state_agi = trace.worksheet(
            format!("{prefix}.stateAgi"),
            base_amount,
            "sum of positive income classes",
            &[&federal_agi],
        );
        let taxable = trace.rebind(&state_agi, format!("{prefix}.taxableIncome"));

        let state_tax = trace.worksheet(
            format!("{prefix}.paTax"),
            taxable.amount.pct(RATE_BPS, Rounding::HalfEven),
            "3.07% flat tax",
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

        let withholding = states::withholding_node(model, "PA", prefix, trace);
        let total_payments = trace.rebind(&withholding, format!("{prefix}.totalPayments"));
        let (overpaid, amount_owed) =
            states::reconcile(prefix, &tax_after_credits, &total_payments, trace);

        Ok(StateComputeResult {
            state_code: "PA".to_string(),
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
            detail: StateDetail::Pennsylvania {
                taxable_compensation: compensation,
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
    use crate::model::{SaleCategory, SaleTransaction, W2StateRow, WageStatement};
    use crate::trace::Trace;
    use crate::types::{Owner, PersonInfo};
    use pretty_assertions::assert_eq;

    fn pa_model() -> ReturnModel {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Gwen".to_string(),
            last_name: "Kovacs".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.wage_statements = vec![WageStatement {
            id: "w2".to_string(),
            owner: Owner::Taxpayer,
            employer_name: "Keystone Mfg".to_string(),
            employer_ein: "12-3456789".to_string(),
            box1_wages: Money::from_dollars(50_000),
            box2_federal_withholding: Money::from_dollars(5_000),
            box3_social_security_wages: Money::from_dollars(50_000),
            box4_social_security_withheld: Money::ZERO,
            box5_medicare_wages: Money::from_dollars(50_000),
            box6_medicare_withheld: Money::ZERO,
            box12: Vec::new(),
            retirement_plan: false,
            third_party_sick_pay: false,
            state_rows: vec![W2StateRow {
                box15_state: "PA".to_string(),
                box16_state_wages: Money::from_dollars(50_000),
                box17_state_withholding: Money::from_dollars(1_500),
            }],
        }];
        model.state_returns = vec![StateReturnConfig::full_year("PA")];
        model
    }

    #[test]
    fn test_loss_class_never_nets_against_compensation() {
        let mut model = pa_model();
        // A federal capital loss: Schedule D line 21 is -3,000.
        model.sale_transactions = vec![SaleTransaction {
            id: "s1".to_string(),
            description: "lot s1".to_string(),
            acquired_date: None,
            sold_date: None,
            proceeds: Money::from_dollars(1_000),
            reported_basis: Money::from_dollars(4_000),
            adjusted_basis: None,
            long_term: false,
            category: SaleCategory::A,
            adjustment_code: None,
            adjustment_amount: Money::ZERO,
            wash_sale_loss_disallowed: Money::ZERO,
            rsu_vest_ref: None,
        }];

        let mut trace = Trace::new();
        let federal = form1040::compute(&model, &mut trace).unwrap();
        assert_eq!(
            federal.form1040.line7.amount,
            Money::from_dollars(-3_000)
        );

        let result = Pennsylvania
            .compute(&model, &federal, &model.state_returns[0], &mut trace)
            .unwrap();
        // The gains class floors at zero; compensation stays whole.
        assert_eq!(result.state_agi.amount, Money::from_dollars(50_000));
        // 3.07% flat.
        assert_eq!(result.state_tax.amount, Money::from_dollars(1_535));
        match result.detail {
            StateDetail::Pennsylvania {
                taxable_compensation,
            } => assert_eq!(taxable_compensation, Money::from_dollars(50_000)),
            ref other => panic!("unexpected detail: {other:?}"),
        }
    }
}
