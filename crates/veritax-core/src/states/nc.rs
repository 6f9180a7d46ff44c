//! North Carolina: Form D-400, flat rate.

use crate::error::TaxResult;
use crate::model::{ResidencyType, ReturnModel, StateReturnConfig};
use crate::money::{Money, Rounding};
use crate::result::FederalResult;
use crate::states::{self, StateComputeResult, StateDetail, StateModule, apportion};
use crate::trace::Trace;
use crate::types::FilingStatus;

pub struct NorthCarolina;

/// Flat rate for 2025: 4.25% in basis points.
const RATE_BPS: i64 = 425;

fn standard_deduction(status: FilingStatus) -> Money {
    match status {
        FilingStatus::Single | FilingStatus::MarriedFilingSeparately => Money::from_dollars(12_750),
        FilingStatus::HeadOfHousehold => Money::from_dollars(19_125),
        _ => Money::from_dollars(25_500),
    }
}

impl StateModule for NorthCarolina {
    fn state_code(&self) -> &'static str {
        "NC"
    }

    fn form_label(&self) -> &'static str {
        "Form D-400"
    }

    fn sidebar_label(&self) -> &'static str {
        "North Carolina"
    }

    fn compute(
        &self,
        model: &ReturnModel,
        federal: &FederalResult,
        config: &StateReturnConfig,
        trace: &mut Trace,
    ) -> TaxResult<StateComputeResult> {
        let prefix = "formd400";
        let ratio = states::apportionment_ratio(config)?;

        let federal_agi = trace.rebind(&federal.form1040.line11, format!("{prefix}.federalAgi"));
        let subtractions = federal.form1040.line6b.amount;
        let resident_agi = (federal_agi.amount - subtractions).clamp_zero();
        let agi_amount = match config.residency_type {
            ResidencyType::Nonresident => states::sourced_wages(model, "NC"),
            _ => resident_agi,
        };
        let state_agi = trace.worksheet(
            format!("{prefix}.stateAgi"),
            agi_amount,
            "federal AGI less Social Security",
            &[&federal_agi],
        );

        let deduction = standard_deduction(model.filing_status);
        let taxable = trace.worksheet(
            format!("{prefix}.taxableIncome"),
            state_agi.amount.saturating_sub(deduction),
            "state AGI less the NC standard deduction",
            &[&state_agi],
        );

        let state_tax = trace.worksheet(
            format!("{prefix}.ncTax"),
            taxable.amount.pct(RATE_BPS, Rounding::HalfEven),
            "4.25% flat tax",
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

        let withholding = states::withholding_node(model, "NC", prefix, trace);
        let total_payments = trace.rebind(&withholding, format!("{prefix}.totalPayments"));
        let (overpaid, amount_owed) =
            states::reconcile(prefix, &tax_after_credits, &total_payments, trace);

        Ok(StateComputeResult {
            state_code: "NC".to_string(),
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
            detail: StateDetail::NorthCarolina {
                standard_deduction: deduction,
            },
            disclosures: Vec::new(),
            requires_income_tax_filing: true,
        })
    }
}
