//! Colorado: Form DR 0104, flat rate on federal taxable income.

use crate::error::TaxResult;
use crate::model::{ResidencyType, ReturnModel, StateReturnConfig};
use crate::money::Rounding;
use crate::result::FederalResult;
use crate::states::{self, StateComputeResult, StateDetail, StateModule, apportion};
use crate::trace::Trace;

pub struct Colorado;

/// Flat rate: 4.40% in basis points.
const PCT_440: i64 = 440;

impl StateModule for Colorado {
    fn state_code(&self) -> &'static str {
        "CO"
    }

    fn form_label(&self) -> &'static str {
        "Form DR 0104"
    }

    fn sidebar_label(&self) -> &'static str {
        "Colorado"
    }

    fn compute(
        &self,
        model: &ReturnModel,
        federal: &FederalResult,
        config: &StateReturnConfig,
        trace: &mut Trace,
    ) -> TaxResult<StateComputeResult> {
        let prefix = "formdr0104";
        let ratio = states::apportionment_ratio(config)?;

        // Colorado starts from federal taxable income and subtracts the
        // taxable Social Security that income already contains.
        let federal_taxable =
            trace.rebind(&federal.form1040.line15, format!("{prefix}.federalTaxable"));
        let ss_subtraction = federal.form1040.line6b.amount;
        let resident_taxable = (federal_taxable.amount - ss_subtraction).clamp_zero();
        let taxable_amount = match config.residency_type {
            ResidencyType::Nonresident => states::sourced_wages(model, "CO"),
            _ => resident_taxable,
        };

        let state_agi = trace.rebind(&federal.form1040.line11, format!("{prefix}.stateAgi"));
        let taxable = trace.worksheet(
            format!("{prefix}.taxableIncome"),
            taxable_amount,
            "federal taxable income less Social Security subtraction",
            &[&federal_taxable],
        );

        let state_tax = trace.worksheet(
            format!("{prefix}.coTax"),
            taxable.amount.pct(PCT_440, Rounding::HalfEven),
            "4.40% flat tax",
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

        let withholding = states::withholding_node(model, "CO", prefix, trace);
        let total_payments = trace.rebind(&withholding, format!("{prefix}.totalPayments"));
        let (overpaid, amount_owed) =
            states::reconcile(prefix, &tax_after_credits, &total_payments, trace);

        Ok(StateComputeResult {
            state_code: "CO".to_string(),
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
            detail: StateDetail::Colorado {
                social_security_subtraction: ss_subtraction,
            },
            disclosures: Vec::new(),
            requires_income_tax_filing: true,
        })
    }
}
