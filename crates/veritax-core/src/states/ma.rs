//! Massachusetts: Form 1, flat rate with the millionaire surtax.

use crate::error::TaxResult;
use crate::model::{ResidencyType, ReturnModel, StateReturnConfig};
use crate::money::{Money, Rounding};
use crate::result::FederalResult;
use crate::states::{self, StateComputeResult, StateDetail, StateModule, apportion};
use crate::trace::Trace;

pub struct Massachusetts;

/// Flat rate: 5% in basis points.
const RATE_BPS: i64 = 500;
/// Surtax: 4% above the indexed threshold.
const SURTAX_BPS: i64 = 400;
const SURTAX_THRESHOLD: i64 = 1_083_150;
const PERSONAL_EXEMPTION_SINGLE: i64 = 4_400;
const PERSONAL_EXEMPTION_JOINT: i64 = 8_800;
const DEPENDENT_EXEMPTION: i64 = 1_000;
const RENTAL_DEDUCTION_CAP: i64 = 4_000;

impl StateModule for Massachusetts {
    fn state_code(&self) -> &'static str {
        "MA"
    }

    fn form_label(&self) -> &'static str {
        "Form 1"
    }

    fn sidebar_label(&self) -> &'static str {
        "Massachusetts"
    }

    fn compute(
        &self,
        model: &ReturnModel,
        federal: &FederalResult,
        config: &StateReturnConfig,
        trace: &mut Trace,
    ) -> TaxResult<StateComputeResult> {
        let prefix = "form1";
        let ratio = states::apportionment_ratio(config)?;

        let federal_agi = trace.rebind(&federal.form1040.line11, format!("{prefix}.federalAgi"));
        let subtractions = federal.form1040.line6b.amount;
        let resident_agi = (federal_agi.amount - subtractions).clamp_zero();
        let agi_amount = match config.residency_type {
            ResidencyType::Nonresident => states::sourced_wages(model, "MA"),
            _ => resident_agi,
        };
        let state_agi = trace.worksheet(
            format!("{prefix}.stateAgi"),
            agi_amount,
            "federal AGI less Social Security",
            &[&federal_agi],
        );

        let mut exemptions = if model.filing_status.is_joint() {
            Money::from_dollars(PERSONAL_EXEMPTION_JOINT)
        } else {
            Money::from_dollars(PERSONAL_EXEMPTION_SINGLE)
        };
        exemptions += Money::from_dollars(DEPENDENT_EXEMPTION * model.dependents.len() as i64);

        // Rental deduction: half of rent paid, capped.
        let rental_deduction = config
            .state_specific_amount("rent_paid")
            .map(|rent| {
                rent.mul_rational(1, 2, Rounding::HalfEven)
                    .min(Money::from_dollars(RENTAL_DEDUCTION_CAP))
            })
            .unwrap_or(Money::ZERO);

        let taxable = trace.worksheet(
            format!("{prefix}.taxableIncome"),
            state_agi
                .amount
                .saturating_sub(exemptions)
                .saturating_sub(rental_deduction),
            "state AGI less exemptions and rental deduction",
            &[&state_agi],
        );

        let base_tax = taxable.amount.pct(RATE_BPS, Rounding::HalfEven);
        let surtax = taxable
            .amount
            .saturating_sub(Money::from_dollars(SURTAX_THRESHOLD))
            .pct(SURTAX_BPS, Rounding::HalfEven);
        let state_tax = trace.worksheet(
            format!("{prefix}.maTax"),
            base_tax + surtax,
            "5% flat tax plus 4% surtax above the threshold",
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

        let withholding = states::withholding_node(model, "MA", prefix, trace);
        let total_payments = trace.rebind(&withholding, format!("{prefix}.totalPayments"));
        let (overpaid, amount_owed) =
            states::reconcile(prefix, &tax_after_credits, &total_payments, trace);

        Ok(StateComputeResult {
            state_code: "MA".to_string(),
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
            detail: StateDetail::Massachusetts {
                surtax,
                rental_deduction,
            },
            disclosures: Vec::new(),
            requires_income_tax_filing: true,
        })
    }
}
