//! New York: Form IT-201.

use crate::error::TaxResult;
use crate::model::{ResidencyType, ReturnModel, StateReturnConfig};
use crate::money::Money;
use crate::result::FederalResult;
use crate::rules::{TaxBracket, tax_from_brackets};
use crate::states::{self, StateComputeResult, StateDetail, StateModule, apportion};
use crate::trace::Trace;
use crate::types::FilingStatus;
use rust_decimal_macros::dec;

pub struct NewYork;

fn brackets_single() -> Vec<TaxBracket> {
    build(&[
        (dec!(0.04), Some(8_500)),
        (dec!(0.045), Some(11_700)),
        (dec!(0.0525), Some(13_900)),
        (dec!(0.055), Some(80_650)),
        (dec!(0.06), Some(215_400)),
        (dec!(0.0685), Some(1_077_550)),
        (dec!(0.0965), Some(5_000_000)),
        (dec!(0.103), Some(25_000_000)),
        (dec!(0.109), None),
    ])
}

fn brackets_mfj() -> Vec<TaxBracket> {
    build(&[
        (dec!(0.04), Some(17_150)),
        (dec!(0.045), Some(23_600)),
        (dec!(0.0525), Some(27_900)),
        (dec!(0.055), Some(161_550)),
        (dec!(0.06), Some(323_200)),
        (dec!(0.0685), Some(2_155_350)),
        (dec!(0.0965), Some(5_000_000)),
        (dec!(0.103), Some(25_000_000)),
        (dec!(0.109), None),
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
        FilingStatus::Single => Money::from_dollars(8_000),
        FilingStatus::MarriedFilingSeparately => Money::from_dollars(8_000),
        FilingStatus::HeadOfHousehold => Money::from_dollars(11_200),
        _ => Money::from_dollars(16_050),
    }
}

const DEPENDENT_EXEMPTION: i64 = 1_000;
/// Household credit for modest incomes (flat simplification of the
/// IT-201 table).
const HOUSEHOLD_CREDIT_AGI_LIMIT: i64 = 28_000;
const HOUSEHOLD_CREDIT: i64 = 45;

impl StateModule for NewYork {
    fn state_code(&self) -> &'static str {
        "NY"
    }

    fn form_label(&self) -> &'static str {
        "Form IT-201"
    }

    fn sidebar_label(&self) -> &'static str {
        "New York"
    }

    fn compute(
        &self,
        model: &ReturnModel,
        federal: &FederalResult,
        config: &StateReturnConfig,
        trace: &mut Trace,
    ) -> TaxResult<StateComputeResult> {
        let prefix = "formit201";
        let ratio = states::apportionment_ratio(config)?;
        let status = model.filing_status;

        // NY AGI: federal AGI less Social Security and Treasury interest.
        let federal_agi = trace.rebind(&federal.form1040.line11, format!("{prefix}.federalAgi"));
        let subtractions: Money = federal.form1040.line6b.amount
            + model
                .interest_statements
                .iter()
                .map(|s| s.box3_us_government_interest)
                .sum::<Money>();
        let resident_agi = (federal_agi.amount - subtractions).clamp_zero();
        let agi_amount = match config.residency_type {
            ResidencyType::Nonresident => states::sourced_wages(model, "NY"),
            _ => resident_agi,
        };
        let state_agi = trace.worksheet(
            format!("{prefix}.stateAgi"),
            agi_amount,
            "federal AGI less Social Security and Treasury interest",
            &[&federal_agi],
        );

        // Dependent exemptions reduce income; NY has no personal
        // exemption for the filer.
        let exemptions =
            Money::from_dollars(DEPENDENT_EXEMPTION * model.dependents.len() as i64);
        let deduction = standard_deduction(status);
        let taxable = trace.worksheet(
            format!("{prefix}.taxableIncome"),
            state_agi
                .amount
                .saturating_sub(deduction)
                .saturating_sub(exemptions),
            "state AGI less standard deduction and dependent exemptions",
            &[&state_agi],
        );

        let brackets = if status.is_joint() {
            brackets_mfj()
        } else {
            brackets_single()
        };
        let state_tax = trace.worksheet(
            format!("{prefix}.nyTax"),
            tax_from_brackets(&brackets, taxable.amount),
            "New York bracket tax",
            &[&taxable],
        );

        let household_credit = if state_agi.amount
            <= Money::from_dollars(HOUSEHOLD_CREDIT_AGI_LIMIT)
            && state_agi.amount.is_positive()
        {
            Money::from_dollars(HOUSEHOLD_CREDIT)
        } else {
            Money::ZERO
        };

        let after_credits = state_tax.amount.saturating_sub(household_credit);
        let after_credits = if config.residency_type == ResidencyType::PartYear {
            apportion(after_credits, ratio)
        } else {
            after_credits
        };
        let tax_after_credits = trace.worksheet(
            format!("{prefix}.taxAfterCredits"),
            after_credits,
            "tax less household credit",
            &[&state_tax],
        );

        let withholding = states::withholding_node(model, "NY", prefix, trace);
        let total_payments = trace.rebind(&withholding, format!("{prefix}.totalPayments"));
        let (overpaid, amount_owed) =
            states::reconcile(prefix, &tax_after_credits, &total_payments, trace);

        Ok(StateComputeResult {
            state_code: "NY".to_string(),
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
            detail: StateDetail::NewYork {
                dependent_exemptions: exemptions,
                household_credit,
            },
            disclosures: Vec::new(),
            requires_income_tax_filing: true,
        })
    }
}
