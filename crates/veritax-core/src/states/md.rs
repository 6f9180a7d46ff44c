//! Maryland: Form 502, with county piggyback tax and reciprocity.

use crate::error::TaxResult;
use crate::model::{ResidencyType, ReturnModel, StateReturnConfig};
use crate::money::{Money, Rounding};
use crate::result::FederalResult;
use crate::rules::{TaxBracket, tax_from_brackets};
use crate::states::{self, StateComputeResult, StateDetail, StateModule, apportion};
use crate::trace::Trace;
use rust_decimal_macros::dec;

pub struct Maryland;

fn brackets_single() -> Vec<TaxBracket> {
    build(&[
        (dec!(0.02), Some(1_000)),
        (dec!(0.03), Some(2_000)),
        (dec!(0.04), Some(3_000)),
        (dec!(0.0475), Some(100_000)),
        (dec!(0.05), Some(125_000)),
        (dec!(0.0525), Some(150_000)),
        (dec!(0.055), Some(250_000)),
        (dec!(0.0575), None),
    ])
}

fn brackets_mfj() -> Vec<TaxBracket> {
    build(&[
        (dec!(0.02), Some(1_000)),
        (dec!(0.03), Some(2_000)),
        (dec!(0.04), Some(3_000)),
        (dec!(0.0475), Some(150_000)),
        (dec!(0.05), Some(175_000)),
        (dec!(0.0525), Some(225_000)),
        (dec!(0.055), Some(300_000)),
        (dec!(0.0575), None),
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

const PERSONAL_EXEMPTION: i64 = 3_200;
/// Default county rate when the model does not name one (basis points).
const DEFAULT_COUNTY_RATE_BPS: i64 = 320;

/// Home states covered by the wage reciprocity agreement.
const RECIPROCITY_STATES: &[&str] = &["VA", "DC", "PA", "WV"];

impl StateModule for Maryland {
    fn state_code(&self) -> &'static str {
        "MD"
    }

    fn form_label(&self) -> &'static str {
        "Form 502"
    }

    fn sidebar_label(&self) -> &'static str {
        "Maryland"
    }

    fn compute(
        &self,
        model: &ReturnModel,
        federal: &FederalResult,
        config: &StateReturnConfig,
        trace: &mut Trace,
    ) -> TaxResult<StateComputeResult> {
        let prefix = "form502";
        let ratio = states::apportionment_ratio(config)?;
        let status = model.filing_status;
        let mut disclosures = Vec::new();

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
                ResidencyType::Nonresident => states::sourced_wages(model, "MD"),
                _ => resident_agi,
            }
        };
        let state_agi = trace.worksheet(
            format!("{prefix}.stateAgi"),
            agi_amount,
            "federal AGI less Social Security and Treasury interest",
            &[&federal_agi],
        );

        // Maryland standard deduction: 15% of AGI inside a status band.
        let (min_ded, max_ded) = if status.is_joint() {
            (Money::from_dollars(3_650), Money::from_dollars(5_450))
        } else {
            (Money::from_dollars(1_800), Money::from_dollars(2_700))
        };
        let deduction = state_agi
            .amount
            .pct(1_500, Rounding::HalfEven)
            .clamp(min_ded, max_ded);

        let mut exemptions = Money::from_dollars(PERSONAL_EXEMPTION);
        if status.is_joint() {
            exemptions += Money::from_dollars(PERSONAL_EXEMPTION);
        }
        exemptions += Money::from_dollars(PERSONAL_EXEMPTION * model.dependents.len() as i64);

        let taxable = trace.worksheet(
            format!("{prefix}.taxableIncome"),
            state_agi
                .amount
                .saturating_sub(deduction)
                .saturating_sub(exemptions),
            "state AGI less standard deduction and exemptions",
            &[&state_agi],
        );

        let brackets = if status.is_joint() {
            brackets_mfj()
        } else {
            brackets_single()
        };
        let state_rate_tax = tax_from_brackets(&brackets, taxable.amount);

        // County piggyback tax on the same taxable income.
        let county_bps = config
            .state_specific
            .get("county_rate_bps")
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(DEFAULT_COUNTY_RATE_BPS);
        let county_tax = taxable.amount.pct(county_bps, Rounding::HalfEven);

        let state_tax = trace.worksheet(
            format!("{prefix}.mdTax"),
            state_rate_tax + county_tax,
            "Maryland bracket tax plus county tax",
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

        let withholding = states::withholding_node(model, "MD", prefix, trace);
        let total_payments = trace.rebind(&withholding, format!("{prefix}.totalPayments"));
        let (overpaid, amount_owed) =
            states::reconcile(prefix, &tax_after_credits, &total_payments, trace);

        if reciprocity_applied && withholding.amount.is_positive() {
            disclosures.push(format!(
                "Maryland withholding refunds in full under the {home_state} reciprocity agreement"
            ));
        }

        Ok(StateComputeResult {
            state_code: "MD".to_string(),
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
            detail: StateDetail::Maryland {
                county_tax,
                reciprocity_applied,
            },
            disclosures,
            requires_income_tax_filing: !reciprocity_applied,
        })
    }
}
