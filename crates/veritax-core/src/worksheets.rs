//! Form 1040 line 16 tax computation: ordinary brackets or the
//! Qualified Dividends and Capital Gain Tax Worksheet.

use crate::money::{Money, Rounding};
use crate::rules::{Rules2025, tax_from_brackets};
use crate::trace::{NodeRef, Trace};
use crate::types::FilingStatus;
use serde::{Deserialize, Serialize};

/// Which method produced line 16.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxMethod {
    Brackets,
    QdcgWorksheet,
}

/// Line 16 plus the method that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxComputation {
    pub method: TaxMethod,
    pub tax: NodeRef,
}

/// Computes tax on `taxable_income`. When any preferential-rate amount
/// (net long-term gain plus qualified dividends) is present, the QDCG
/// worksheet ladder applies; otherwise the ordinary brackets do.
///
/// All arithmetic is carried in cents; line 16 keeps its cents.
pub fn compute_tax(
    trace: &mut Trace,
    rules: &Rules2025,
    status: FilingStatus,
    taxable_income: &NodeRef,
    preferential_amount: &NodeRef,
) -> TaxComputation {
    if preferential_amount.amount.is_positive() && taxable_income.amount.is_positive() {
        qdcg_worksheet(trace, rules, status, taxable_income, preferential_amount)
    } else {
        let tax = tax_from_brackets(rules.brackets(status), taxable_income.amount.clamp_zero());
        let node = trace.worksheet(
            "form1040.line16",
            tax,
            format!("tax brackets ({})", status.code()),
            &[taxable_income],
        );
        TaxComputation {
            method: TaxMethod::Brackets,
            tax: node,
        }
    }
}

fn qdcg_worksheet(
    trace: &mut Trace,
    rules: &Rules2025,
    status: FilingStatus,
    taxable_income: &NodeRef,
    preferential_amount: &NodeRef,
) -> TaxComputation {
    let taxable = taxable_income.amount;
    // The preferential slice cannot exceed taxable income.
    let pref = preferential_amount.amount.min(taxable).clamp_zero();
    let ordinary_part = taxable - pref;

    let zero_ceiling = rules.qdcg_zero_ceiling(status);
    let fifteen_ceiling = rules.qdcg_fifteen_ceiling(status);

    let taxed_at_zero = (taxable.min(zero_ceiling) - ordinary_part)
        .clamp_zero()
        .min(pref);
    let taxed_at_fifteen = (taxable.min(fifteen_ceiling) - ordinary_part - taxed_at_zero)
        .clamp_zero()
        .min(pref - taxed_at_zero);
    let taxed_at_twenty = pref - taxed_at_zero - taxed_at_fifteen;

    let ordinary_tax = tax_from_brackets(rules.brackets(status), ordinary_part);
    let fifteen_tax = taxed_at_fifteen.pct(1_500, Rounding::HalfEven);
    let twenty_tax = taxed_at_twenty.pct(2_000, Rounding::HalfEven);

    // The worksheet never produces more tax than the plain brackets.
    let bracket_tax = tax_from_brackets(rules.brackets(status), taxable);
    let tax = (ordinary_tax + fifteen_tax + twenty_tax).min(bracket_tax);

    let node = trace.worksheet(
        "form1040.line16",
        tax,
        "qualified dividends and capital gain tax worksheet",
        &[taxable_income, preferential_amount],
    );
    TaxComputation {
        method: TaxMethod::QdcgWorksheet,
        tax: node,
    }
}
