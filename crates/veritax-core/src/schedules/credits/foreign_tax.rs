//! Foreign tax credit: direct Schedule 3 claim or Form 1116 limitation.

use crate::model::ReturnModel;
use crate::money::{Money, Rounding};
use crate::rules::Rules2025;
use crate::trace::{NodeRef, Trace};
use serde::{Deserialize, Serialize};

/// How the credit was claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignTaxPath {
    /// Under the de-minimis threshold with the election: no Form 1116.
    Direct,
    /// Form 1116 with the taxable-income ratio limitation.
    Form1116,
}

/// Computed foreign tax credit (non-refundable).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignTaxResult {
    pub path: ForeignTaxPath,
    pub credit: NodeRef,
    /// Foreign tax above the Form 1116 limit (carryover not modeled;
    /// the validator notes it).
    pub disallowed: Money,
}

/// Computes the credit. Foreign-source income is proxied by the dividend
/// income on statements reporting foreign tax paid.
pub fn compute(
    model: &ReturnModel,
    rules: &Rules2025,
    tax_before_credits: &NodeRef,
    taxable_income: &NodeRef,
    trace: &mut Trace,
) -> Option<ForeignTaxResult> {
    let foreign_tax = model.total_foreign_tax_paid();
    if !foreign_tax.is_positive() {
        return None;
    }

    let direct_limit = rules.foreign_tax_direct_limit(model.filing_status);
    if model.elect_foreign_tax_without_1116 && foreign_tax <= direct_limit {
        let credit = trace.input(
            "foreignTax.credit",
            foreign_tax,
            "1099-DIV box 7 totals, direct election",
        );
        return Some(ForeignTaxResult {
            path: ForeignTaxPath::Direct,
            credit,
            disallowed: Money::ZERO,
        });
    }

    // Form 1116: limit = US tax x foreign-source income / taxable income.
    let foreign_income: Money = model
        .dividend_statements
        .iter()
        .filter(|d| d.box7_foreign_tax_paid.is_positive())
        .map(|d| d.box1a_ordinary_dividends)
        .sum();
    let limit = if taxable_income.amount.is_positive() {
        tax_before_credits.amount.mul_rational(
            foreign_income.clamp_zero().as_cents(),
            taxable_income.amount.as_cents(),
            Rounding::HalfEven,
        )
    } else {
        Money::ZERO
    };
    let allowed = foreign_tax.min(limit);

    let credit = trace.worksheet(
        "foreignTax.credit",
        allowed,
        "Form 1116 taxable-income ratio limitation",
        &[tax_before_credits, taxable_income],
    );
    Some(ForeignTaxResult {
        path: ForeignTaxPath::Form1116,
        credit,
        disallowed: foreign_tax - allowed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DividendStatement;
    use crate::types::{Owner, PersonInfo};
    use pretty_assertions::assert_eq;

    fn model_with_foreign(foreign_tax: i64, dividends: i64, elect: bool) -> ReturnModel {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Omar".to_string(),
            last_name: "Farah".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.elect_foreign_tax_without_1116 = elect;
        model.dividend_statements = vec![DividendStatement {
            id: "div-1".to_string(),
            owner: Owner::Taxpayer,
            payer_name: "Global Fund".to_string(),
            payer_tin: "12-0000009".to_string(),
            box1a_ordinary_dividends: Money::from_dollars(dividends),
            box1b_qualified_dividends: Money::ZERO,
            box2a_capital_gain_distributions: Money::ZERO,
            box4_federal_withholding: Money::ZERO,
            box7_foreign_tax_paid: Money::from_dollars(foreign_tax),
            box11_exempt_interest_dividends: Money::ZERO,
        }];
        model
    }

    fn run(model: &ReturnModel, tax: i64, taxable: i64) -> Option<ForeignTaxResult> {
        let rules = Rules2025::new();
        let mut trace = Trace::new();
        let tax_node = trace.literal("tax", Money::from_dollars(tax), "test");
        let ti_node = trace.literal("ti", Money::from_dollars(taxable), "test");
        compute(model, &rules, &tax_node, &ti_node, &mut trace)
    }

    #[test]
    fn test_direct_election_under_limit() {
        let model = model_with_foreign(200, 4_000, true);
        let result = run(&model, 12_000, 80_000).unwrap();
        assert_eq!(result.path, ForeignTaxPath::Direct);
        assert_eq!(result.credit.amount, Money::from_dollars(200));
    }

    #[test]
    fn test_form1116_limitation() {
        let model = model_with_foreign(2_000, 8_000, false);
        // Limit = 12,000 x 8,000 / 80,000 = 1,200.
        let result = run(&model, 12_000, 80_000).unwrap();
        assert_eq!(result.path, ForeignTaxPath::Form1116);
        assert_eq!(result.credit.amount, Money::from_dollars(1_200));
        assert_eq!(result.disallowed, Money::from_dollars(800));
    }

    #[test]
    fn test_over_threshold_forces_1116() {
        let model = model_with_foreign(500, 20_000, true);
        let result = run(&model, 12_000, 80_000).unwrap();
        assert_eq!(result.path, ForeignTaxPath::Form1116);
    }
}
