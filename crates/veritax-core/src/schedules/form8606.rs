//! Form 8606: Nondeductible IRAs (basis recovery on distributions).

use crate::model::ReturnModel;
use crate::money::{Money, Rounding};
use crate::trace::{NodeRef, Trace};
use serde::{Deserialize, Serialize};

/// Computed Form 8606.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form8606Result {
    /// Gross traditional-IRA distributions entering the pro-rata split.
    pub gross_distributions: NodeRef,
    /// Nontaxable portion (recovered basis).
    pub nontaxable_portion: NodeRef,
    /// Taxable portion replacing the box 2a amounts for IRA rows.
    pub taxable_portion: NodeRef,
    /// Basis remaining for future years.
    pub remaining_basis: Money,
}

/// Applies the pro-rata rule when nondeductible basis exists and
/// traditional-IRA distributions were taken. Returns `None` when no basis
/// tracking applies.
pub fn compute(model: &ReturnModel, trace: &mut Trace) -> Option<Form8606Result> {
    let contributions = model.ira_contributions.as_ref()?;
    if !contributions.prior_basis.is_positive() {
        return None;
    }

    let gross: Money = model
        .retirement_distributions
        .iter()
        .filter(|d| d.ira_or_sep && !d.is_rollover())
        .map(|d| d.box1_gross)
        .sum();
    if !gross.is_positive() {
        return None;
    }

    let gross_distributions = trace.input(
        "form8606.grossDistributions",
        gross,
        "1099-R box 1, IRA/SEP rows",
    );

    // Pro-rata: basis / (year-end value + distributions) of each dollar
    // comes out untaxed.
    let basis = contributions.prior_basis;
    let denominator = contributions.year_end_value + gross;
    let nontaxable = if denominator.is_positive() {
        gross
            .mul_rational(basis.as_cents(), denominator.as_cents(), Rounding::HalfEven)
            .min(basis)
    } else {
        basis.min(gross)
    };

    let nontaxable_portion = trace.worksheet(
        "form8606.nontaxablePortion",
        nontaxable,
        "pro-rata basis recovery",
        &[&gross_distributions],
    );
    let taxable_portion = trace.sub(
        "form8606.taxablePortion",
        &gross_distributions,
        &nontaxable_portion,
    );

    Some(Form8606Result {
        gross_distributions,
        nontaxable_portion,
        taxable_portion,
        remaining_basis: basis - nontaxable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DistributionCode, IraContributions, RetirementDistribution};
    use crate::types::{Owner, PersonInfo};
    use pretty_assertions::assert_eq;

    fn model(basis: i64, year_end: i64, gross: i64) -> ReturnModel {
        let mut m = ReturnModel::single(PersonInfo {
            first_name: "Lee".to_string(),
            last_name: "Santos".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        m.ira_contributions = Some(IraContributions {
            prior_basis: Money::from_dollars(basis),
            year_end_value: Money::from_dollars(year_end),
            ..IraContributions::default()
        });
        m.retirement_distributions = vec![RetirementDistribution {
            id: "r-1".to_string(),
            owner: Owner::Taxpayer,
            payer_name: "Custodian".to_string(),
            box1_gross: Money::from_dollars(gross),
            box2a_taxable: None,
            taxable_not_determined: true,
            total_distribution: false,
            box4_federal_withholding: Money::ZERO,
            box7_code: DistributionCode::Normal,
            ira_or_sep: true,
        }];
        m
    }

    #[test]
    fn test_pro_rata_split() {
        // Basis 6,000, year-end 54,000, distribution 6,000:
        // 10% of each dollar is basis -> $600 nontaxable.
        let m = model(6_000, 54_000, 6_000);
        let mut trace = Trace::new();
        let result = compute(&m, &mut trace).unwrap();
        assert_eq!(result.nontaxable_portion.amount, Money::from_dollars(600));
        assert_eq!(result.taxable_portion.amount, Money::from_dollars(5_400));
        assert_eq!(result.remaining_basis, Money::from_dollars(5_400));
    }

    #[test]
    fn test_full_liquidation_recovers_all_basis() {
        let m = model(6_000, 0, 20_000);
        let mut trace = Trace::new();
        let result = compute(&m, &mut trace).unwrap();
        assert_eq!(result.nontaxable_portion.amount, Money::from_dollars(6_000));
        assert_eq!(result.taxable_portion.amount, Money::from_dollars(14_000));
        assert_eq!(result.remaining_basis, Money::ZERO);
    }

    #[test]
    fn test_absent_without_basis() {
        let m = model(0, 0, 20_000);
        let mut trace = Trace::new();
        assert!(compute(&m, &mut trace).is_none());
    }
}
