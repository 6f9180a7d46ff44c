//! Form 8829: Expenses for Business Use of Your Home.

use crate::model::{HomeOfficeMethod, HomeOfficeWorksheet};
use crate::money::{Money, Rounding};
use crate::trace::{NodeRef, Trace};
use serde::{Deserialize, Serialize};

/// Simplified-method rate: $5 per square foot.
const SIMPLIFIED_RATE_PER_SQFT: i64 = 5;
/// Simplified-method area cap.
const SIMPLIFIED_SQFT_CAP: u32 = 300;

/// Computed home-office deduction for one business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form8829Result {
    pub method: HomeOfficeMethod,
    /// Business-use percentage in basis points (regular method).
    pub business_use_bps: i64,
    /// The allowed deduction, limited to profit before the deduction.
    pub deduction: NodeRef,
    /// Disallowed amount carried to next year (regular method only).
    pub carryforward: Money,
}

/// Computes the home-office deduction, limited to `profit_before`,
/// the tentative profit before this deduction.
pub fn compute(
    worksheet: &HomeOfficeWorksheet,
    business_id: &str,
    profit_before: &NodeRef,
    trace: &mut Trace,
) -> Form8829Result {
    let prefix = format!("form8829.{business_id}");
    let limit = profit_before.amount.clamp_zero();

    match worksheet.method {
        HomeOfficeMethod::Simplified => {
            let sqft = worksheet.business_area_sqft.min(SIMPLIFIED_SQFT_CAP);
            let tentative = Money::from_dollars(sqft as i64 * SIMPLIFIED_RATE_PER_SQFT);
            let deduction = trace.worksheet(
                format!("{prefix}.deduction"),
                tentative.min(limit),
                format!("simplified method: {sqft} sq ft x $5, limited to profit"),
                &[profit_before],
            );
            Form8829Result {
                method: HomeOfficeMethod::Simplified,
                business_use_bps: 0,
                deduction,
                // The simplified method has no carryforward.
                carryforward: Money::ZERO,
            }
        }
        HomeOfficeMethod::Regular => {
            let bps = if worksheet.total_area_sqft == 0 {
                0
            } else {
                (worksheet.business_area_sqft as i64 * 10_000)
                    / worksheet.total_area_sqft as i64
            };

            let indirect_total = worksheet.indirect_expenses.total()
                + worksheet.allocatable_mortgage_interest
                + worksheet.allocatable_real_estate_taxes;
            let indirect_share = indirect_total.pct(bps, Rounding::HalfEven);
            let direct = worksheet.direct_expenses.total();
            let depreciation = worksheet.depreciation;

            let tentative = direct + indirect_share + depreciation;
            let allowed = tentative.min(limit);
            let carryforward = tentative - allowed;

            let deduction = trace.worksheet(
                format!("{prefix}.deduction"),
                allowed,
                format!(
                    "regular method: direct + {}% of indirect + depreciation, limited to profit",
                    bps / 100
                ),
                &[profit_before],
            );
            Form8829Result {
                method: HomeOfficeMethod::Regular,
                business_use_bps: bps,
                deduction,
                carryforward,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HomeOfficeExpenses;
    use pretty_assertions::assert_eq;

    fn regular_worksheet() -> HomeOfficeWorksheet {
        HomeOfficeWorksheet {
            method: HomeOfficeMethod::Regular,
            business_area_sqft: 200,
            total_area_sqft: 2_000,
            direct_expenses: HomeOfficeExpenses {
                repairs: Money::from_dollars(500),
                ..HomeOfficeExpenses::default()
            },
            indirect_expenses: HomeOfficeExpenses {
                utilities: Money::from_dollars(3_000),
                ..HomeOfficeExpenses::default()
            },
            depreciation: Money::from_dollars(400),
            allocatable_mortgage_interest: Money::from_dollars(8_000),
            allocatable_real_estate_taxes: Money::from_dollars(5_000),
        }
    }

    #[test]
    fn test_regular_method_proration() {
        let mut trace = Trace::new();
        let profit = trace.literal("profit", Money::from_dollars(50_000), "test");
        let result = compute(&regular_worksheet(), "biz0", &profit, &mut trace);

        // 10% business use: direct 500 + 10% of 16,000 + 400 = 2,500.
        assert_eq!(result.business_use_bps, 1_000);
        assert_eq!(result.deduction.amount, Money::from_dollars(2_500));
        assert_eq!(result.carryforward, Money::ZERO);
    }

    #[test]
    fn test_regular_method_limited_to_profit() {
        let mut trace = Trace::new();
        let profit = trace.literal("profit", Money::from_dollars(1_000), "test");
        let result = compute(&regular_worksheet(), "biz0", &profit, &mut trace);

        assert_eq!(result.deduction.amount, Money::from_dollars(1_000));
        assert_eq!(result.carryforward, Money::from_dollars(1_500));
    }

    #[test]
    fn test_simplified_caps_at_300_sqft() {
        let worksheet = HomeOfficeWorksheet {
            method: HomeOfficeMethod::Simplified,
            business_area_sqft: 450,
            total_area_sqft: 2_000,
            direct_expenses: HomeOfficeExpenses::default(),
            indirect_expenses: HomeOfficeExpenses::default(),
            depreciation: Money::ZERO,
            allocatable_mortgage_interest: Money::ZERO,
            allocatable_real_estate_taxes: Money::ZERO,
        };
        let mut trace = Trace::new();
        let profit = trace.literal("profit", Money::from_dollars(50_000), "test");
        let result = compute(&worksheet, "biz0", &profit, &mut trace);
        assert_eq!(result.deduction.amount, Money::from_dollars(1_500));
    }
}
