//! Self-employment businesses (Schedule C) and home-office worksheets.

use crate::money::Money;
use crate::types::Owner;
use serde::{Deserialize, Serialize};

/// Accounting method elected for a business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountingMethod {
    Cash,
    Accrual,
}

/// Home-office deduction method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeOfficeMethod {
    Regular,
    Simplified,
}

/// Expense categories on Schedule C Part II, by line number.
///
/// Every field defaults to zero; absence of a category on the worksheet is
/// the same as a zero entry for these totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessExpenses {
    pub advertising: Money,
    pub car_and_truck: Money,
    pub commissions_and_fees: Money,
    pub contract_labor: Money,
    pub depletion: Money,
    pub depreciation: Money,
    pub employee_benefits: Money,
    pub insurance: Money,
    pub mortgage_interest: Money,
    pub other_interest: Money,
    pub legal_and_professional: Money,
    pub office_expense: Money,
    pub pension_plans: Money,
    pub rent_vehicles_equipment: Money,
    pub rent_other: Money,
    pub repairs: Money,
    pub supplies: Money,
    pub taxes_and_licenses: Money,
    pub travel: Money,
    /// Deducted at 50% on line 24b.
    pub meals: Money,
    pub utilities: Money,
    pub wages: Money,
    pub other: Money,
}

impl BusinessExpenses {
    /// Total deductible expenses; meals enter at 50%.
    pub fn total(&self) -> Money {
        let full = self.advertising
            + self.car_and_truck
            + self.commissions_and_fees
            + self.contract_labor
            + self.depletion
            + self.depreciation
            + self.employee_benefits
            + self.insurance
            + self.mortgage_interest
            + self.other_interest
            + self.legal_and_professional
            + self.office_expense
            + self.pension_plans
            + self.rent_vehicles_equipment
            + self.rent_other
            + self.repairs
            + self.supplies
            + self.taxes_and_licenses
            + self.travel
            + self.utilities
            + self.wages
            + self.other;
        full + self.meals.mul_rational(1, 2, crate::money::Rounding::HalfEven)
    }
}

/// Per-category amounts on the Form 8829 worksheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeOfficeExpenses {
    pub insurance: Money,
    pub rent: Money,
    pub repairs: Money,
    pub utilities: Money,
    pub other: Money,
}

impl HomeOfficeExpenses {
    pub fn total(&self) -> Money {
        self.insurance + self.rent + self.repairs + self.utilities + self.other
    }
}

/// Home-office worksheet attached to a business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeOfficeWorksheet {
    pub method: HomeOfficeMethod,
    /// Square footage used regularly and exclusively for business.
    pub business_area_sqft: u32,
    /// Total square footage of the home.
    pub total_area_sqft: u32,
    /// Expenses that benefit only the business portion.
    #[serde(default)]
    pub direct_expenses: HomeOfficeExpenses,
    /// Expenses for the whole home, prorated by business-use percentage.
    #[serde(default)]
    pub indirect_expenses: HomeOfficeExpenses,
    /// Depreciation attributable to business use (regular method only).
    #[serde(default)]
    pub depreciation: Money,
    /// Mortgage interest allocatable to the home (indirect).
    #[serde(default)]
    pub allocatable_mortgage_interest: Money,
    /// Real-estate taxes allocatable to the home (indirect).
    #[serde(default)]
    pub allocatable_real_estate_taxes: Money,
}

/// A self-employment business reported on Schedule C.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfEmploymentBusiness {
    pub id: String,
    pub name: String,
    /// Principal business code (six digits).
    #[serde(default)]
    pub principal_business_code: String,
    #[serde(default)]
    pub ein: Option<String>,
    pub owner: Owner,
    pub accounting_method: AccountingMethod,
    /// Gross receipts or sales.
    #[serde(default)]
    pub gross_receipts: Money,
    /// Returns and allowances.
    #[serde(default)]
    pub returns_and_allowances: Money,
    /// Cost of goods sold.
    #[serde(default)]
    pub cost_of_goods_sold: Money,
    /// Other income, including finance reserve income.
    #[serde(default)]
    pub other_income: Money,
    #[serde(default)]
    pub expenses: BusinessExpenses,
    /// Specified service trade or business (QBI phase-out).
    #[serde(default)]
    pub is_sstb: bool,
    #[serde(default)]
    pub has_inventory: bool,
    #[serde(default)]
    pub home_office: Option<HomeOfficeWorksheet>,
    /// Self-employed health insurance premiums paid through this business.
    #[serde(default)]
    pub health_insurance_premiums: Money,
    /// SEP/SIMPLE/qualified-plan contributions.
    #[serde(default)]
    pub sep_simple_contributions: Money,
}
