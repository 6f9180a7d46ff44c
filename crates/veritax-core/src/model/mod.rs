//! The return model: everything the engine reads, nothing it writes.

mod business;
mod form1099;
mod hsa;
mod itemized;
mod rental;
mod sales;
mod state_config;
mod w2;

pub use business::{
    AccountingMethod, BusinessExpenses, HomeOfficeExpenses, HomeOfficeMethod, HomeOfficeWorksheet,
    SelfEmploymentBusiness,
};
pub use form1099::{
    DistributionCode, DividendStatement, HsaDistribution, InterestStatement, MarketplaceStatement,
    MiscStatement, RetirementDistribution, SocialSecurityStatement,
};
pub use hsa::{HsaCoverage, HsaInfo, IraContributions};
pub use itemized::{ItemizedWorksheet, MortgageEntry};
pub use rental::{K1Passthrough, RentalExpenses, RentalProperty};
pub use sales::{CapitalLossCarryforward, SaleCategory, SaleTransaction};
pub use state_config::{ResidencyType, StateReturnConfig};
pub use w2::{Box12Entry, W2StateRow, WageStatement};

use crate::money::Money;
use crate::types::{DeductionMethod, Dependent, FilingStatus, Owner, PersonInfo};
use serde::{Deserialize, Serialize};

/// One student's education expenses (Form 8863 input).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationExpense {
    pub student_name: String,
    /// Qualified tuition and related expenses (1098-T box 1).
    pub qualified_expenses: Money,
    /// Eligible for the American Opportunity Credit (first four years,
    /// at least half-time, no felony drug conviction).
    #[serde(default)]
    pub aotc_eligible: bool,
}

/// Residential energy improvements placed in service this year
/// (Form 5695 input).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyImprovements {
    /// Exterior windows and skylights.
    pub windows: Money,
    /// Exterior doors.
    pub doors: Money,
    /// Insulation and air-sealing materials.
    pub insulation: Money,
    /// Heat pumps and heat-pump water heaters.
    pub heat_pumps: Money,
    /// Home energy audit cost.
    pub energy_audit: Money,
}

impl EnergyImprovements {
    pub fn any(&self) -> bool {
        !(self.windows.is_zero()
            && self.doors.is_zero()
            && self.insulation.is_zero()
            && self.heat_pumps.is_zero()
            && self.energy_audit.is_zero())
    }
}

/// Dependent-care expenses (Form 2441 input).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentCareExpenses {
    /// Amounts paid for care of qualifying persons.
    pub expenses_paid: Money,
    /// Number of qualifying persons cared for.
    pub qualifying_persons: u8,
    /// Care provider name.
    #[serde(default)]
    pub provider_name: String,
    /// Care provider TIN.
    #[serde(default)]
    pub provider_tin: String,
}

/// Above-the-line adjustment inputs not tied to another document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentInputs {
    /// Student loan interest paid (1098-E box 1).
    pub student_loan_interest_paid: Money,
    /// Out-of-pocket educator expenses, taxpayer.
    pub educator_expenses: Money,
    /// Out-of-pocket educator expenses, spouse.
    pub spouse_educator_expenses: Money,
}

/// A complete return model for one tax year.
///
/// Constructed by intake; the engine only reads it. Optional sections use
/// `Option` (absence is semantic, not zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnModel {
    pub filing_status: FilingStatus,
    pub taxpayer: PersonInfo,
    #[serde(default)]
    pub spouse: Option<PersonInfo>,
    #[serde(default)]
    pub dependents: Vec<Dependent>,
    pub deduction_method: DeductionMethod,
    #[serde(default)]
    pub itemized: Option<ItemizedWorksheet>,
    /// MFS filers who lived apart from their spouse all year get the
    /// single-filer Social Security thresholds.
    #[serde(default)]
    pub mfs_lived_apart_all_year: bool,

    // ─────────────────────────────────────────────────────────────────────
    // Income documents
    // ─────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub wage_statements: Vec<WageStatement>,
    #[serde(default)]
    pub interest_statements: Vec<InterestStatement>,
    #[serde(default)]
    pub dividend_statements: Vec<DividendStatement>,
    #[serde(default)]
    pub retirement_distributions: Vec<RetirementDistribution>,
    #[serde(default)]
    pub misc_statements: Vec<MiscStatement>,
    #[serde(default)]
    pub social_security_statements: Vec<SocialSecurityStatement>,
    #[serde(default)]
    pub sale_transactions: Vec<SaleTransaction>,
    #[serde(default)]
    pub capital_loss_carryforward: Option<CapitalLossCarryforward>,

    // ─────────────────────────────────────────────────────────────────────
    // Business & rental
    // ─────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub businesses: Vec<SelfEmploymentBusiness>,
    #[serde(default)]
    pub rental_properties: Vec<RentalProperty>,
    #[serde(default)]
    pub k1_passthroughs: Vec<K1Passthrough>,

    // ─────────────────────────────────────────────────────────────────────
    // Healthcare & retirement
    // ─────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub hsa: Option<HsaInfo>,
    #[serde(default)]
    pub hsa_distributions: Vec<HsaDistribution>,
    #[serde(default)]
    pub marketplace_statements: Vec<MarketplaceStatement>,
    #[serde(default)]
    pub ira_contributions: Option<IraContributions>,

    // ─────────────────────────────────────────────────────────────────────
    // Credits & adjustments
    // ─────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub education_expenses: Vec<EducationExpense>,
    #[serde(default)]
    pub energy_improvements: Option<EnergyImprovements>,
    #[serde(default)]
    pub dependent_care: Option<DependentCareExpenses>,
    #[serde(default)]
    pub adjustments: AdjustmentInputs,
    /// Claim foreign tax directly on Schedule 3 without Form 1116
    /// (allowed up to the de-minimis threshold).
    #[serde(default)]
    pub elect_foreign_tax_without_1116: bool,

    // ─────────────────────────────────────────────────────────────────────
    // Payments & states
    // ─────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub estimated_tax_payments: Money,
    #[serde(default)]
    pub state_returns: Vec<StateReturnConfig>,
}

impl ReturnModel {
    /// A minimal single-filer model; tests build richer models from it.
    pub fn single(taxpayer: PersonInfo) -> Self {
        Self {
            filing_status: FilingStatus::Single,
            taxpayer,
            spouse: None,
            dependents: Vec::new(),
            deduction_method: DeductionMethod::Standard,
            itemized: None,
            mfs_lived_apart_all_year: false,
            wage_statements: Vec::new(),
            interest_statements: Vec::new(),
            dividend_statements: Vec::new(),
            retirement_distributions: Vec::new(),
            misc_statements: Vec::new(),
            social_security_statements: Vec::new(),
            sale_transactions: Vec::new(),
            capital_loss_carryforward: None,
            businesses: Vec::new(),
            rental_properties: Vec::new(),
            k1_passthroughs: Vec::new(),
            hsa: None,
            hsa_distributions: Vec::new(),
            marketplace_statements: Vec::new(),
            ira_contributions: None,
            education_expenses: Vec::new(),
            energy_improvements: None,
            dependent_care: None,
            adjustments: AdjustmentInputs::default(),
            elect_foreign_tax_without_1116: false,
            estimated_tax_payments: Money::ZERO,
            state_returns: Vec::new(),
        }
    }

    /// W-2 box 3 Social Security wages for one filer (Schedule SE cap).
    pub fn social_security_wages_for(&self, owner: Owner) -> Money {
        self.wage_statements
            .iter()
            .filter(|w| w.owner == owner)
            .map(|w| w.box3_social_security_wages)
            .sum()
    }

    /// W-2 box 5 Medicare wages across both filers (Form 8959).
    pub fn total_medicare_wages(&self) -> Money {
        self.wage_statements
            .iter()
            .map(|w| w.box5_medicare_wages)
            .sum()
    }

    /// Employer HSA contributions: W-2 box 12 code W across statements.
    pub fn employer_hsa_contributions(&self) -> Money {
        self.wage_statements
            .iter()
            .map(|w| w.box12_amount("W"))
            .sum()
    }

    /// Foreign tax paid across dividend statements.
    pub fn total_foreign_tax_paid(&self) -> Money {
        self.dividend_statements
            .iter()
            .map(|d| d.box7_foreign_tax_paid)
            .sum()
    }

}
