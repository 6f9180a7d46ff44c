//! 1099-series and SSA-1099 information statements.

use crate::money::Money;
use crate::types::Owner;
use serde::{Deserialize, Serialize};

fn default_owner() -> Owner {
    Owner::Taxpayer
}

/// Form 1099-INT: Interest Income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestStatement {
    pub id: String,
    #[serde(default = "default_owner")]
    pub owner: Owner,
    #[serde(default)]
    pub payer_name: String,
    #[serde(default)]
    pub payer_tin: String,
    /// Box 1: taxable interest.
    #[serde(default)]
    pub box1_interest: Money,
    /// Box 2: early withdrawal penalty.
    #[serde(default)]
    pub box2_early_withdrawal_penalty: Money,
    /// Box 3: interest on US savings bonds and Treasury obligations.
    #[serde(default)]
    pub box3_us_government_interest: Money,
    /// Box 4: federal income tax withheld.
    #[serde(default)]
    pub box4_federal_withholding: Money,
    /// Box 8: tax-exempt interest.
    #[serde(default)]
    pub box8_tax_exempt_interest: Money,
}

impl InterestStatement {
    /// Taxable interest for Form 1040 line 2b (boxes 1 and 3).
    pub fn taxable_interest(&self) -> Money {
        self.box1_interest + self.box3_us_government_interest
    }
}

/// Form 1099-DIV: Dividends and Distributions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendStatement {
    pub id: String,
    #[serde(default = "default_owner")]
    pub owner: Owner,
    #[serde(default)]
    pub payer_name: String,
    #[serde(default)]
    pub payer_tin: String,
    /// Box 1a: total ordinary dividends.
    #[serde(default)]
    pub box1a_ordinary_dividends: Money,
    /// Box 1b: qualified dividends.
    #[serde(default)]
    pub box1b_qualified_dividends: Money,
    /// Box 2a: total capital gain distributions.
    #[serde(default)]
    pub box2a_capital_gain_distributions: Money,
    /// Box 4: federal income tax withheld.
    #[serde(default)]
    pub box4_federal_withholding: Money,
    /// Box 7: foreign tax paid.
    #[serde(default)]
    pub box7_foreign_tax_paid: Money,
    /// Box 11: exempt-interest dividends.
    #[serde(default)]
    pub box11_exempt_interest_dividends: Money,
}

/// Distribution code from 1099-R box 7.
///
/// Only the codes the engine branches on are named; everything else is
/// carried through as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionCode {
    /// Code 1: early distribution, no known exception.
    EarlyNoException,
    /// Code 2: early distribution, exception applies.
    EarlyWithException,
    /// Code 4: death.
    Death,
    /// Code 7: normal distribution.
    Normal,
    /// Code G: direct rollover.
    DirectRollover,
    Other,
}

/// Form 1099-R: Distributions from Pensions, Annuities, IRAs, etc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementDistribution {
    pub id: String,
    #[serde(default = "default_owner")]
    pub owner: Owner,
    #[serde(default)]
    pub payer_name: String,
    /// Box 1: gross distribution.
    #[serde(default)]
    pub box1_gross: Money,
    /// Box 2a: taxable amount, when the payer determined it.
    #[serde(default)]
    pub box2a_taxable: Option<Money>,
    /// Box 2b: taxable amount not determined.
    #[serde(default)]
    pub taxable_not_determined: bool,
    /// Box 2b: total distribution.
    #[serde(default)]
    pub total_distribution: bool,
    /// Box 4: federal income tax withheld.
    #[serde(default)]
    pub box4_federal_withholding: Money,
    /// Box 7: distribution code.
    pub box7_code: DistributionCode,
    /// Box 7: IRA/SEP/SIMPLE checkbox.
    #[serde(default)]
    pub ira_or_sep: bool,
}

impl RetirementDistribution {
    /// The taxable amount the engine uses when no basis tracking applies:
    /// box 2a when determined, otherwise the full gross amount.
    pub fn default_taxable(&self) -> Money {
        match self.box2a_taxable {
            Some(taxable) if !self.taxable_not_determined => taxable,
            _ => self.box1_gross,
        }
    }

    /// Rollovers are not income.
    pub fn is_rollover(&self) -> bool {
        matches!(self.box7_code, DistributionCode::DirectRollover)
    }
}

/// Form 1099-MISC: Miscellaneous Information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiscStatement {
    pub id: String,
    #[serde(default = "default_owner")]
    pub owner: Owner,
    #[serde(default)]
    pub payer_name: String,
    /// Box 1: rents.
    #[serde(default)]
    pub box1_rents: Money,
    /// Box 2: royalties.
    #[serde(default)]
    pub box2_royalties: Money,
    /// Box 3: other income.
    #[serde(default)]
    pub box3_other_income: Money,
    /// Box 4: federal income tax withheld.
    #[serde(default)]
    pub box4_federal_withholding: Money,
}

/// Form SSA-1099: Social Security Benefit Statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurityStatement {
    pub id: String,
    #[serde(default = "default_owner")]
    pub owner: Owner,
    /// Box 3: benefits paid.
    #[serde(default)]
    pub box3_benefits_paid: Money,
    /// Box 4: benefits repaid.
    #[serde(default)]
    pub box4_benefits_repaid: Money,
    /// Box 5: net benefits (box 3 minus box 4, as printed).
    #[serde(default)]
    pub box5_net_benefits: Money,
    /// Federal income tax withheld (from the "voluntary withholding" box).
    #[serde(default)]
    pub federal_withholding: Money,
}

/// Form 1099-SA: Distributions From an HSA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsaDistribution {
    pub id: String,
    #[serde(default = "default_owner")]
    pub owner: Owner,
    /// Box 1: gross distribution.
    #[serde(default)]
    pub box1_gross_distribution: Money,
}

/// Form 1095-A: Health Insurance Marketplace Statement (annual totals).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceStatement {
    pub id: String,
    /// Column A total: annual enrollment premiums.
    #[serde(default)]
    pub annual_premium: Money,
    /// Column B total: annual second-lowest-cost silver plan premium.
    #[serde(default)]
    pub annual_slcsp_premium: Money,
    /// Column C total: annual advance payment of the premium tax credit.
    #[serde(default)]
    pub annual_advance_ptc: Money,
}
