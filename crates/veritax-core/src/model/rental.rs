//! Rental properties (Schedule E) and K-1 passthrough entries.

use crate::money::Money;
use crate::types::Owner;
use serde::{Deserialize, Serialize};

/// Expense categories on Schedule E, lines 5-19.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentalExpenses {
    pub advertising: Money,
    pub auto_and_travel: Money,
    pub cleaning_and_maintenance: Money,
    pub commissions: Money,
    pub insurance: Money,
    pub legal_and_professional: Money,
    pub management_fees: Money,
    pub mortgage_interest: Money,
    pub other_interest: Money,
    pub repairs: Money,
    pub supplies: Money,
    pub taxes: Money,
    pub utilities: Money,
    pub depreciation: Money,
    pub other: Money,
}

impl RentalExpenses {
    pub fn total(&self) -> Money {
        self.advertising
            + self.auto_and_travel
            + self.cleaning_and_maintenance
            + self.commissions
            + self.insurance
            + self.legal_and_professional
            + self.management_fees
            + self.mortgage_interest
            + self.other_interest
            + self.repairs
            + self.supplies
            + self.taxes
            + self.utilities
            + self.depreciation
            + self.other
    }
}

/// A rental property reported on Schedule E Part I.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalProperty {
    pub id: String,
    pub address: String,
    /// Fair-rental days during the year.
    #[serde(default)]
    pub fair_rental_days: u16,
    /// Personal-use days during the year.
    #[serde(default)]
    pub personal_use_days: u16,
    /// Rents received.
    #[serde(default)]
    pub rents_received: Money,
    #[serde(default)]
    pub expenses: RentalExpenses,
    /// Active participation (required for the $25,000 special allowance).
    #[serde(default)]
    pub active_participation: bool,
    /// Elected the QBI rental safe harbor.
    #[serde(default)]
    pub qbi_safe_harbor: bool,
    /// Suspended passive loss carried in from the prior year.
    #[serde(default)]
    pub prior_suspended_loss: Money,
}

/// A Schedule K-1 passthrough entry (1065/1120-S).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct K1Passthrough {
    pub id: String,
    pub entity_name: String,
    #[serde(default)]
    pub entity_ein: String,
    pub owner: Owner,
    /// Box 1: ordinary business income or loss.
    #[serde(default)]
    pub box1_ordinary_income: Money,
    /// Box 2: net rental real estate income or loss.
    #[serde(default)]
    pub box2_rental_income: Money,
    /// Box 5: interest income.
    #[serde(default)]
    pub box5_interest: Money,
    /// Box 6a: ordinary dividends. Treated as non-qualified absent
    /// explicit qualification data; the validator notes this.
    #[serde(default)]
    pub box6a_dividends: Money,
    /// Is the income passive with respect to this filer.
    #[serde(default)]
    pub is_passive: bool,
    /// Qualified business income reported for §199A.
    #[serde(default)]
    pub qbi_income: Option<Money>,
    /// W-2 wages reported for the §199A wage limit.
    #[serde(default)]
    pub qbi_w2_wages: Option<Money>,
    /// Unadjusted basis immediately after acquisition (§199A).
    #[serde(default)]
    pub qbi_ubia: Option<Money>,
    /// Specified service trade or business flag.
    #[serde(default)]
    pub is_sstb: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rental_expense_total() {
        let ex = RentalExpenses {
            mortgage_interest: Money::from_dollars(9_000),
            taxes: Money::from_dollars(4_000),
            depreciation: Money::from_dollars(7_000),
            repairs: Money::from_dollars(1_500),
            ..RentalExpenses::default()
        };
        assert_eq!(ex.total(), Money::from_dollars(21_500));
    }
}
