//! Form W-2: Wage and Tax Statement.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A wage statement received from one employer.
///
/// Box numbers correspond to the official IRS W-2 form. The engine reads
/// this structure; it never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageStatement {
    /// Unique identifier for this statement (source-document id).
    pub id: String,

    /// Which filer the wages belong to.
    #[serde(default = "default_owner")]
    pub owner: crate::types::Owner,

    /// Box c: employer name.
    #[serde(default)]
    pub employer_name: String,

    /// Box b: Employer Identification Number.
    #[serde(default)]
    pub employer_ein: String,

    /// Box 1: wages, tips, other compensation.
    #[serde(default)]
    pub box1_wages: Money,

    /// Box 2: federal income tax withheld.
    #[serde(default)]
    pub box2_federal_withholding: Money,

    /// Box 3: Social Security wages.
    #[serde(default)]
    pub box3_social_security_wages: Money,

    /// Box 4: Social Security tax withheld.
    #[serde(default)]
    pub box4_social_security_withheld: Money,

    /// Box 5: Medicare wages and tips.
    #[serde(default)]
    pub box5_medicare_wages: Money,

    /// Box 6: Medicare tax withheld.
    #[serde(default)]
    pub box6_medicare_withheld: Money,

    /// Box 12: coded amounts (elective deferrals, HSA, ...).
    #[serde(default)]
    pub box12: Vec<Box12Entry>,

    /// Box 13: retirement-plan checkbox.
    #[serde(default)]
    pub retirement_plan: bool,

    /// Box 13: third-party sick pay checkbox.
    #[serde(default)]
    pub third_party_sick_pay: bool,

    /// Boxes 15-17: state rows.
    #[serde(default)]
    pub state_rows: Vec<W2StateRow>,
}

fn default_owner() -> crate::types::Owner {
    crate::types::Owner::Taxpayer
}

/// A Box 12 code and amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Box12Entry {
    /// The letter code (A-HH). Code W is employer HSA contributions;
    /// codes D/E/F/G/S/AA/BB/EE are retirement deferrals.
    pub code: String,
    pub amount: Money,
}

/// One state's boxes 15-17 on a W-2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct W2StateRow {
    /// Box 15: two-letter state code.
    pub box15_state: String,
    /// Box 16: state wages.
    #[serde(default)]
    pub box16_state_wages: Money,
    /// Box 17: state income tax withheld.
    #[serde(default)]
    pub box17_state_withholding: Money,
}

impl WageStatement {
    /// Sum of Box 12 amounts carrying the given code.
    pub fn box12_amount(&self, code: &str) -> Money {
        self.box12
            .iter()
            .filter(|e| e.code == code)
            .map(|e| e.amount)
            .sum()
    }

    /// Total retirement elective deferrals (saver's credit base).
    pub fn retirement_deferrals(&self) -> Money {
        ["D", "E", "F", "G", "S", "AA", "BB", "EE"]
            .iter()
            .map(|code| self.box12_amount(code))
            .sum()
    }

    /// State income tax withheld for the given state code.
    pub fn state_withholding_for(&self, state_code: &str) -> Money {
        self.state_rows
            .iter()
            .filter(|r| r.box15_state == state_code)
            .map(|r| r.box17_state_withholding)
            .sum()
    }

    /// State wages reported for the given state code.
    pub fn state_wages_for(&self, state_code: &str) -> Money {
        self.state_rows
            .iter()
            .filter(|r| r.box15_state == state_code)
            .map(|r| r.box16_state_wages)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Owner;
    use pretty_assertions::assert_eq;

    fn sample_w2() -> WageStatement {
        WageStatement {
            id: "w2-001".to_string(),
            owner: Owner::Taxpayer,
            employer_name: "Acme Corp".to_string(),
            employer_ein: "12-3456789".to_string(),
            box1_wages: Money::from_dollars(75_000),
            box2_federal_withholding: Money::from_dollars(8_000),
            box3_social_security_wages: Money::from_dollars(75_000),
            box4_social_security_withheld: Money::from_cents(465_000),
            box5_medicare_wages: Money::from_dollars(75_000),
            box6_medicare_withheld: Money::from_cents(108_750),
            box12: vec![
                Box12Entry {
                    code: "D".to_string(),
                    amount: Money::from_dollars(6_000),
                },
                Box12Entry {
                    code: "W".to_string(),
                    amount: Money::from_dollars(1_000),
                },
            ],
            retirement_plan: true,
            third_party_sick_pay: false,
            state_rows: vec![W2StateRow {
                box15_state: "CA".to_string(),
                box16_state_wages: Money::from_dollars(75_000),
                box17_state_withholding: Money::from_dollars(5_000),
            }],
        }
    }

    #[test]
    fn test_box12_lookup() {
        let w2 = sample_w2();
        assert_eq!(w2.box12_amount("W"), Money::from_dollars(1_000));
        assert_eq!(w2.box12_amount("DD"), Money::ZERO);
        assert_eq!(w2.retirement_deferrals(), Money::from_dollars(6_000));
    }

    #[test]
    fn test_state_withholding_filter() {
        let w2 = sample_w2();
        assert_eq!(w2.state_withholding_for("CA"), Money::from_dollars(5_000));
        assert_eq!(w2.state_withholding_for("NY"), Money::ZERO);
    }
}
