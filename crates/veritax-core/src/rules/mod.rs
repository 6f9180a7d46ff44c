//! Tax-year constants, brackets, phase-outs, and limits.

mod y2025;

pub use y2025::Rules2025;

use crate::money::{Money, Rounding};
use crate::types::FilingStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single tax bracket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Tax rate as a decimal (e.g., 0.10 for 10%).
    pub rate: Decimal,
    /// Minimum taxable income for this bracket.
    pub min: Money,
    /// Maximum taxable income for this bracket (None = no upper limit).
    pub max: Option<Money>,
}

/// Walks a bracket table and returns the tax on `taxable_income`,
/// carried in cents.
pub fn tax_from_brackets(brackets: &[TaxBracket], taxable_income: Money) -> Money {
    let mut total_tax = Money::ZERO;
    let mut prev_max = Money::ZERO;

    for bracket in brackets {
        if taxable_income <= prev_max {
            break;
        }

        let bracket_income = match bracket.max {
            Some(max) => taxable_income.min(max) - prev_max,
            None => taxable_income - prev_max,
        };

        if bracket_income.is_positive() {
            total_tax += bracket_income.mul_rate(bracket.rate, Rounding::HalfEven);
        }

        prev_max = bracket.max.unwrap_or(taxable_income);
    }

    total_tax
}

/// An amount that varies by filing status. Qualifying surviving spouse
/// always takes the joint amount.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ByStatus {
    pub single: Money,
    pub mfj: Money,
    pub mfs: Money,
    pub hoh: Money,
}

impl ByStatus {
    pub fn get(&self, status: FilingStatus) -> Money {
        match status {
            FilingStatus::Single => self.single,
            FilingStatus::MarriedFilingJointly | FilingStatus::QualifyingSurvivingSpouse => {
                self.mfj
            }
            FilingStatus::MarriedFilingSeparately => self.mfs,
            FilingStatus::HeadOfHousehold => self.hoh,
        }
    }

    /// Same amount for every status.
    pub const fn flat(amount: Money) -> Self {
        Self {
            single: amount,
            mfj: amount,
            mfs: amount,
            hoh: amount,
        }
    }
}

/// Phase-out configuration for credits/deductions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseOut {
    /// AGI threshold where the phase-out begins, by status.
    pub threshold: ByStatus,
    /// Rate at which the benefit reduces (e.g., 0.05 = $50 per $1,000).
    pub rate: Decimal,
}

impl PhaseOut {
    /// The reduction for the given status and AGI, unrounded.
    pub fn reduction(&self, status: FilingStatus, agi: Money) -> Money {
        let excess = agi.saturating_sub(self.threshold.get(status));
        excess.mul_rate(self.rate, Rounding::HalfEven)
    }
}

/// A linear phase-out across a MAGI range: full benefit at or below the
/// floor, nothing at or above the ceiling, straight-line in between.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhaseOutRange {
    pub floor: Money,
    pub ceiling: Money,
}

impl PhaseOutRange {
    /// The surviving fraction of `benefit` for the given MAGI.
    pub fn apply(&self, benefit: Money, magi: Money) -> Money {
        if magi <= self.floor {
            return benefit;
        }
        if magi >= self.ceiling {
            return Money::ZERO;
        }
        let range = self.ceiling - self.floor;
        let remaining = self.ceiling - magi;
        benefit.mul_rational(remaining.as_cents(), range.as_cents(), Rounding::HalfEven)
    }
}
