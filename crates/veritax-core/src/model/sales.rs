//! Broker sale transactions (1099-B rows) for Form 8949 / Schedule D.

use crate::money::Money;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Form 8949 reporting category.
///
/// A/B/C are short-term, D/E/F long-term; the letter also encodes whether
/// the broker reported basis to the IRS (A/D yes, B/E no, C/F no 1099-B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SaleCategory {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl SaleCategory {
    pub fn is_long_term(&self) -> bool {
        matches!(self, SaleCategory::D | SaleCategory::E | SaleCategory::F)
    }

    pub fn all() -> &'static [SaleCategory] {
        &[
            SaleCategory::A,
            SaleCategory::B,
            SaleCategory::C,
            SaleCategory::D,
            SaleCategory::E,
            SaleCategory::F,
        ]
    }
}

impl std::fmt::Display for SaleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            SaleCategory::A => "A",
            SaleCategory::B => "B",
            SaleCategory::C => "C",
            SaleCategory::D => "D",
            SaleCategory::E => "E",
            SaleCategory::F => "F",
        };
        write!(f, "{letter}")
    }
}

/// One sold lot from a broker statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleTransaction {
    pub id: String,
    /// Security description ("100 sh XYZ").
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub acquired_date: Option<NaiveDate>,
    #[serde(default)]
    pub sold_date: Option<NaiveDate>,
    /// Proceeds (1099-B box 1d).
    pub proceeds: Money,
    /// Basis as reported to the IRS by the broker (1099-B box 1e).
    #[serde(default)]
    pub reported_basis: Money,
    /// Adjusted basis when it differs from the reported basis
    /// (e.g. RSU vests where the broker reported zero).
    #[serde(default)]
    pub adjusted_basis: Option<Money>,
    /// Long-term flag per the broker (controls the category row).
    pub long_term: bool,
    /// Form 8949 category.
    pub category: SaleCategory,
    /// Adjustment code (column f), e.g. "B" for basis corrections,
    /// "W" for wash sales.
    #[serde(default)]
    pub adjustment_code: Option<String>,
    /// Adjustment amount (column g). Basis-increase adjustments are
    /// positive here and subtract from gain.
    #[serde(default)]
    pub adjustment_amount: Money,
    /// Wash-sale loss disallowed (1099-B box 1g).
    #[serde(default)]
    pub wash_sale_loss_disallowed: Money,
    /// Optional link back to the RSU vest that produced the shares.
    #[serde(default)]
    pub rsu_vest_ref: Option<String>,
}

impl SaleTransaction {
    /// Gain or loss for this row:
    /// `proceeds − (reported basis + adjustment) − wash-sale disallowed`,
    /// clamped to zero when the disallowed amount exactly offsets the raw
    /// loss (a wash sale cannot manufacture a gain from that row).
    pub fn gain_loss(&self) -> Money {
        let raw = self.proceeds - (self.reported_basis + self.adjustment_amount);
        if self.wash_sale_loss_disallowed.is_zero() {
            return raw;
        }
        let adjusted = raw + self.wash_sale_loss_disallowed;
        if raw.is_negative() && adjusted >= Money::ZERO {
            // The disallowed amount fully offsets the loss.
            Money::ZERO
        } else {
            adjusted
        }
    }
}

/// Prior-year capital-loss carryforward, split short/long-term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalLossCarryforward {
    /// Short-term carryforward, stored as a positive loss amount.
    #[serde(default)]
    pub short_term: Money,
    /// Long-term carryforward, stored as a positive loss amount.
    #[serde(default)]
    pub long_term: Money,
}
