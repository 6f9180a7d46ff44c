//! Currency type with IRS-compliant rounding rules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Rounding convention for a rate or worksheet application.
///
/// Per-form precision rules differ (the tax tables truncate to whole
/// dollars, Social Security taxability rounds at output only, Schedule SE
/// intermediates use banker's rounding), so the convention is an explicit
/// argument rather than a global policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Round half to even, to the nearest cent.
    HalfEven,
    /// Round half away from zero, to the nearest cent.
    HalfUp,
    /// Truncate toward zero, to the nearest cent.
    Truncate,
}

/// A USD amount in signed integer cents.
///
/// No floating point appears in any computation. Rates multiply through
/// `mul_rational` / `pct` (exact integer arithmetic with an explicit
/// [`Rounding`]) or `mul_rate` (a `rust_decimal` rate applied to the cent
/// value, again with explicit rounding).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero dollars.
    pub const ZERO: Money = Money(0);

    /// Create from cents.
    ///
    /// # Example
    /// ```
    /// use veritax_core::money::Money;
    /// let amount = Money::from_cents(12345); // $123.45
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create from whole dollars.
    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    /// Returns the amount in cents.
    pub const fn as_cents(&self) -> i64 {
        self.0
    }

    /// Returns the amount as an exact `Decimal` in dollars.
    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns true if the amount is zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is strictly negative.
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns true if the amount is strictly positive.
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Returns the absolute value.
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Returns the minimum of two amounts.
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// Returns the maximum of two amounts.
    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }

    /// Clamps negative amounts to zero.
    pub fn clamp_zero(self) -> Self {
        Self(self.0.max(0))
    }

    /// Saturating subtraction: returns zero if the result would be negative.
    pub fn saturating_sub(self, other: Self) -> Self {
        (self - other).clamp_zero()
    }

    /// Multiplies by the rational `numerator / denominator`.
    ///
    /// The intermediate product is carried in `i128`, so no overflow is
    /// reachable from cent-scale inputs. A zero denominator is a
    /// programming defect.
    pub fn mul_rational(self, numerator: i64, denominator: i64, rounding: Rounding) -> Self {
        assert!(denominator > 0, "mul_rational: non-positive denominator");
        let num = self.0 as i128 * numerator as i128;
        let den = denominator as i128;
        Self(div_rounded(num, den, rounding))
    }

    /// Multiplies by a rate expressed in basis points (1 bp = 0.01%).
    pub fn pct(self, basis_points: i64, rounding: Rounding) -> Self {
        self.mul_rational(basis_points, 10_000, rounding)
    }

    /// Multiplies by a `Decimal` rate (e.g. a bracket rate).
    pub fn mul_rate(self, rate: Decimal, rounding: Rounding) -> Self {
        let strategy = match rounding {
            Rounding::HalfEven => rust_decimal::RoundingStrategy::MidpointNearestEven,
            Rounding::HalfUp => rust_decimal::RoundingStrategy::MidpointAwayFromZero,
            Rounding::Truncate => rust_decimal::RoundingStrategy::ToZero,
        };
        use rust_decimal::prelude::ToPrimitive;
        let cents = (Decimal::new(self.0, 0) * rate).round_dp_with_strategy(0, strategy);
        Self(cents.to_i64().unwrap_or(0))
    }

    /// Rounds to the nearest whole dollar, half away from zero.
    ///
    /// Per IRS instructions: amounts under 50 cents round down, 50 cents
    /// and over round up.
    pub fn round_to_dollar(self) -> Self {
        Self(div_rounded(self.0 as i128, 100, Rounding::HalfUp) * 100)
    }

    /// Truncates to whole dollars (toward zero).
    pub fn trunc_to_dollar(self) -> Self {
        Self((self.0 / 100) * 100)
    }
}

/// Divides with the given rounding convention. `den` must be positive.
fn div_rounded(num: i128, den: i128, rounding: Rounding) -> i64 {
    debug_assert!(den > 0);
    let quot = num.div_euclid(den);
    let rem = num.rem_euclid(den);
    let rounded = match rounding {
        Rounding::Truncate => {
            if num < 0 && rem != 0 {
                quot + 1
            } else {
                quot
            }
        }
        Rounding::HalfUp => {
            // rem is in [0, den); compare twice the remainder against den.
            if 2 * rem >= den && !(num < 0 && 2 * rem == den) {
                quot + 1
            } else {
                quot
            }
        }
        Rounding::HalfEven => {
            let twice = 2 * rem;
            if twice > den || (twice == den && quot % 2 != 0) {
                quot + 1
            } else {
                quot
            }
        }
    };
    rounded as i64
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();
        write!(f, "{}${}.{:02}", sign, cents / 100, cents % 100)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}
