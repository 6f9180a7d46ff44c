//! Tax rules and constants for 2025.
//!
//! Sources:
//! - IRS Revenue Procedure 2024-40
//! - One Big Beautiful Bill Act (signed July 4, 2025)

use crate::money::Money;
use crate::rules::{ByStatus, PhaseOut, PhaseOutRange, TaxBracket};
use crate::types::FilingStatus;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// All numeric parameters for tax year 2025.
#[derive(Debug, Clone)]
pub struct Rules2025 {
    brackets_single: Vec<TaxBracket>,
    brackets_mfj: Vec<TaxBracket>,
    brackets_mfs: Vec<TaxBracket>,
    brackets_hoh: Vec<TaxBracket>,
    ctc_phase_out: PhaseOut,
}

impl Default for Rules2025 {
    fn default() -> Self {
        Self::new()
    }
}

impl Rules2025 {
    pub fn new() -> Self {
        Self {
            brackets_single: Self::build_single_brackets(),
            brackets_mfj: Self::build_mfj_brackets(),
            brackets_mfs: Self::build_mfs_brackets(),
            brackets_hoh: Self::build_hoh_brackets(),
            ctc_phase_out: PhaseOut {
                threshold: ByStatus {
                    single: Money::from_dollars(200_000),
                    mfj: Money::from_dollars(400_000),
                    mfs: Money::from_dollars(200_000),
                    hoh: Money::from_dollars(200_000),
                },
                rate: dec!(0.05),
            },
        }
    }

    fn build_single_brackets() -> Vec<TaxBracket> {
        Self::brackets_from(&[
            (dec!(0.10), Some(11_925)),
            (dec!(0.12), Some(48_475)),
            (dec!(0.22), Some(103_350)),
            (dec!(0.24), Some(197_300)),
            (dec!(0.32), Some(250_525)),
            (dec!(0.35), Some(626_350)),
            (dec!(0.37), None),
        ])
    }

    fn build_mfj_brackets() -> Vec<TaxBracket> {
        Self::brackets_from(&[
            (dec!(0.10), Some(23_850)),
            (dec!(0.12), Some(96_950)),
            (dec!(0.22), Some(206_700)),
            (dec!(0.24), Some(394_600)),
            (dec!(0.32), Some(501_050)),
            (dec!(0.35), Some(751_600)),
            (dec!(0.37), None),
        ])
    }

    fn build_mfs_brackets() -> Vec<TaxBracket> {
        // Half of MFJ except the 37% boundary.
        Self::brackets_from(&[
            (dec!(0.10), Some(11_925)),
            (dec!(0.12), Some(48_475)),
            (dec!(0.22), Some(103_350)),
            (dec!(0.24), Some(197_300)),
            (dec!(0.32), Some(250_525)),
            (dec!(0.35), Some(375_800)),
            (dec!(0.37), None),
        ])
    }

    fn build_hoh_brackets() -> Vec<TaxBracket> {
        Self::brackets_from(&[
            (dec!(0.10), Some(17_000)),
            (dec!(0.12), Some(64_850)),
            (dec!(0.22), Some(103_350)),
            (dec!(0.24), Some(197_300)),
            (dec!(0.32), Some(250_500)),
            (dec!(0.35), Some(626_350)),
            (dec!(0.37), None),
        ])
    }

    fn brackets_from(rows: &[(Decimal, Option<i64>)]) -> Vec<TaxBracket> {
        let mut brackets = Vec::with_capacity(rows.len());
        let mut min = Money::ZERO;
        for (rate, max) in rows {
            let max = max.map(Money::from_dollars);
            brackets.push(TaxBracket {
                rate: *rate,
                min,
                max,
            });
            if let Some(m) = max {
                min = m;
            }
        }
        brackets
    }

    /// Ordinary-income brackets for the given filing status.
    pub fn brackets(&self, status: FilingStatus) -> &[TaxBracket] {
        match status {
            FilingStatus::Single => &self.brackets_single,
            FilingStatus::MarriedFilingJointly | FilingStatus::QualifyingSurvivingSpouse => {
                &self.brackets_mfj
            }
            FilingStatus::MarriedFilingSeparately => &self.brackets_mfs,
            FilingStatus::HeadOfHousehold => &self.brackets_hoh,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Standard deduction (post-OBBBA)
    // ─────────────────────────────────────────────────────────────────────

    pub fn standard_deduction_base(&self, status: FilingStatus) -> Money {
        ByStatus {
            single: Money::from_dollars(15_750),
            mfj: Money::from_dollars(31_500),
            mfs: Money::from_dollars(15_750),
            hoh: Money::from_dollars(23_625),
        }
        .get(status)
    }

    /// Additional standard deduction per age-65/blind box checked.
    pub fn standard_deduction_addon(&self, status: FilingStatus) -> Money {
        match status {
            FilingStatus::Single | FilingStatus::HeadOfHousehold => Money::from_dollars(2_000),
            _ => Money::from_dollars(1_600),
        }
    }

    /// Dependent-filer floor: the greater of $1,350 or earned income
    /// plus $450, capped at the normal base amount.
    pub fn dependent_standard_deduction(&self, status: FilingStatus, earned: Money) -> Money {
        let floor = Money::from_dollars(1_350);
        let earned_plus = earned + Money::from_dollars(450);
        floor.max(earned_plus).min(self.standard_deduction_base(status))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Preferential-rate (QDCG) thresholds
    // ─────────────────────────────────────────────────────────────────────

    /// Top of the 0% capital-gain bracket.
    pub fn qdcg_zero_ceiling(&self, status: FilingStatus) -> Money {
        ByStatus {
            single: Money::from_dollars(48_350),
            mfj: Money::from_dollars(96_700),
            mfs: Money::from_dollars(48_350),
            hoh: Money::from_dollars(64_750),
        }
        .get(status)
    }

    /// Top of the 15% capital-gain bracket.
    pub fn qdcg_fifteen_ceiling(&self, status: FilingStatus) -> Money {
        ByStatus {
            single: Money::from_dollars(533_400),
            mfj: Money::from_dollars(600_050),
            mfs: Money::from_dollars(300_000),
            hoh: Money::from_dollars(566_700),
        }
        .get(status)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Capital losses & Schedule B
    // ─────────────────────────────────────────────────────────────────────

    /// Annual capital-loss deduction cap against ordinary income.
    pub fn capital_loss_cap(&self, status: FilingStatus) -> Money {
        if status == FilingStatus::MarriedFilingSeparately {
            Money::from_dollars(1_500)
        } else {
            Money::from_dollars(3_000)
        }
    }

    /// Schedule B is required strictly above this amount of interest or
    /// ordinary dividends.
    pub fn schedule_b_threshold(&self) -> Money {
        Money::from_dollars(1_500)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Schedule A
    // ─────────────────────────────────────────────────────────────────────

    /// Medical-expense AGI floor, in basis points (7.5%).
    pub const MEDICAL_AGI_FLOOR_BPS: i64 = 750;

    pub fn salt_cap(&self, status: FilingStatus) -> Money {
        if status == FilingStatus::MarriedFilingSeparately {
            Money::from_dollars(20_000)
        } else {
            Money::from_dollars(40_000)
        }
    }

    /// AGI threshold where the SALT cap starts phasing down.
    pub fn salt_phase_out_threshold(&self, status: FilingStatus) -> Money {
        if status == FilingStatus::MarriedFilingSeparately {
            Money::from_dollars(250_000)
        } else {
            Money::from_dollars(500_000)
        }
    }

    /// Floor the SALT cap cannot phase below.
    pub fn salt_cap_floor(&self, status: FilingStatus) -> Money {
        if status == FilingStatus::MarriedFilingSeparately {
            Money::from_dollars(5_000)
        } else {
            Money::from_dollars(10_000)
        }
    }

    /// SALT phase-down rate: 30% of AGI over the threshold.
    pub const SALT_PHASE_OUT_BPS: i64 = 3_000;

    /// Post-TCJA acquisition-debt limit for mortgage interest.
    pub fn mortgage_principal_limit(&self, status: FilingStatus) -> Money {
        if status == FilingStatus::MarriedFilingSeparately {
            Money::from_dollars(375_000)
        } else {
            Money::from_dollars(750_000)
        }
    }

    /// Charitable cash contribution AGI ceiling, basis points (60%).
    pub const CHARITY_CASH_AGI_BPS: i64 = 6_000;
    /// Charitable non-cash contribution AGI ceiling, basis points (30%).
    pub const CHARITY_NONCASH_AGI_BPS: i64 = 3_000;

    // ─────────────────────────────────────────────────────────────────────
    // Self-employment & payroll taxes
    // ─────────────────────────────────────────────────────────────────────

    /// Net-earnings factor: 92.35% in basis points.
    pub const SE_NET_EARNINGS_BPS: i64 = 9_235;
    /// Social Security portion: 12.4% in basis points.
    pub const SE_SOCIAL_SECURITY_BPS: i64 = 1_240;
    /// Medicare portion: 2.9% in basis points.
    pub const SE_MEDICARE_BPS: i64 = 290;

    /// Social Security wage base for 2025.
    pub fn social_security_wage_base(&self) -> Money {
        Money::from_dollars(176_100)
    }

    /// Additional Medicare Tax threshold (Form 8959).
    pub fn additional_medicare_threshold(&self, status: FilingStatus) -> Money {
        ByStatus {
            single: Money::from_dollars(200_000),
            mfj: Money::from_dollars(250_000),
            mfs: Money::from_dollars(125_000),
            hoh: Money::from_dollars(200_000),
        }
        .get(status)
    }

    /// Additional Medicare Tax rate: 0.9% in basis points.
    pub const ADDITIONAL_MEDICARE_BPS: i64 = 90;

    /// Net-investment-income tax threshold (Form 8960).
    pub fn niit_threshold(&self, status: FilingStatus) -> Money {
        ByStatus {
            single: Money::from_dollars(200_000),
            mfj: Money::from_dollars(250_000),
            mfs: Money::from_dollars(125_000),
            hoh: Money::from_dollars(200_000),
        }
        .get(status)
    }

    /// NIIT rate: 3.8% in basis points.
    pub const NIIT_BPS: i64 = 380;

    // ─────────────────────────────────────────────────────────────────────
    // Social Security taxability
    // ─────────────────────────────────────────────────────────────────────

    /// Base amount: below this combined income no benefits are taxable.
    pub fn ss_base_amount(&self, status: FilingStatus, mfs_lived_apart: bool) -> Money {
        match status {
            FilingStatus::MarriedFilingJointly | FilingStatus::QualifyingSurvivingSpouse => {
                Money::from_dollars(32_000)
            }
            FilingStatus::MarriedFilingSeparately if !mfs_lived_apart => Money::ZERO,
            _ => Money::from_dollars(25_000),
        }
    }

    /// Additional amount: above this combined income the 85% tier applies.
    pub fn ss_additional_amount(&self, status: FilingStatus, mfs_lived_apart: bool) -> Money {
        match status {
            FilingStatus::MarriedFilingJointly | FilingStatus::QualifyingSurvivingSpouse => {
                Money::from_dollars(44_000)
            }
            FilingStatus::MarriedFilingSeparately if !mfs_lived_apart => Money::ZERO,
            _ => Money::from_dollars(34_000),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Child Tax Credit (Schedule 8812)
    // ─────────────────────────────────────────────────────────────────────

    pub fn child_tax_credit_max(&self) -> Money {
        Money::from_dollars(2_200)
    }

    pub fn credit_for_other_dependents(&self) -> Money {
        Money::from_dollars(500)
    }

    pub fn additional_child_tax_credit_max(&self) -> Money {
        Money::from_dollars(1_700)
    }

    pub fn actc_earned_income_threshold(&self) -> Money {
        Money::from_dollars(2_500)
    }

    pub fn child_tax_credit_phase_out(&self) -> &PhaseOut {
        &self.ctc_phase_out
    }

    // ─────────────────────────────────────────────────────────────────────
    // QBI (§199A)
    // ─────────────────────────────────────────────────────────────────────

    /// Taxable-income threshold for the simplified Form 8995 path.
    pub fn qbi_threshold(&self, status: FilingStatus) -> Money {
        ByStatus {
            single: Money::from_dollars(241_950),
            mfj: Money::from_dollars(483_900),
            mfs: Money::from_dollars(241_950),
            hoh: Money::from_dollars(241_950),
        }
        .get(status)
    }

    /// Width of the SSTB/wage-limit phase-in range above the threshold.
    pub fn qbi_phase_in_range(&self, status: FilingStatus) -> Money {
        if status.is_joint() {
            Money::from_dollars(150_000)
        } else {
            Money::from_dollars(75_000)
        }
    }

    /// QBI deduction rate: 20% in basis points.
    pub const QBI_BPS: i64 = 2_000;

    // ─────────────────────────────────────────────────────────────────────
    // AMT (Form 6251)
    // ─────────────────────────────────────────────────────────────────────

    pub fn amt_exemption(&self, status: FilingStatus) -> Money {
        ByStatus {
            single: Money::from_dollars(88_100),
            mfj: Money::from_dollars(137_000),
            mfs: Money::from_dollars(68_500),
            hoh: Money::from_dollars(88_100),
        }
        .get(status)
    }

    pub fn amt_exemption_phase_out_start(&self, status: FilingStatus) -> Money {
        ByStatus {
            single: Money::from_dollars(626_350),
            mfj: Money::from_dollars(1_252_700),
            mfs: Money::from_dollars(626_350),
            hoh: Money::from_dollars(626_350),
        }
        .get(status)
    }

    /// AMT exemption phase-out rate: 25% in basis points.
    pub const AMT_PHASE_OUT_BPS: i64 = 2_500;

    /// AMTI breakpoint between the 26% and 28% rates.
    pub fn amt_rate_break(&self, status: FilingStatus) -> Money {
        if status == FilingStatus::MarriedFilingSeparately {
            Money::from_dollars(119_550)
        } else {
            Money::from_dollars(239_100)
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // HSA (Form 8889)
    // ─────────────────────────────────────────────────────────────────────

    pub fn hsa_limit_self_only(&self) -> Money {
        Money::from_dollars(4_300)
    }

    pub fn hsa_limit_family(&self) -> Money {
        Money::from_dollars(8_550)
    }

    pub fn hsa_catch_up(&self) -> Money {
        Money::from_dollars(1_000)
    }

    /// Excess-contribution excise: 6% in basis points.
    pub const HSA_EXCESS_BPS: i64 = 600;
    /// Non-qualified-distribution additional tax: 20% in basis points.
    pub const HSA_DISTRIBUTION_PENALTY_BPS: i64 = 2_000;

    // ─────────────────────────────────────────────────────────────────────
    // Adjustments
    // ─────────────────────────────────────────────────────────────────────

    pub fn ira_contribution_limit(&self, age_50_or_older: bool) -> Money {
        if age_50_or_older {
            Money::from_dollars(8_000)
        } else {
            Money::from_dollars(7_000)
        }
    }

    /// Deduction phase-out when covered by a workplace plan.
    pub fn ira_deduction_phase_out(&self, status: FilingStatus) -> PhaseOutRange {
        match status {
            FilingStatus::MarriedFilingJointly | FilingStatus::QualifyingSurvivingSpouse => {
                PhaseOutRange {
                    floor: Money::from_dollars(126_000),
                    ceiling: Money::from_dollars(146_000),
                }
            }
            FilingStatus::MarriedFilingSeparately => PhaseOutRange {
                floor: Money::ZERO,
                ceiling: Money::from_dollars(10_000),
            },
            _ => PhaseOutRange {
                floor: Money::from_dollars(79_000),
                ceiling: Money::from_dollars(89_000),
            },
        }
    }

    pub fn student_loan_interest_cap(&self) -> Money {
        Money::from_dollars(2_500)
    }

    pub fn student_loan_phase_out(&self, status: FilingStatus) -> PhaseOutRange {
        if status.is_joint() {
            PhaseOutRange {
                floor: Money::from_dollars(170_000),
                ceiling: Money::from_dollars(200_000),
            }
        } else {
            PhaseOutRange {
                floor: Money::from_dollars(85_000),
                ceiling: Money::from_dollars(100_000),
            }
        }
    }

    pub fn educator_expense_cap(&self) -> Money {
        Money::from_dollars(300)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Credits
    // ─────────────────────────────────────────────────────────────────────

    /// Saver's-credit rate in basis points for the given AGI, or zero.
    pub fn savers_credit_bps(&self, status: FilingStatus, agi: Money) -> i64 {
        let tiers: [(Money, i64); 3] = match status {
            FilingStatus::MarriedFilingJointly | FilingStatus::QualifyingSurvivingSpouse => [
                (Money::from_dollars(47_500), 5_000),
                (Money::from_dollars(51_000), 2_000),
                (Money::from_dollars(79_000), 1_000),
            ],
            FilingStatus::HeadOfHousehold => [
                (Money::from_dollars(35_625), 5_000),
                (Money::from_dollars(38_250), 2_000),
                (Money::from_dollars(59_250), 1_000),
            ],
            _ => [
                (Money::from_dollars(23_750), 5_000),
                (Money::from_dollars(25_500), 2_000),
                (Money::from_dollars(39_500), 1_000),
            ],
        };
        for (ceiling, bps) in tiers {
            if agi <= ceiling {
                return bps;
            }
        }
        0
    }

    /// Saver's-credit contribution base cap, per person.
    pub fn savers_contribution_cap(&self) -> Money {
        Money::from_dollars(2_000)
    }

    /// Education-credit MAGI phase-out (both AOTC and LLC).
    pub fn education_phase_out(&self, status: FilingStatus) -> PhaseOutRange {
        if status.is_joint() {
            PhaseOutRange {
                floor: Money::from_dollars(160_000),
                ceiling: Money::from_dollars(180_000),
            }
        } else {
            PhaseOutRange {
                floor: Money::from_dollars(80_000),
                ceiling: Money::from_dollars(90_000),
            }
        }
    }

    /// Dependent-care expense cap for one/two-or-more qualifying persons.
    pub fn dependent_care_expense_cap(&self, qualifying_persons: u8) -> Money {
        if qualifying_persons >= 2 {
            Money::from_dollars(6_000)
        } else {
            Money::from_dollars(3_000)
        }
    }

    /// Foreign-tax de-minimis threshold for claiming without Form 1116.
    pub fn foreign_tax_direct_limit(&self, status: FilingStatus) -> Money {
        if status.is_joint() {
            Money::from_dollars(600)
        } else {
            Money::from_dollars(300)
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Passive losses (Form 8582)
    // ─────────────────────────────────────────────────────────────────────

    /// Rental real-estate special allowance.
    pub fn passive_special_allowance(&self, status: FilingStatus) -> Money {
        if status == FilingStatus::MarriedFilingSeparately {
            Money::from_dollars(12_500)
        } else {
            Money::from_dollars(25_000)
        }
    }

    /// MAGI threshold where the special allowance starts phasing out.
    pub fn passive_allowance_phase_out_start(&self, status: FilingStatus) -> Money {
        if status == FilingStatus::MarriedFilingSeparately {
            Money::from_dollars(50_000)
        } else {
            Money::from_dollars(100_000)
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Premium tax credit (Form 8962)
    // ─────────────────────────────────────────────────────────────────────

    /// Federal poverty line for the household size (48 contiguous states).
    pub fn federal_poverty_line(&self, household_size: u8) -> Money {
        let first = Money::from_dollars(15_060);
        let each_additional = Money::from_dollars(5_380);
        let extra = household_size.saturating_sub(1) as i64;
        first + each_additional.mul_rational(extra, 1, crate::money::Rounding::HalfEven)
    }

    /// Expected-contribution percentage in basis points, by % of FPL.
    ///
    /// Linear within each band; 8.5% above 400% FPL.
    pub fn ptc_applicable_bps(&self, fpl_percent: i64) -> i64 {
        let bands: [(i64, i64, i64, i64); 5] = [
            (150, 200, 0, 200),
            (200, 250, 200, 400),
            (250, 300, 400, 600),
            (300, 400, 600, 850),
            (400, i64::MAX, 850, 850),
        ];
        if fpl_percent < 150 {
            return 0;
        }
        for (lo, hi, bps_lo, bps_hi) in bands {
            if fpl_percent < hi {
                if bps_hi == bps_lo {
                    return bps_lo;
                }
                return bps_lo + (bps_hi - bps_lo) * (fpl_percent - lo) / (hi - lo);
            }
        }
        850
    }

    /// Early-distribution additional tax: 10% in basis points.
    pub const EARLY_DISTRIBUTION_BPS: i64 = 1_000;
}
