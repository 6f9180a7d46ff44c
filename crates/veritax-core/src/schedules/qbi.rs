//! Qualified Business Income deduction (Form 8995 / Form 8995-A).

use crate::money::{Money, Rounding};
use crate::rules::Rules2025;
use crate::trace::{NodeRef, Trace};
use crate::types::FilingStatus;
use serde::{Deserialize, Serialize};

/// Which form carried the computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QbiForm {
    Form8995,
    Form8995A,
}

/// One trade or business entering the deduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QbiComponent {
    pub source_id: String,
    /// Qualified business income (already net of the SE adjustments
    /// attributable to the business).
    pub qbi: Money,
    pub is_sstb: bool,
    /// W-2 wages for the §199A wage limit (K-1s report these; sole
    /// proprietorships without employees have none).
    pub w2_wages: Option<Money>,
    /// Unadjusted basis immediately after acquisition.
    pub ubia: Option<Money>,
}

/// Computed QBI deduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QbiResult {
    pub form: QbiForm,
    /// Combined QBI across components (losses net against income).
    pub total_qbi: Money,
    /// Form 1040 line 13.
    pub deduction: NodeRef,
    /// An above-threshold component produced $0 for lack of wage/UBIA
    /// data or SSTB phase-out; the validator surfaces this.
    pub conservative_zero_applied: bool,
}

/// Computes the deduction. `income_cap_base` is taxable income before QBI
/// less net capital gains and qualified dividends (the 20% overall cap).
pub fn compute(
    rules: &Rules2025,
    status: FilingStatus,
    components: &[QbiComponent],
    taxable_income_before_qbi: &NodeRef,
    income_cap_base: Money,
    trace: &mut Trace,
) -> Option<QbiResult> {
    if components.is_empty() {
        return None;
    }

    let total_qbi: Money = components.iter().map(|c| c.qbi).sum();
    let threshold = rules.qbi_threshold(status);
    let range = rules.qbi_phase_in_range(status);
    let ti = taxable_income_before_qbi.amount;

    let overall_cap = income_cap_base
        .clamp_zero()
        .pct(Rules2025::QBI_BPS, Rounding::HalfEven);

    if ti <= threshold {
        // Simplified Form 8995.
        let tentative = total_qbi
            .clamp_zero()
            .pct(Rules2025::QBI_BPS, Rounding::HalfEven);
        let deduction = trace.worksheet(
            "qbi.deduction",
            tentative.min(overall_cap),
            "Form 8995 simplified computation",
            &[taxable_income_before_qbi],
        );
        return Some(QbiResult {
            form: QbiForm::Form8995,
            total_qbi,
            deduction,
            conservative_zero_applied: false,
        });
    }

    // Form 8995-A: component-by-component with the wage/UBIA limit and
    // the SSTB phase-out across the range above the threshold.
    let excess = ti - threshold;
    let mut tentative = Money::ZERO;
    let mut conservative_zero = false;

    for component in components {
        if !component.qbi.is_positive() {
            tentative += component.qbi.pct(Rules2025::QBI_BPS, Rounding::HalfEven);
            continue;
        }

        // SSTB: the applicable percentage shrinks to zero across the
        // phase-in range.
        let applicable_bps = if component.is_sstb {
            if excess >= range {
                conservative_zero = true;
                continue;
            }
            10_000 - excess.as_cents() * 10_000 / range.as_cents()
        } else {
            10_000
        };

        let qbi = component.qbi.pct(applicable_bps, Rounding::HalfEven);
        let full = qbi.pct(Rules2025::QBI_BPS, Rounding::HalfEven);

        let (w2, ubia) = match (component.w2_wages, component.ubia) {
            (None, None) => {
                // No wage or basis data: the conservative answer above
                // the threshold is zero.
                conservative_zero = true;
                continue;
            }
            (w2, ubia) => (
                w2.unwrap_or(Money::ZERO).pct(applicable_bps, Rounding::HalfEven),
                ubia.unwrap_or(Money::ZERO).pct(applicable_bps, Rounding::HalfEven),
            ),
        };
        let wage_limit = (w2.pct(5_000, Rounding::HalfEven))
            .max(w2.pct(2_500, Rounding::HalfEven) + ubia.pct(250, Rounding::HalfEven));

        let component_deduction = if excess >= range {
            full.min(wage_limit)
        } else {
            // Phase in the wage limit across the range.
            let shortfall = full.saturating_sub(wage_limit);
            let reduction =
                shortfall.mul_rational(excess.as_cents(), range.as_cents(), Rounding::HalfEven);
            full - reduction
        };
        tentative += component_deduction;
    }

    let deduction = trace.worksheet(
        "qbi.deduction",
        tentative.clamp_zero().min(overall_cap),
        "Form 8995-A with wage/UBIA limits",
        &[taxable_income_before_qbi],
    );
    Some(QbiResult {
        form: QbiForm::Form8995A,
        total_qbi,
        deduction,
        conservative_zero_applied: conservative_zero,
    })
}
