//! Form 8582: Passive Activity Loss Limitations.

use crate::money::{Money, Rounding};
use crate::rules::Rules2025;
use crate::trace::{NodeRef, Trace};
use crate::types::FilingStatus;
use serde::{Deserialize, Serialize};

/// One passive activity entering the limitation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassiveActivity {
    pub activity_id: String,
    /// Current-year net income (positive) or loss (negative).
    pub net: Money,
    /// Suspended loss carried in from the prior year (positive amount).
    pub prior_suspended: Money,
    /// Active participation in rental real estate.
    pub active_participation: bool,
}

/// Computed Form 8582.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form8582Result {
    /// Whether the form must be attached (a net passive loss existed).
    pub required: bool,
    /// Allowed passive loss for the year (negative or zero), after the
    /// special allowance.
    pub allowed_loss: NodeRef,
    /// Net passive result to report: income net of absorbed losses, or
    /// the allowed loss when losses exceed income.
    pub reported_net: Money,
    /// Special allowance actually used.
    pub special_allowance_used: Money,
    /// Loss suspended to next year (positive amount).
    pub suspended: Money,
}

/// Applies the passive-loss limitation.
///
/// Passive income absorbs passive losses first; a remaining rental loss
/// with active participation can use the $25,000 special allowance,
/// phased out at 50% of MAGI over $100,000.
pub fn compute(
    activities: &[PassiveActivity],
    rules: &Rules2025,
    status: FilingStatus,
    magi: Money,
    trace: &mut Trace,
) -> Form8582Result {
    let income: Money = activities
        .iter()
        .map(|a| a.net.clamp_zero())
        .sum();
    let losses: Money = activities
        .iter()
        .map(|a| (-a.net).clamp_zero() + a.prior_suspended)
        .sum();

    let net_loss = losses.saturating_sub(income);
    if net_loss.is_zero() {
        let allowed = trace.literal(
            "form8582.allowedLoss",
            Money::ZERO,
            "no net passive loss",
        );
        return Form8582Result {
            required: false,
            allowed_loss: allowed,
            reported_net: income - losses,
            special_allowance_used: Money::ZERO,
            suspended: Money::ZERO,
        };
    }

    // Only actively-participated rental losses reach the allowance.
    let active_loss: Money = activities
        .iter()
        .filter(|a| a.active_participation)
        .map(|a| (-a.net).clamp_zero() + a.prior_suspended)
        .sum();
    let active_net_loss = active_loss.min(net_loss);

    let full_allowance = rules.passive_special_allowance(status);
    let phase_out_start = rules.passive_allowance_phase_out_start(status);
    let reduction = magi
        .saturating_sub(phase_out_start)
        .mul_rational(1, 2, Rounding::HalfEven);
    let allowance = full_allowance.saturating_sub(reduction);

    let used = active_net_loss.min(allowance);
    let suspended = net_loss - used;

    let allowed = trace.worksheet(
        "form8582.allowedLoss",
        -used,
        "passive loss limitation with special allowance",
        &[],
    );

    Form8582Result {
        required: true,
        allowed_loss: allowed,
        reported_net: -used,
        special_allowance_used: used,
        suspended,
    }
}
