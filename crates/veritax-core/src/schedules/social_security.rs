//! Social Security benefits taxability worksheet.

use crate::model::ReturnModel;
use crate::money::{Money, Rounding};
use crate::rules::Rules2025;
use crate::trace::{NodeRef, Trace};
use serde::{Deserialize, Serialize};

/// Which taxability tier applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SsTier {
    /// Combined income at or below the base amount: nothing taxable.
    None,
    /// Between base and additional: up to 50% taxable.
    Fifty,
    /// Above the additional amount: up to 85% taxable.
    EightyFive,
}

/// Computed Social Security taxability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialSecurityResult {
    pub tier: SsTier,
    /// Net benefits received (box 5 totals) — Form 1040 line 6a.
    pub gross_benefits: NodeRef,
    /// Taxable portion — Form 1040 line 6b.
    pub taxable_benefits: NodeRef,
}

/// Computes the taxable portion of Social Security benefits.
///
/// `other_income` is the AGI-bound income before benefits; `tax_exempt`
/// is tax-exempt interest (it counts toward combined income).
pub fn compute(
    model: &ReturnModel,
    rules: &Rules2025,
    other_income: Money,
    tax_exempt: Money,
    trace: &mut Trace,
) -> SocialSecurityResult {
    let net_benefits: Money = model
        .social_security_statements
        .iter()
        .map(|s| s.box5_net_benefits)
        .sum();
    let gross_benefits = trace.input(
        "socialSecurity.grossBenefits",
        net_benefits,
        "SSA-1099 box 5 totals",
    );

    // Negative net benefits produce nothing taxable; the validator flags
    // the statement.
    if !net_benefits.is_positive() {
        let taxable = trace.literal(
            "socialSecurity.taxableBenefits",
            Money::ZERO,
            "no positive net benefits",
        );
        return SocialSecurityResult {
            tier: SsTier::None,
            gross_benefits,
            taxable_benefits: taxable,
        };
    }

    let half_benefits = net_benefits.mul_rational(1, 2, Rounding::HalfEven);
    let combined = other_income + half_benefits + tax_exempt;

    let base = rules.ss_base_amount(model.filing_status, model.mfs_lived_apart_all_year);
    let additional =
        rules.ss_additional_amount(model.filing_status, model.mfs_lived_apart_all_year);

    let (tier, taxable) = if combined <= base {
        (SsTier::None, Money::ZERO)
    } else if combined <= additional {
        let half_excess = (combined - base).mul_rational(1, 2, Rounding::HalfEven);
        (SsTier::Fifty, half_excess.min(half_benefits))
    } else {
        let tier1_max = (additional - base).mul_rational(1, 2, Rounding::HalfEven);
        let tier1 = tier1_max.min(half_benefits);
        let tier2 = (combined - additional).pct(8_500, Rounding::HalfEven) + tier1;
        let cap = net_benefits.pct(8_500, Rounding::HalfEven);
        (SsTier::EightyFive, tier2.min(cap))
    };

    // Whole dollars at output only.
    let taxable_benefits = trace.worksheet(
        "socialSecurity.taxableBenefits",
        taxable.round_to_dollar(),
        "Social Security benefits worksheet",
        &[&gross_benefits],
    );

    SocialSecurityResult {
        tier,
        gross_benefits,
        taxable_benefits,
    }
}
