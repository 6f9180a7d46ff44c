//! Schedule SE: Self-Employment Tax (short form, Section A).

use crate::model::ReturnModel;
use crate::money::{Money, Rounding};
use crate::rules::Rules2025;
use crate::schedules::schedule_c::ScheduleCResult;
use crate::trace::{NodeRef, Trace};
use crate::types::Owner;
use serde::{Deserialize, Serialize};

/// Schedule SE computed for one filer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSeFiler {
    pub owner: Owner,
    /// Line 3: net earnings base (net profit × 92.35%).
    pub line3: NodeRef,
    /// Line 4a: earnings subject to Social Security, after the wage-base
    /// coordination with W-2 Social Security wages.
    pub line4a: NodeRef,
    /// Line 4b/5-equivalent Social Security portion.
    pub social_security_tax: NodeRef,
    /// Medicare portion (uncapped).
    pub medicare_tax: NodeRef,
    /// Line 6: total SE tax for this filer.
    pub total: NodeRef,
}

/// Computed Schedule SE across filers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSeResult {
    pub filers: Vec<ScheduleSeFiler>,
    /// Combined SE tax (Schedule 2).
    pub total_se_tax: NodeRef,
    /// Line 12-equivalent: deductible half of SE tax (Schedule 1).
    pub deductible_half: NodeRef,
}

impl ScheduleSeResult {
    /// SE earnings subject to Medicare for one filer (Form 8959 base).
    pub fn medicare_earnings_for(&self, owner: Owner) -> Money {
        self.filers
            .iter()
            .filter(|f| f.owner == owner)
            .map(|f| f.line3.amount)
            .sum()
    }
}

pub fn compute(
    model: &ReturnModel,
    rules: &Rules2025,
    schedule_c: &ScheduleCResult,
    trace: &mut Trace,
) -> ScheduleSeResult {
    let mut filers = Vec::new();

    for owner in [Owner::Taxpayer, Owner::Spouse] {
        // Per-filer losses floor at zero; one spouse's loss does not
        // shelter the other's SE earnings.
        let net_profit = schedule_c.net_profit_for(owner).clamp_zero();
        if net_profit.is_zero() {
            continue;
        }
        let tag = match owner {
            Owner::Taxpayer => "taxpayer",
            Owner::Spouse => "spouse",
        };
        let prefix = format!("scheduleSE.{tag}");

        let line2 = trace.input(
            format!("{prefix}.line2"),
            net_profit,
            format!("Schedule C net profit ({tag})"),
        );
        let line3 = trace.pct(
            format!("{prefix}.line3"),
            &line2,
            Rules2025::SE_NET_EARNINGS_BPS,
            Rounding::HalfEven,
        );

        // Social Security base coordinates with W-2 box 3 wages.
        let wage_base = rules.social_security_wage_base();
        let ss_wages = model.social_security_wages_for(owner);
        let remaining_base = wage_base.saturating_sub(ss_wages);
        let base_node = trace.literal(
            format!("{prefix}.remainingWageBase"),
            remaining_base,
            format!(
                "Social Security wage base ${} less W-2 box 3 wages",
                wage_base.as_cents() / 100
            ),
        );
        let line4a = trace.min(format!("{prefix}.line4a"), &line3, &base_node);

        let social_security_tax = trace.pct(
            format!("{prefix}.socialSecurityTax"),
            &line4a,
            Rules2025::SE_SOCIAL_SECURITY_BPS,
            Rounding::HalfEven,
        );
        let medicare_tax = trace.pct(
            format!("{prefix}.medicareTax"),
            &line3,
            Rules2025::SE_MEDICARE_BPS,
            Rounding::HalfEven,
        );
        let total = trace.sum(
            format!("{prefix}.total"),
            &[&social_security_tax, &medicare_tax],
        );

        filers.push(ScheduleSeFiler {
            owner,
            line3,
            line4a,
            social_security_tax,
            medicare_tax,
            total,
        });
    }

    let total_se_tax = {
        let parts: Vec<&NodeRef> = filers.iter().map(|f| &f.total).collect();
        trace.sum("scheduleSE.totalTax", &parts)
    };
    let deductible_half = trace.mul_rational(
        "scheduleSE.deductibleHalf",
        &total_se_tax,
        1,
        2,
        Rounding::HalfEven,
    );

    ScheduleSeResult {
        filers,
        total_se_tax,
        deductible_half,
    }
}
