//! Schedule A: Itemized Deductions.

use crate::model::{ItemizedWorksheet, ReturnModel};
use crate::money::{Money, Rounding};
use crate::rules::Rules2025;
use crate::schedules::form4952::{self, Form4952Result};
use crate::trace::{NodeRef, Trace};
use serde::{Deserialize, Serialize};

/// Computed Schedule A.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleAResult {
    /// Line 4: medical expenses above the 7.5% AGI floor.
    pub line4: NodeRef,
    /// Line 5e: total state and local taxes before the cap.
    pub line5e: NodeRef,
    /// Line 7: taxes allowed after the SALT cap.
    pub line7: NodeRef,
    /// Line 10: total interest (mortgage plus allowed investment
    /// interest).
    pub line10: NodeRef,
    /// Line 14: charitable contributions after AGI ceilings.
    pub line14: NodeRef,
    /// Line 15: casualty losses.
    pub line15: NodeRef,
    /// Line 16: other itemized deductions.
    pub line16: NodeRef,
    /// Line 17: the total itemized deduction.
    pub line17: NodeRef,
    pub form4952: Form4952Result,
    /// Charitable amounts above the ceilings, carried but not consumed.
    pub charity_carryforward: Money,
    /// Whether the SALT cap actually bit.
    pub salt_capped: bool,
}

/// State and local income taxes paid: W-2 box 17 rows plus amounts on the
/// worksheet (estimated payments, prior-year balance-due).
fn state_local_income_taxes(model: &ReturnModel, worksheet: &ItemizedWorksheet) -> Money {
    let withheld: Money = model
        .wage_statements
        .iter()
        .flat_map(|w| w.state_rows.iter())
        .map(|r| r.box17_state_withholding)
        .sum();
    withheld + worksheet.state_local_income_taxes
}

/// Mortgage interest with the post-TCJA principal limit applied per loan.
/// Interest passes through whole when the principal is unknown.
fn mortgage_interest_allowed(
    worksheet: &ItemizedWorksheet,
    limit: Money,
) -> Money {
    worksheet
        .mortgages
        .iter()
        .map(|m| match m.average_principal {
            Some(principal) if principal > limit && principal.is_positive() => m
                .interest_paid
                .mul_rational(limit.as_cents(), principal.as_cents(), Rounding::HalfEven),
            _ => m.interest_paid,
        })
        .sum()
}

pub fn compute(
    model: &ReturnModel,
    rules: &Rules2025,
    worksheet: &ItemizedWorksheet,
    agi: &NodeRef,
    net_investment_income: Money,
    trace: &mut Trace,
) -> ScheduleAResult {
    let status = model.filing_status;

    // Medical: the AGI reference is a one-shot forward read of the
    // preliminary AGI; Schedule A never feeds back into it.
    let medical = trace.input(
        "scheduleA.line1",
        worksheet.medical_expenses,
        "unreimbursed medical expenses",
    );
    let floor = trace.pct(
        "scheduleA.line3",
        agi,
        Rules2025::MEDICAL_AGI_FLOOR_BPS,
        Rounding::HalfEven,
    );
    let medical_excess = trace.sub("scheduleA.medicalExcess", &medical, &floor);
    let line4 = trace.clamp_zero("scheduleA.line4", &medical_excess);

    // Taxes: 5a income, 5b real estate, 5c personal property, 5d other.
    let line5a = trace.input(
        "scheduleA.line5a",
        state_local_income_taxes(model, worksheet),
        "state and local income taxes paid",
    );
    let line5b = trace.input(
        "scheduleA.line5b",
        worksheet.real_estate_taxes,
        "real estate taxes",
    );
    let line5c = trace.input(
        "scheduleA.line5c",
        worksheet.personal_property_taxes,
        "personal property taxes",
    );
    let line5d = trace.input("scheduleA.line5d", worksheet.other_taxes, "other taxes");
    let line5e = trace.sum("scheduleA.line5e", &[&line5a, &line5b, &line5c, &line5d]);

    // SALT cap with the high-AGI phase-down.
    let base_cap = rules.salt_cap(status);
    let excess_agi = agi
        .amount
        .saturating_sub(rules.salt_phase_out_threshold(status));
    let phased_cap = base_cap
        .saturating_sub(excess_agi.pct(Rules2025::SALT_PHASE_OUT_BPS, Rounding::HalfEven))
        .max(rules.salt_cap_floor(status));
    let cap_node = trace.literal(
        "scheduleA.saltCap",
        phased_cap,
        "SALT cap after AGI phase-down",
    );
    let line7 = trace.min("scheduleA.line7", &line5e, &cap_node);
    let salt_capped = line5e.amount > line7.amount;

    // Interest.
    let mortgage = trace.input(
        "scheduleA.line8e",
        mortgage_interest_allowed(worksheet, rules.mortgage_principal_limit(status)),
        "home mortgage interest after principal limit",
    );
    let form4952_result = form4952::compute(
        worksheet.investment_interest,
        worksheet.investment_interest_carryforward,
        net_investment_income,
        trace,
    );
    let line9 = trace.rebind(&form4952_result.allowed, "scheduleA.line9");
    let line10 = trace.sum("scheduleA.line10", &[&mortgage, &line9]);

    // Charity: cash at 60% of AGI, non-cash at 30%.
    let cash_ceiling = agi
        .amount
        .pct(Rules2025::CHARITY_CASH_AGI_BPS, Rounding::HalfEven);
    let noncash_ceiling = agi
        .amount
        .pct(Rules2025::CHARITY_NONCASH_AGI_BPS, Rounding::HalfEven);
    let cash_allowed = worksheet.charitable_cash.min(cash_ceiling);
    let noncash_allowed = worksheet.charitable_noncash.min(noncash_ceiling);
    let charity_carryforward = (worksheet.charitable_cash - cash_allowed)
        + (worksheet.charitable_noncash - noncash_allowed);
    let line11 = trace.input("scheduleA.line11", cash_allowed, "cash charity after AGI ceiling");
    let line12 = trace.input(
        "scheduleA.line12",
        noncash_allowed,
        "non-cash charity after AGI ceiling",
    );
    let line14 = trace.sum("scheduleA.line14", &[&line11, &line12]);

    let line15 = trace.input(
        "scheduleA.line15",
        worksheet.casualty_losses,
        "federally declared disaster losses",
    );
    let line16 = trace.input(
        "scheduleA.line16",
        worksheet.other_deductions,
        "other itemized deductions",
    );

    let line17 = trace.sum(
        "scheduleA.line17",
        &[&line4, &line7, &line10, &line14, &line15, &line16],
    );

    ScheduleAResult {
        line4,
        line5e,
        line7,
        line10,
        line14,
        line15,
        line16,
        line17,
        form4952: form4952_result,
        charity_carryforward,
        salt_capped,
    }
}
