//! Form 1040 orchestrator: composes the schedules into lines 1a-37 in a
//! fixed topological order. Every feedback between forms is a forward
//! read of a previously computed value; no step can observe a value that
//! has not been produced yet.

use crate::error::{TaxError, TaxResult};
use crate::model::{DistributionCode, ReturnModel};
use crate::money::{Money, Rounding};
use crate::result::{FederalResult, Form1040, Schedule1Result, Schedule2Result, Schedule3Result};
use crate::rules::Rules2025;
use crate::schedules::{
    adjustments, credits, form6251, form8606, form8889, form8949, form8959, form8960, qbi,
    schedule_a, schedule_b, schedule_c, schedule_d, schedule_e, schedule_se, social_security,
};
use crate::trace::{NodeRef, Trace};
use crate::triggers;
use crate::types::Owner;
use crate::worksheets;

/// Computes the full federal return into `trace`.
pub fn compute(model: &ReturnModel, trace: &mut Trace) -> TaxResult<FederalResult> {
    let rules = Rules2025::new();

    check_contract(model)?;

    // ─────────────────────────────────────────────────────────────────────
    // Leaves with no dependency on AGI
    // ─────────────────────────────────────────────────────────────────────
    let sched_b = schedule_b::compute(model, &rules, trace);
    let sched_c = schedule_c::compute(model, trace);
    let f8949 = form8949::compute(model, trace);
    let sched_d = schedule_d::compute(model, &rules, &f8949, trace);
    let sched_se = schedule_se::compute(model, &rules, &sched_c, trace);
    let f8889 = form8889::compute(model, &rules, trace);
    let f8606 = form8606::compute(model, trace);

    // ─────────────────────────────────────────────────────────────────────
    // Income block (lines 1a-8)
    // ─────────────────────────────────────────────────────────────────────
    let mut wage_parts = Vec::new();
    for (i, w2) in model.wage_statements.iter().enumerate() {
        wage_parts.push(trace.input(
            format!("w2.{i}.box1"),
            w2.box1_wages,
            format!("W-2 box 1 from {}", w2.employer_name),
        ));
    }
    let line1a = {
        let refs: Vec<&NodeRef> = wage_parts.iter().collect();
        trace.sum("form1040.line1a", &refs)
    };
    let line1z = trace.rebind(&line1a, "form1040.line1z");

    let line2a = trace.rebind(&sched_b.tax_exempt_interest, "form1040.line2a");
    let line2b = trace.rebind(&sched_b.line4, "form1040.line2b");

    let qualified_dividends: Money = model
        .dividend_statements
        .iter()
        .map(|d| d.box1b_qualified_dividends)
        .sum();
    let line3a = trace.input(
        "form1040.line3a",
        qualified_dividends,
        "1099-DIV box 1b totals",
    );
    let line3b = trace.rebind(&sched_b.line6, "form1040.line3b");

    // IRA distributions (4a/4b) and pensions (5a/5b); rollovers excluded
    // from the taxable side.
    let ira_gross: Money = model
        .retirement_distributions
        .iter()
        .filter(|d| d.ira_or_sep)
        .map(|d| d.box1_gross)
        .sum();
    let ira_taxable: Money = match &f8606 {
        Some(basis) => basis.taxable_portion.amount,
        None => model
            .retirement_distributions
            .iter()
            .filter(|d| d.ira_or_sep && !d.is_rollover())
            .map(|d| d.default_taxable())
            .sum(),
    };
    let line4a = trace.input("form1040.line4a", ira_gross, "1099-R box 1, IRA rows");
    let line4b = trace.input("form1040.line4b", ira_taxable, "taxable IRA distributions");

    let pension_gross: Money = model
        .retirement_distributions
        .iter()
        .filter(|d| !d.ira_or_sep)
        .map(|d| d.box1_gross)
        .sum();
    let pension_taxable: Money = model
        .retirement_distributions
        .iter()
        .filter(|d| !d.ira_or_sep && !d.is_rollover())
        .map(|d| d.default_taxable())
        .sum();
    let line5a = trace.input("form1040.line5a", pension_gross, "1099-R box 1, pension rows");
    let line5b = trace.input(
        "form1040.line5b",
        pension_taxable,
        "taxable pension distributions",
    );

    // Line 7: Schedule D line 21 when triggered, else box 2a totals.
    let line7 = if sched_d.required {
        trace.rebind(&sched_d.line21, "form1040.line7")
    } else {
        trace.input(
            "form1040.line7",
            schedule_d::capital_gain_distributions(model),
            "1099-DIV box 2a totals",
        )
    };

    // Schedule E needs a MAGI estimate for the passive-allowance
    // phase-out: income before passive items.
    let magi_before_passive = line1z.amount
        + line2b.amount
        + line3b.amount
        + line4b.amount
        + line5b.amount
        + line7.amount
        + sched_c.total_net_profit.amount;
    let sched_e = schedule_e::compute(model, &rules, magi_before_passive, trace);

    // Schedule 1 Part I: additional income.
    let s1_business = trace.rebind(&sched_c.total_net_profit, "schedule1.line3");
    let s1_rental = trace.rebind(&sched_e.total, "schedule1.line5");
    let misc_income: Money = model
        .misc_statements
        .iter()
        .map(|m| m.box3_other_income + m.box1_rents + m.box2_royalties)
        .sum();
    let s1_other = trace.input("schedule1.line8z", misc_income, "1099-MISC boxes 1-3");
    let s1_hsa_taxable = match &f8889 {
        Some(h) => trace.rebind(&h.taxable_distributions, "schedule1.line8f"),
        None => trace.literal("schedule1.line8f", Money::ZERO, "no HSA distributions"),
    };
    let s1_income = trace.sum(
        "schedule1.line10",
        &[&s1_business, &s1_rental, &s1_other, &s1_hsa_taxable],
    );
    let line8 = trace.rebind(&s1_income, "form1040.line8");

    // Schedule 1 Part II: adjustments. Phase-outs read a MAGI estimate of
    // total income before Social Security benefits.
    let income_excl_ss = line1z.amount
        + line2b.amount
        + line3b.amount
        + line4b.amount
        + line5b.amount
        + line7.amount
        + line8.amount;
    let total_se_profit = sched_c.total_net_profit.amount;
    let adj = adjustments::compute(model, &rules, income_excl_ss, total_se_profit, trace);

    let half_se = trace.rebind(&sched_se.deductible_half, "schedule1.line15");
    let hsa_deduction = match &f8889 {
        Some(h) => trace.rebind(&h.deduction, "schedule1.line13"),
        None => trace.literal("schedule1.line13", Money::ZERO, "no HSA"),
    };
    let s1_adjustments = trace.sum(
        "schedule1.line25",
        &[
            &adj.educator_expenses,
            &hsa_deduction,
            &half_se,
            &adj.sep_simple,
            &adj.se_health_insurance,
            &adj.ira_deduction,
            &adj.student_loan_interest,
        ],
    );
    let line10 = trace.rebind(&s1_adjustments, "form1040.line10");

    // Social Security taxability: combined income uses income excluding
    // benefits, net of adjustments, plus tax-exempt interest.
    let other_agi = income_excl_ss - line10.amount;
    let ss = social_security::compute(model, &rules, other_agi, line2a.amount, trace);
    let line6a = trace.rebind(&ss.gross_benefits, "form1040.line6a");
    let line6b = trace.rebind(&ss.taxable_benefits, "form1040.line6b");

    // ─────────────────────────────────────────────────────────────────────
    // AGI (lines 9-11)
    // ─────────────────────────────────────────────────────────────────────
    let line9 = trace.sum(
        "form1040.line9",
        &[
            &line1z, &line2b, &line3b, &line4b, &line5b, &line6b, &line7, &line8,
        ],
    );
    let agi_raw = trace.sub("form1040.agiBeforeFloor", &line9, &line10);
    let line11 = trace.clamp_zero("form1040.line11", &agi_raw);

    // ─────────────────────────────────────────────────────────────────────
    // Deduction (line 12)
    // ─────────────────────────────────────────────────────────────────────
    let earned_income = line1z.amount + total_se_profit.clamp_zero();
    let standard_amount = standard_deduction(model, &rules, earned_income);

    // Net investment income feeds both Form 4952 and Form 8960.
    let net_capital_gain = if sched_d.required {
        sched_d.line15.amount.min(sched_d.line16.amount).clamp_zero()
    } else {
        line7.amount.clamp_zero()
    };
    let nii = line2b.amount + line3b.amount + line7.amount.clamp_zero()
        + sched_e.total.amount.clamp_zero();

    let sched_a = match (&model.deduction_method, &model.itemized) {
        (crate::types::DeductionMethod::Itemized, Some(worksheet)) => Some(schedule_a::compute(
            model, &rules, worksheet, &line11, nii, trace,
        )),
        _ => None,
    };

    let (line12_amount, standard_used) = match &sched_a {
        Some(a) if a.line17.amount > standard_amount => (a.line17.amount, false),
        _ => (standard_amount, true),
    };
    let line12 = trace.worksheet(
        "form1040.line12",
        line12_amount,
        if standard_used {
            "standard deduction"
        } else {
            "itemized deductions (Schedule A line 17)"
        },
        &[&line11],
    );

    // ─────────────────────────────────────────────────────────────────────
    // QBI (line 13) and taxable income (line 15)
    // ─────────────────────────────────────────────────────────────────────
    let ti_before_qbi_amount = (line11.amount - line12.amount).clamp_zero();
    let ti_before_qbi = trace.worksheet(
        "form1040.taxableBeforeQbi",
        ti_before_qbi_amount,
        "taxable income before the QBI deduction",
        &[&line11, &line12],
    );

    let qbi_components = build_qbi_components(model, &sched_c, &sched_se, &sched_e);
    let preferential = qualified_dividends + net_capital_gain;
    let qbi_result = qbi::compute(
        &rules,
        model.filing_status,
        &qbi_components,
        &ti_before_qbi,
        ti_before_qbi_amount - preferential,
        trace,
    );
    let line13 = match &qbi_result {
        Some(q) => trace.rebind(&q.deduction, "form1040.line13"),
        None => trace.literal("form1040.line13", Money::ZERO, "no qualified business income"),
    };

    let line15_amount = (line11.amount - line12.amount - line13.amount).clamp_zero();
    let line15 = trace.worksheet(
        "form1040.line15",
        line15_amount,
        "taxable income",
        &[&line11, &line12, &line13],
    );

    // ─────────────────────────────────────────────────────────────────────
    // Tax (line 16) and AMT (line 17)
    // ─────────────────────────────────────────────────────────────────────
    let pref_node = trace.literal(
        "form1040.preferentialIncome",
        preferential,
        "qualified dividends plus net long-term capital gain",
    );
    let tax_computation = worksheets::compute_tax(trace, &rules, model.filing_status, &line15, &pref_node);
    let line16 = tax_computation.tax.clone();

    let amt_add_back = if standard_used {
        trace.worksheet(
            "form6251.addBack",
            line12.amount,
            "standard deduction added back for AMT",
            &[&line12],
        )
    } else {
        let salt = sched_a
            .as_ref()
            .map(|a| a.line7.clone())
            .unwrap_or_else(|| line12.clone());
        trace.rebind(&salt, "form6251.addBack")
    };
    let f6251 = form6251::compute(&rules, model.filing_status, &line15, &amt_add_back, &line16, trace);

    // Premium tax credit reconciliation (needs household income).
    let household_income = trace.worksheet(
        "form8962.householdIncome",
        line11.amount + line2a.amount,
        "AGI plus tax-exempt interest",
        &[&line11, &line2a],
    );
    let f8962 = credits::premium::compute(model, &rules, &household_income, trace);

    let ptc_repayment = match &f8962 {
        Some(p) => p.repayment.clone(),
        None => trace.literal("schedule2.line2", Money::ZERO, "no marketplace coverage"),
    };
    let s2_part1 = trace.sum("schedule2.line3", &[&f6251.amt, &ptc_repayment]);
    let line17 = trace.rebind(&s2_part1, "form1040.line17");
    let line18 = trace.sum("form1040.line18", &[&line16, &line17]);

    // ─────────────────────────────────────────────────────────────────────
    // Credits (lines 19-22)
    // ─────────────────────────────────────────────────────────────────────
    let f8863 = credits::education::compute(model, &rules, &line11, trace);
    let f5695 = credits::energy::compute(model, trace);
    let f8880 = credits::savers::compute(model, &rules, &line11, trace);
    let f2441 = credits::dependent_care::compute(model, &rules, &line11, earned_income, trace);
    let ftc = credits::foreign_tax::compute(model, &rules, &line18, &line15, trace);

    let schedule3_raw: Money = [
        ftc.as_ref().map(|c| c.credit.amount),
        f2441.as_ref().map(|c| c.credit.amount),
        f8863.as_ref().map(|c| c.non_refundable.amount),
        f5695.as_ref().map(|c| c.credit.amount),
        f8880.as_ref().map(|c| c.credit.amount),
    ]
    .into_iter()
    .flatten()
    .sum();
    let schedule3_nonref = trace.worksheet(
        "schedule3.line8",
        schedule3_raw.min(line18.amount),
        "non-refundable credits limited to tax",
        &[&line18],
    );

    let tax_for_ctc = trace.worksheet(
        "form8812.taxLimit",
        (line18.amount - schedule3_nonref.amount).clamp_zero(),
        "tax remaining after Schedule 3 credits",
        &[&line18, &schedule3_nonref],
    );
    let f8812 = credits::ctc::compute(model, &rules, &line11, &tax_for_ctc, earned_income, trace);

    let line19 = trace.rebind(&f8812.non_refundable, "form1040.line19");
    let line20 = trace.rebind(&schedule3_nonref, "form1040.line20");
    let line21 = trace.sum("form1040.line21", &[&line19, &line20]);
    let after_credits = trace.sub("form1040.taxAfterCreditsRaw", &line18, &line21);
    let line22 = trace.clamp_zero("form1040.line22", &after_credits);

    // ─────────────────────────────────────────────────────────────────────
    // Other taxes (line 23)
    // ─────────────────────────────────────────────────────────────────────
    let f8959 = form8959::compute(
        &rules,
        model.filing_status,
        model.total_medicare_wages(),
        sched_se.medicare_earnings_for(Owner::Taxpayer)
            + sched_se.medicare_earnings_for(Owner::Spouse),
        trace,
    );
    let f8960 = form8960::compute(&rules, model.filing_status, nii, &line11, trace);

    let early_withdrawal: Money = model
        .retirement_distributions
        .iter()
        .filter(|d| matches!(d.box7_code, DistributionCode::EarlyNoException))
        .map(|d| d.default_taxable())
        .sum::<Money>()
        .pct(Rules2025::EARLY_DISTRIBUTION_BPS, Rounding::HalfEven);
    let early_node = trace.input(
        "schedule2.line8",
        early_withdrawal,
        "10% additional tax on early distributions",
    );

    let se_tax_node = trace.rebind(&sched_se.total_se_tax, "schedule2.line4");
    let medicare_node = trace.rebind(&f8959.additional_tax, "schedule2.line11");
    let niit_node = trace.rebind(&f8960.tax, "schedule2.line12");
    let (hsa_excess, hsa_dist_penalty) = match &f8889 {
        Some(h) => (
            trace.rebind(&h.excess_penalty, "schedule2.line8hsaExcess"),
            trace.rebind(&h.distribution_penalty, "schedule2.line13"),
        ),
        None => (
            trace.literal("schedule2.line8hsaExcess", Money::ZERO, "no HSA"),
            trace.literal("schedule2.line13", Money::ZERO, "no HSA"),
        ),
    };
    let s2_part2 = trace.sum(
        "schedule2.line21",
        &[
            &se_tax_node,
            &medicare_node,
            &niit_node,
            &early_node,
            &hsa_excess,
            &hsa_dist_penalty,
        ],
    );
    let line23 = trace.rebind(&s2_part2, "form1040.line23");
    let line24 = trace.sum("form1040.line24", &[&line22, &line23]);

    // ─────────────────────────────────────────────────────────────────────
    // Payments and refundable credits (lines 25-33)
    // ─────────────────────────────────────────────────────────────────────
    let w2_withholding: Money = model
        .wage_statements
        .iter()
        .map(|w| w.box2_federal_withholding)
        .sum();
    let line25a = trace.input("form1040.line25a", w2_withholding, "W-2 box 2 totals");

    let info_withholding: Money = model
        .interest_statements
        .iter()
        .map(|s| s.box4_federal_withholding)
        .sum::<Money>()
        + model
            .dividend_statements
            .iter()
            .map(|s| s.box4_federal_withholding)
            .sum::<Money>()
        + model
            .retirement_distributions
            .iter()
            .map(|s| s.box4_federal_withholding)
            .sum::<Money>()
        + model
            .misc_statements
            .iter()
            .map(|s| s.box4_federal_withholding)
            .sum::<Money>()
        + model
            .social_security_statements
            .iter()
            .map(|s| s.federal_withholding)
            .sum::<Money>();
    let line25b = trace.input("form1040.line25b", info_withholding, "1099 box 4 totals");
    let line25d = trace.sum("form1040.line25d", &[&line25a, &line25b]);

    let line26 = trace.input(
        "form1040.line26",
        model.estimated_tax_payments,
        "estimated tax payments",
    );

    let line28 = trace.rebind(&f8812.refundable, "form1040.line28");
    let line29 = match &f8863 {
        Some(e) => trace.rebind(&e.refundable, "form1040.line29"),
        None => trace.literal("form1040.line29", Money::ZERO, "no education expenses"),
    };
    let refundable_ptc = match &f8962 {
        Some(p) => trace.rebind(&p.net_credit, "schedule3.line13"),
        None => trace.literal("schedule3.line13", Money::ZERO, "no marketplace coverage"),
    };
    let line31 = trace.rebind(&refundable_ptc, "form1040.line31");
    let line32 = trace.sum("form1040.line32", &[&line28, &line29, &line31]);
    let line33 = trace.sum("form1040.line33", &[&line25d, &line26, &line32]);

    // ─────────────────────────────────────────────────────────────────────
    // Reconciliation (lines 34 and 37)
    // ─────────────────────────────────────────────────────────────────────
    let overpaid_raw = trace.sub("form1040.overpaidRaw", &line33, &line24);
    let line34 = trace.clamp_zero("form1040.line34", &overpaid_raw);
    let owed_raw = trace.sub("form1040.owedRaw", &line24, &line33);
    let line37 = trace.clamp_zero("form1040.line37", &owed_raw);

    let form1040 = Form1040 {
        line1a,
        line1z,
        line2a,
        line2b,
        line3a,
        line3b,
        line4a,
        line4b,
        line5a,
        line5b,
        line6a,
        line6b,
        line7,
        line8,
        line9,
        line10,
        line11,
        line12,
        line13,
        line15,
        line16,
        line17,
        line18,
        line19,
        line20,
        line21,
        line22,
        line23,
        line24,
        line25a,
        line25b,
        line25d,
        line26,
        line28,
        line29,
        line31,
        line32,
        line33,
        line34,
        line37,
        standard_deduction_used: standard_used,
        tax_method: tax_computation.method,
    };

    let schedule1 = Schedule1Result {
        additional_income: s1_income,
        adjustments: s1_adjustments,
        half_se_tax: half_se,
        hsa_deduction,
    };
    let schedule2 = Schedule2Result {
        part1_total: s2_part1,
        part2_total: s2_part2,
    };
    let schedule3 = Schedule3Result {
        non_refundable: schedule3_nonref,
        refundable_ptc,
    };

    let mut result = FederalResult {
        form1040,
        schedule_b: sched_b,
        form8949: f8949,
        schedule_d: sched_d.required.then_some(sched_d),
        schedule_c: (!model.businesses.is_empty()).then_some(sched_c),
        schedule_se: sched_se.total_se_tax.amount.is_positive().then_some(sched_se),
        schedule_e: (!model.rental_properties.is_empty() || !model.k1_passthroughs.is_empty())
            .then_some(sched_e),
        schedule_a: sched_a,
        social_security: (!model.social_security_statements.is_empty()).then_some(ss),
        form8889: f8889,
        form8606: f8606,
        qbi: qbi_result,
        form6251: Some(f6251),
        form8959: Some(f8959),
        form8960: Some(f8960),
        form8812: f8812,
        form8863: f8863,
        form5695: f5695,
        form8880: f8880,
        form2441: f2441,
        foreign_tax: ftc,
        form8962: f8962,
        schedule1,
        schedule2,
        schedule3,
        executed_schedules: Default::default(),
    };
    result.executed_schedules = triggers::executed_schedules(model, &result);
    Ok(result)
}

/// Contract checks: the single `ModelInvalid` failure tier.
fn check_contract(model: &ReturnModel) -> TaxResult<()> {
    if model.filing_status.is_joint() && model.spouse.is_none() {
        return Err(TaxError::model_invalid(
            "spouse",
            "joint filing status requires a spouse record",
        ));
    }
    if model.deduction_method == crate::types::DeductionMethod::Itemized && model.itemized.is_none()
    {
        return Err(TaxError::model_invalid(
            "itemized",
            "itemized deduction elected without a worksheet",
        ));
    }
    for (i, config) in model.state_returns.iter().enumerate() {
        if config.residency_type == crate::model::ResidencyType::PartYear
            && config.move_in_date.is_none()
            && config.move_out_date.is_none()
        {
            return Err(TaxError::model_invalid(
                format!("stateReturns[{i}]"),
                "part-year residency requires a move-in or move-out date",
            ));
        }
    }
    Ok(())
}

/// Standard deduction: base + age-65/blind add-ons, with the
/// dependent-filer floor rule.
fn standard_deduction(model: &ReturnModel, rules: &Rules2025, earned_income: Money) -> Money {
    if model.taxpayer.can_be_claimed_as_dependent {
        return rules.dependent_standard_deduction(model.filing_status, earned_income);
    }
    let mut deduction = rules.standard_deduction_base(model.filing_status);
    let addon = rules.standard_deduction_addon(model.filing_status);
    if model.taxpayer.is_65_or_older(crate::types::TAX_YEAR) {
        deduction += addon;
    }
    if model.taxpayer.is_blind {
        deduction += addon;
    }
    if let Some(spouse) = &model.spouse {
        if model.filing_status.is_joint() {
            if spouse.is_65_or_older(crate::types::TAX_YEAR) {
                deduction += addon;
            }
            if spouse.is_blind {
                deduction += addon;
            }
        }
    }
    deduction
}

/// QBI components: Schedule C businesses net of their share of the SE
/// adjustments, K-1 §199A entries, and safe-harbor rentals.
fn build_qbi_components(
    model: &ReturnModel,
    sched_c: &schedule_c::ScheduleCResult,
    sched_se: &schedule_se::ScheduleSeResult,
    sched_e: &schedule_e::ScheduleEResult,
) -> Vec<qbi::QbiComponent> {
    let mut components = Vec::new();

    for owner in [Owner::Taxpayer, Owner::Spouse] {
        let owner_profit = sched_c.net_profit_for(owner).clamp_zero();
        let half_se: Money = sched_se
            .filers
            .iter()
            .filter(|f| f.owner == owner)
            .map(|f| f.total.amount)
            .sum::<Money>()
            .mul_rational(1, 2, Rounding::HalfEven);

        for business in sched_c.businesses.iter().filter(|b| b.owner == owner) {
            let net = business.net_profit.amount;
            let se_share = if net.is_positive() && owner_profit.is_positive() {
                half_se.mul_rational(net.as_cents(), owner_profit.as_cents(), Rounding::HalfEven)
            } else {
                Money::ZERO
            };
            let qbi_amount = net
                - se_share
                - business.health_insurance_premiums
                - business.sep_simple_contributions;
            components.push(qbi::QbiComponent {
                source_id: business.business_id.clone(),
                qbi: qbi_amount,
                is_sstb: business.is_sstb,
                w2_wages: None,
                ubia: None,
            });
        }
    }

    for k1 in &model.k1_passthroughs {
        if let Some(qbi_income) = k1.qbi_income {
            components.push(qbi::QbiComponent {
                source_id: k1.id.clone(),
                qbi: qbi_income,
                is_sstb: k1.is_sstb,
                w2_wages: k1.qbi_w2_wages,
                ubia: k1.qbi_ubia,
            });
        }
    }

    for (property, rental) in model.rental_properties.iter().zip(sched_e.rentals.iter()) {
        if property.qbi_safe_harbor {
            components.push(qbi::QbiComponent {
                source_id: property.id.clone(),
                qbi: rental.net.amount,
                is_sstb: false,
                w2_wages: None,
                ubia: None,
            });
        }
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WageStatement;
    use crate::types::{FilingStatus, PersonInfo};
    use crate::worksheets::TaxMethod;
    use pretty_assertions::assert_eq;

    fn person(name: &str) -> PersonInfo {
        PersonInfo {
            first_name: name.to_string(),
            last_name: "Tester".to_string(),
            ssn: Some("123-45-6789".to_string()),
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        }
    }

    fn w2(id: &str, wages: i64, withholding: i64) -> WageStatement {
        WageStatement {
            id: id.to_string(),
            owner: Owner::Taxpayer,
            employer_name: "Acme Corp".to_string(),
            employer_ein: "12-3456789".to_string(),
            box1_wages: Money::from_dollars(wages),
            box2_federal_withholding: Money::from_dollars(withholding),
            box3_social_security_wages: Money::from_dollars(wages),
            box4_social_security_withheld: Money::ZERO,
            box5_medicare_wages: Money::from_dollars(wages),
            box6_medicare_withheld: Money::ZERO,
            box12: Vec::new(),
            retirement_plan: false,
            third_party_sick_pay: false,
            state_rows: Vec::new(),
        }
    }

    #[test]
    fn test_simple_wage_return() {
        let mut model = ReturnModel::single(person("Ana"));
        model.wage_statements = vec![w2("w2-1", 75_000, 8_000)];

        let mut trace = Trace::new();
        let result = compute(&model, &mut trace).unwrap();
        let f = &result.form1040;

        assert_eq!(f.line11.amount, Money::from_dollars(75_000));
        assert_eq!(f.line12.amount, Money::from_dollars(15_750));
        assert_eq!(f.line15.amount, Money::from_dollars(59_250));
        assert_eq!(f.line16.amount, Money::from_cents(794_900));
        assert_eq!(f.line24.amount, Money::from_cents(794_900));
        assert_eq!(f.line33.amount, Money::from_dollars(8_000));
        assert_eq!(f.line34.amount, Money::from_cents(5_100));
        assert_eq!(f.line37.amount, Money::ZERO);
        assert_eq!(f.tax_method, TaxMethod::Brackets);
        assert!(f.standard_deduction_used);
    }

    #[test]
    fn test_mfj_two_earners() {
        let mut model = ReturnModel::single(person("Ana"));
        model.filing_status = FilingStatus::MarriedFilingJointly;
        model.spouse = Some(person("Bo"));
        model.wage_statements = vec![w2("w2-1", 60_000, 6_000), w2("w2-2", 45_000, 4_500)];
        model.interest_statements = vec![crate::model::InterestStatement {
            id: "int-1".to_string(),
            owner: Owner::Taxpayer,
            payer_name: "First Bank".to_string(),
            payer_tin: "12-0000001".to_string(),
            box1_interest: Money::from_dollars(1_200),
            box2_early_withdrawal_penalty: Money::ZERO,
            box3_us_government_interest: Money::ZERO,
            box4_federal_withholding: Money::ZERO,
            box8_tax_exempt_interest: Money::ZERO,
        }];

        let mut trace = Trace::new();
        let result = compute(&model, &mut trace).unwrap();
        let f = &result.form1040;

        assert!(!result.schedule_b.required);
        assert_eq!(f.line11.amount, Money::from_dollars(106_200));
        assert_eq!(f.line12.amount, Money::from_dollars(31_500));
        assert_eq!(f.line15.amount, Money::from_dollars(74_700));
        assert_eq!(f.line16.amount, Money::from_dollars(8_487));
        assert_eq!(f.line34.amount, Money::from_dollars(2_013));
    }

    #[test]
    fn test_joint_without_spouse_is_model_invalid() {
        let mut model = ReturnModel::single(person("Ana"));
        model.filing_status = FilingStatus::MarriedFilingJointly;
        let mut trace = Trace::new();
        let err = compute(&model, &mut trace).unwrap_err();
        assert!(matches!(err, TaxError::ModelInvalid { .. }));
    }

    #[test]
    fn test_exactly_one_of_refund_or_owed() {
        for (wages, withholding) in [(75_000, 8_000), (75_000, 5_000), (75_000, 7_949)] {
            let mut model = ReturnModel::single(person("Ana"));
            model.wage_statements = vec![w2("w2-1", wages, withholding)];
            let mut trace = Trace::new();
            let f = compute(&model, &mut trace).unwrap().form1040;
            assert!(f.line34.amount >= Money::ZERO);
            assert!(f.line37.amount >= Money::ZERO);
            assert!(f.line34.amount.is_zero() || f.line37.amount.is_zero());
        }
    }
}
