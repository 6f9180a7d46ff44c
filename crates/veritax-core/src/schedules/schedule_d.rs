//! Schedule D: Capital Gains and Losses.

use crate::model::{ReturnModel, SaleCategory};
use crate::money::Money;
use crate::rules::Rules2025;
use crate::schedules::form8949::Form8949Result;
use crate::trace::{NodeRef, Trace};
use serde::{Deserialize, Serialize};

/// Computed Schedule D.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDResult {
    /// Whether Schedule D is part of the return at all.
    pub required: bool,
    /// Line 7: net short-term gain or loss.
    pub line7: NodeRef,
    /// Line 13: capital gain distributions.
    pub line13: NodeRef,
    /// Line 15: net long-term gain or loss.
    pub line15: NodeRef,
    /// Line 16: lines 7 + 15.
    pub line16: NodeRef,
    /// Line 21: the amount flowing to Form 1040 line 7.
    pub line21: NodeRef,
    /// Carryforward to next year when line 21 is capped, split ST/LT
    /// (positive loss amounts).
    pub carryforward_short_term: Money,
    pub carryforward_long_term: Money,
}

/// Capital-gain distributions from 1099-DIV box 2a (long-term by rule).
pub fn capital_gain_distributions(model: &ReturnModel) -> Money {
    model
        .dividend_statements
        .iter()
        .map(|d| d.box2a_capital_gain_distributions)
        .sum()
}

pub fn compute(
    model: &ReturnModel,
    rules: &Rules2025,
    form8949: &Form8949Result,
    trace: &mut Trace,
) -> ScheduleDResult {
    let required = form8949.has_transactions()
        || capital_gain_distributions(model).is_positive()
        || model.capital_loss_carryforward.is_some();

    // Short-term: categories A/B/C plus any prior-year ST carryforward.
    let mut st_parts: Vec<NodeRef> = Vec::new();
    for category in [SaleCategory::A, SaleCategory::B, SaleCategory::C] {
        if let Some(totals) = form8949.category(category) {
            st_parts.push(totals.total_gain_loss.clone());
        }
    }
    let carryover = model.capital_loss_carryforward.clone().unwrap_or_default();
    if carryover.short_term.is_positive() {
        st_parts.push(trace.input(
            "scheduleD.line6",
            -carryover.short_term,
            "short-term capital loss carryover",
        ));
    }
    let line7 = {
        let refs: Vec<&NodeRef> = st_parts.iter().collect();
        trace.sum("scheduleD.line7", &refs)
    };

    // Long-term: categories D/E/F, distributions, LT carryforward.
    let mut lt_parts: Vec<NodeRef> = Vec::new();
    for category in [SaleCategory::D, SaleCategory::E, SaleCategory::F] {
        if let Some(totals) = form8949.category(category) {
            lt_parts.push(totals.total_gain_loss.clone());
        }
    }
    let line13 = trace.input(
        "scheduleD.line13",
        capital_gain_distributions(model),
        "1099-DIV box 2a totals",
    );
    if line13.amount.is_positive() {
        lt_parts.push(line13.clone());
    }
    if carryover.long_term.is_positive() {
        lt_parts.push(trace.input(
            "scheduleD.line14",
            -carryover.long_term,
            "long-term capital loss carryover",
        ));
    }
    let line15 = {
        let refs: Vec<&NodeRef> = lt_parts.iter().collect();
        trace.sum("scheduleD.line15", &refs)
    };

    let line16 = trace.sum("scheduleD.line16", &[&line7, &line15]);

    // Line 21: gains flow whole; losses are capped at $3,000 ($1,500 MFS)
    // with the excess carried forward, short-term first.
    let cap = rules.capital_loss_cap(model.filing_status);
    let (line21_amount, cf_st, cf_lt) = if line16.amount >= Money::ZERO {
        (line16.amount, Money::ZERO, Money::ZERO)
    } else {
        let total_loss = line16.amount.abs();
        let allowed = total_loss.min(cap);
        let st_loss = (-line7.amount).clamp_zero();
        let lt_loss = (-line15.amount).clamp_zero();
        // The allowed deduction absorbs the short-term loss first; a gain
        // on the other side already netted into line 16.
        let (cf_st, cf_lt) = if lt_loss.is_zero() {
            (total_loss - allowed, Money::ZERO)
        } else if st_loss.is_zero() {
            (Money::ZERO, total_loss - allowed)
        } else {
            let st_remaining = st_loss.saturating_sub(allowed);
            let lt_used = allowed.saturating_sub(st_loss);
            (st_remaining, lt_loss - lt_used)
        };
        (-allowed, cf_st, cf_lt)
    };

    let line21 = trace.worksheet(
        "scheduleD.line21",
        line21_amount,
        "capital loss limitation",
        &[&line16],
    );

    ScheduleDResult {
        required,
        line7,
        line13,
        line15,
        line16,
        line21,
        carryforward_short_term: cf_st,
        carryforward_long_term: cf_lt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CapitalLossCarryforward, SaleTransaction};
    use crate::schedules::form8949;
    use crate::types::{FilingStatus, PersonInfo};
    use pretty_assertions::assert_eq;

    fn base_model() -> ReturnModel {
        ReturnModel::single(PersonInfo {
            first_name: "Kai".to_string(),
            last_name: "Osei".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        })
    }

    fn sale(id: &str, category: SaleCategory, proceeds: i64, basis: i64) -> SaleTransaction {
        SaleTransaction {
            id: id.to_string(),
            description: format!("lot {id}"),
            acquired_date: None,
            sold_date: None,
            proceeds: Money::from_dollars(proceeds),
            reported_basis: Money::from_dollars(basis),
            adjusted_basis: None,
            long_term: category.is_long_term(),
            category,
            adjustment_code: None,
            adjustment_amount: Money::ZERO,
            wash_sale_loss_disallowed: Money::ZERO,
            rsu_vest_ref: None,
        }
    }

    fn run(model: &ReturnModel) -> ScheduleDResult {
        let rules = Rules2025::new();
        let mut trace = Trace::new();
        let f8949 = form8949::compute(model, &mut trace);
        compute(model, &rules, &f8949, &mut trace)
    }

    #[test]
    fn test_gain_flows_whole() {
        let mut model = base_model();
        model.sale_transactions = vec![
            sale("s1", SaleCategory::A, 2_000, 600),
            sale("s2", SaleCategory::D, 9_000, 4_000),
        ];
        let result = run(&model);
        assert_eq!(result.line7.amount, Money::from_dollars(1_400));
        assert_eq!(result.line15.amount, Money::from_dollars(5_000));
        assert_eq!(result.line21.amount, Money::from_dollars(6_400));
        assert_eq!(result.carryforward_long_term, Money::ZERO);
    }

    #[test]
    fn test_loss_capped_at_3000() {
        let mut model = base_model();
        model.sale_transactions = vec![sale("s1", SaleCategory::A, 1_000, 6_000)];
        let result = run(&model);
        assert_eq!(result.line16.amount, Money::from_dollars(-5_000));
        assert_eq!(result.line21.amount, Money::from_dollars(-3_000));
        assert_eq!(result.carryforward_short_term, Money::from_dollars(2_000));
        assert_eq!(result.carryforward_long_term, Money::ZERO);
    }

    #[test]
    fn test_loss_capped_at_1500_mfs() {
        let mut model = base_model();
        model.filing_status = FilingStatus::MarriedFilingSeparately;
        model.sale_transactions = vec![sale("s1", SaleCategory::A, 1_000, 6_000)];
        let result = run(&model);
        assert_eq!(result.line21.amount, Money::from_dollars(-1_500));
        assert_eq!(result.carryforward_short_term, Money::from_dollars(3_500));
    }

    #[test]
    fn test_distributions_only() {
        let mut model = base_model();
        model.dividend_statements = vec![crate::model::DividendStatement {
            id: "div-1".to_string(),
            owner: crate::types::Owner::Taxpayer,
            payer_name: "Broker".to_string(),
            payer_tin: "12-0000000".to_string(),
            box1a_ordinary_dividends: Money::ZERO,
            box1b_qualified_dividends: Money::ZERO,
            box2a_capital_gain_distributions: Money::from_dollars(500),
            box4_federal_withholding: Money::ZERO,
            box7_foreign_tax_paid: Money::ZERO,
            box11_exempt_interest_dividends: Money::ZERO,
        }];
        let result = run(&model);
        assert!(result.required);
        assert_eq!(result.line21.amount, Money::from_dollars(500));
    }

    #[test]
    fn test_prior_carryforward_applies() {
        let mut model = base_model();
        model.capital_loss_carryforward = Some(CapitalLossCarryforward {
            short_term: Money::from_dollars(1_000),
            long_term: Money::ZERO,
        });
        model.sale_transactions = vec![sale("s1", SaleCategory::A, 2_000, 1_500)];
        let result = run(&model);
        // $500 gain less $1,000 carryover = $500 net loss, under the cap.
        assert_eq!(result.line21.amount, Money::from_dollars(-500));
        assert_eq!(result.carryforward_short_term, Money::ZERO);
    }
}
