//! Quality gates: cross-form equalities and invariants checked after
//! every compute, collected into a report.

use crate::model::SaleCategory;
use crate::money::Money;
use crate::result::{FederalResult, GateReport};
use crate::states::StateComputeResult;
use crate::trace::Trace;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One gate: a named invariant and whether it held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateCheck {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

fn equal_gate(name: &str, left: Money, right: Money) -> GateCheck {
    GateCheck {
        name: name.to_string(),
        passed: left == right,
        detail: format!("{left} vs {right}"),
    }
}

/// Runs every gate against the computed return.
pub fn run_gates(
    federal: &FederalResult,
    state_results: &[StateComputeResult],
    trace: &Trace,
) -> GateReport {
    let mut gates = Vec::new();
    let f = &federal.form1040;

    gates.push(equal_gate(
        "scheduleB.line4 = form1040.line2b",
        federal.schedule_b.line4.amount,
        f.line2b.amount,
    ));
    gates.push(equal_gate(
        "scheduleB.line6 = form1040.line3b",
        federal.schedule_b.line6.amount,
        f.line3b.amount,
    ));

    if let Some(d) = &federal.schedule_d {
        gates.push(equal_gate(
            "scheduleD.line21 = form1040.line7",
            d.line21.amount,
            f.line7.amount,
        ));

        // Form 8949 category aggregates must reproduce the Schedule D
        // nets: A/B/C plus the short-term carryover row make line 7;
        // D/E/F plus distributions and the long-term carryover make
        // line 15.
        let st_categories: Money = [SaleCategory::A, SaleCategory::B, SaleCategory::C]
            .iter()
            .map(|c| federal.form8949.category_gain_loss(*c))
            .sum();
        let st_carryover = trace
            .get("scheduleD.line6")
            .map(|v| v.amount)
            .unwrap_or(Money::ZERO);
        gates.push(equal_gate(
            "form8949 A/B/C totals (+carryover) = scheduleD.line7",
            st_categories + st_carryover,
            d.line7.amount,
        ));

        let lt_categories: Money = [SaleCategory::D, SaleCategory::E, SaleCategory::F]
            .iter()
            .map(|c| federal.form8949.category_gain_loss(*c))
            .sum();
        let lt_carryover = trace
            .get("scheduleD.line14")
            .map(|v| v.amount)
            .unwrap_or(Money::ZERO);
        gates.push(equal_gate(
            "form8949 D/E/F totals (+distributions, carryover) = scheduleD.line15",
            lt_categories + d.line13.amount + lt_carryover,
            d.line15.amount,
        ));
    }

    gates.push(equal_gate(
        "schedule1.line10 = form1040.line8",
        federal.schedule1.additional_income.amount,
        f.line8.amount,
    ));

    if let Some(se) = &federal.schedule_se {
        gates.push(equal_gate(
            "scheduleSE.deductibleHalf = schedule1 half-SE",
            se.deductible_half.amount,
            federal.schedule1.half_se_tax.amount,
        ));
    }

    if let Some(hsa) = &federal.form8889 {
        gates.push(equal_gate(
            "form8889.deduction = schedule1 HSA deduction",
            hsa.deduction.amount,
            federal.schedule1.hsa_deduction.amount,
        ));
    }

    gates.push(equal_gate(
        "form8812.refundable = form1040.line28",
        federal.form8812.refundable.amount,
        f.line28.amount,
    ));

    for state in state_results {
        let prefix = format!("{}:", state.state_code);
        gates.push(GateCheck {
            name: format!("{prefix} taxAfterCredits >= 0"),
            passed: state.tax_after_credits.amount >= Money::ZERO,
            detail: state.tax_after_credits.amount.to_string(),
        });
        gates.push(equal_gate(
            &format!("{prefix} overpaid = max(0, payments - tax)"),
            state.overpaid.amount,
            state
                .total_payments
                .amount
                .saturating_sub(state.tax_after_credits.amount),
        ));
        gates.push(equal_gate(
            &format!("{prefix} amountOwed = max(0, tax - payments)"),
            state.amount_owed.amount,
            state
                .tax_after_credits
                .amount
                .saturating_sub(state.total_payments.amount),
        ));
        gates.push(GateCheck {
            name: format!("{prefix} overpaid x amountOwed = 0"),
            passed: state.overpaid.amount.is_zero() || state.amount_owed.amount.is_zero(),
            detail: format!("{} / {}", state.overpaid.amount, state.amount_owed.amount),
        });
        gates.push(GateCheck {
            name: format!("{prefix} apportionmentRatio in [0, 1]"),
            passed: state.apportionment_ratio >= Decimal::ZERO
                && state.apportionment_ratio <= Decimal::ONE,
            detail: state.apportionment_ratio.to_string(),
        });
    }

    // Every exposed line value must agree with the trace map entry the
    // renderer will read.
    let mut line_map_ok = true;
    let mut mismatch = String::new();
    for id in [
        "form1040.line2b",
        "form1040.line7",
        "form1040.line11",
        "form1040.line15",
        "form1040.line16",
        "form1040.line24",
        "form1040.line33",
        "form1040.line34",
        "form1040.line37",
    ] {
        let label = id.trim_start_matches("form1040.line");
        let exposed = f.line(label).map(|n| n.amount);
        let traced = trace.get(id).map(|v| v.amount);
        if exposed != traced {
            line_map_ok = false;
            mismatch = format!("{id}: {exposed:?} vs {traced:?}");
            break;
        }
    }
    gates.push(GateCheck {
        name: "exposed line values match the trace map".to_string(),
        passed: line_map_ok,
        detail: if line_map_ok { "ok".to_string() } else { mismatch },
    });

    gates.push(GateCheck {
        name: "form1040 overpaid x amountOwed = 0".to_string(),
        passed: f.line34.amount.is_zero() || f.line37.amount.is_zero(),
        detail: format!("{} / {}", f.line34.amount, f.line37.amount),
    });

    GateReport { gates }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form1040;
    use crate::model::{ReturnModel, WageStatement};
    use crate::types::{Owner, PersonInfo};

    #[test]
    fn test_gates_pass_for_simple_return() {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Fen".to_string(),
            last_name: "Ishak".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.wage_statements = vec![WageStatement {
            id: "w2".to_string(),
            owner: Owner::Taxpayer,
            employer_name: "Acme".to_string(),
            employer_ein: "12-3456789".to_string(),
            box1_wages: Money::from_dollars(75_000),
            box2_federal_withholding: Money::from_dollars(8_000),
            box3_social_security_wages: Money::from_dollars(75_000),
            box4_social_security_withheld: Money::ZERO,
            box5_medicare_wages: Money::from_dollars(75_000),
            box6_medicare_withheld: Money::ZERO,
            box12: Vec::new(),
            retirement_plan: false,
            third_party_sick_pay: false,
            state_rows: Vec::new(),
        }];

        let mut trace = Trace::new();
        let federal = form1040::compute(&model, &mut trace).unwrap();
        let report = run_gates(&federal, &[], &trace);
        assert!(report.all_passed(), "failed gates: {:?}", report.gates.iter().filter(|g| !g.passed).collect::<Vec<_>>());
    }

    #[test]
    fn test_aggregation_gates_cover_8949_and_8889() {
        use crate::model::{HsaCoverage, HsaInfo, SaleCategory, SaleTransaction};

        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Remy".to_string(),
            last_name: "Ishak".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.wage_statements = vec![WageStatement {
            id: "w2".to_string(),
            owner: Owner::Taxpayer,
            employer_name: "Acme".to_string(),
            employer_ein: "12-3456789".to_string(),
            box1_wages: Money::from_dollars(90_000),
            box2_federal_withholding: Money::from_dollars(12_000),
            box3_social_security_wages: Money::from_dollars(90_000),
            box4_social_security_withheld: Money::ZERO,
            box5_medicare_wages: Money::from_dollars(90_000),
            box6_medicare_withheld: Money::ZERO,
            box12: Vec::new(),
            retirement_plan: false,
            third_party_sick_pay: false,
            state_rows: Vec::new(),
        }];
        model.sale_transactions = vec![
            SaleTransaction {
                id: "s1".to_string(),
                description: "lot s1".to_string(),
                acquired_date: None,
                sold_date: None,
                proceeds: Money::from_dollars(5_000),
                reported_basis: Money::from_dollars(3_000),
                adjusted_basis: None,
                long_term: false,
                category: SaleCategory::A,
                adjustment_code: None,
                adjustment_amount: Money::ZERO,
                wash_sale_loss_disallowed: Money::ZERO,
                rsu_vest_ref: None,
            },
            SaleTransaction {
                id: "s2".to_string(),
                description: "lot s2".to_string(),
                acquired_date: None,
                sold_date: None,
                proceeds: Money::from_dollars(8_000),
                reported_basis: Money::from_dollars(2_000),
                adjusted_basis: None,
                long_term: true,
                category: SaleCategory::E,
                adjustment_code: None,
                adjustment_amount: Money::ZERO,
                wash_sale_loss_disallowed: Money::ZERO,
                rsu_vest_ref: None,
            },
        ];
        model.hsa = Some(HsaInfo {
            coverage: HsaCoverage::SelfOnly,
            taxpayer_contributions: Money::from_dollars(2_000),
            qualified_medical_expenses: Money::ZERO,
            age_55_or_older: false,
            age_65_or_disabled: false,
        });

        let mut trace = Trace::new();
        let federal = form1040::compute(&model, &mut trace).unwrap();
        let report = run_gates(&federal, &[], &trace);

        let names: Vec<&str> = report.gates.iter().map(|g| g.name.as_str()).collect();
        assert!(names.iter().any(|n| n.contains("form8949 A/B/C")));
        assert!(names.iter().any(|n| n.contains("form8949 D/E/F")));
        assert!(names.iter().any(|n| n.contains("form8889.deduction")));
        assert!(report.all_passed(), "failed gates: {:?}", report.gates.iter().filter(|g| !g.passed).collect::<Vec<_>>());
    }
}
