//! Schedule B: Interest and Ordinary Dividends.

use crate::model::ReturnModel;
use crate::money::Money;
use crate::rules::Rules2025;
use crate::trace::{NodeRef, Trace};
use serde::{Deserialize, Serialize};

/// One payer row on Schedule B.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerItem {
    pub payer_name: String,
    pub payer_tin: String,
    pub amount: Money,
    /// Source-document id this row came from.
    pub document_id: String,
}

/// Computed Schedule B.
///
/// Lines 4 and 6 are always produced (Form 1040 lines 2b/3b read them);
/// `required` says whether the schedule itself must be attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleBResult {
    pub required: bool,
    /// Line 4: total taxable interest.
    pub line4: NodeRef,
    /// Line 6: total ordinary dividends.
    pub line6: NodeRef,
    pub interest_items: Vec<PayerItem>,
    pub dividend_items: Vec<PayerItem>,
    /// Tax-exempt interest (Form 1040 line 2a; 1099-INT box 8 plus
    /// exempt-interest dividends).
    pub tax_exempt_interest: NodeRef,
}

pub fn compute(model: &ReturnModel, rules: &Rules2025, trace: &mut Trace) -> ScheduleBResult {
    let mut interest_parts = Vec::new();
    let mut interest_items = Vec::new();
    for (i, stmt) in model.interest_statements.iter().enumerate() {
        let node = trace.input(
            format!("scheduleB.interest.{i}"),
            stmt.taxable_interest(),
            format!("1099-INT boxes 1+3 from {}", stmt.payer_name),
        );
        interest_items.push(PayerItem {
            payer_name: stmt.payer_name.clone(),
            payer_tin: stmt.payer_tin.clone(),
            amount: node.amount,
            document_id: stmt.id.clone(),
        });
        interest_parts.push(node);
    }

    let mut dividend_parts = Vec::new();
    let mut dividend_items = Vec::new();
    for (i, stmt) in model.dividend_statements.iter().enumerate() {
        let node = trace.input(
            format!("scheduleB.dividend.{i}"),
            stmt.box1a_ordinary_dividends,
            format!("1099-DIV box 1a from {}", stmt.payer_name),
        );
        dividend_items.push(PayerItem {
            payer_name: stmt.payer_name.clone(),
            payer_tin: stmt.payer_tin.clone(),
            amount: node.amount,
            document_id: stmt.id.clone(),
        });
        dividend_parts.push(node);
    }

    // K-1 interest joins line 4 (conservatively ordinary, like the
    // dividend treatment below).
    for (i, k1) in model.k1_passthroughs.iter().enumerate() {
        if k1.box5_interest.is_positive() {
            let node = trace.input(
                format!("scheduleB.k1Interest.{i}"),
                k1.box5_interest,
                format!("K-1 box 5 from {}", k1.entity_name),
            );
            interest_items.push(PayerItem {
                payer_name: k1.entity_name.clone(),
                payer_tin: k1.entity_ein.clone(),
                amount: node.amount,
                document_id: k1.id.clone(),
            });
            interest_parts.push(node);
        }
        if k1.box6a_dividends.is_positive() {
            let node = trace.input(
                format!("scheduleB.k1Dividend.{i}"),
                k1.box6a_dividends,
                format!("K-1 box 6a from {}", k1.entity_name),
            );
            dividend_items.push(PayerItem {
                payer_name: k1.entity_name.clone(),
                payer_tin: k1.entity_ein.clone(),
                amount: node.amount,
                document_id: k1.id.clone(),
            });
            dividend_parts.push(node);
        }
    }

    let line4 = {
        let refs: Vec<&NodeRef> = interest_parts.iter().collect();
        trace.sum("scheduleB.line4", &refs)
    };
    let line6 = {
        let refs: Vec<&NodeRef> = dividend_parts.iter().collect();
        trace.sum("scheduleB.line6", &refs)
    };

    let exempt_total: Money = model
        .interest_statements
        .iter()
        .map(|s| s.box8_tax_exempt_interest)
        .sum::<Money>()
        + model
            .dividend_statements
            .iter()
            .map(|d| d.box11_exempt_interest_dividends)
            .sum::<Money>();
    let tax_exempt_interest = trace.input(
        "scheduleB.taxExemptInterest",
        exempt_total,
        "1099-INT box 8 and 1099-DIV box 11 totals",
    );

    // Strictly greater than $1,500 on either side.
    let threshold = rules.schedule_b_threshold();
    let required = line4.amount > threshold || line6.amount > threshold;

    ScheduleBResult {
        required,
        line4,
        line6,
        interest_items,
        dividend_items,
        tax_exempt_interest,
    }
}
