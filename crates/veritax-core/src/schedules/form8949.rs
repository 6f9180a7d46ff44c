//! Form 8949: Sales and Other Dispositions of Capital Assets.

use crate::model::{ReturnModel, SaleCategory, SaleTransaction};
use crate::money::Money;
use crate::trace::{NodeRef, Trace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One reported transaction row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRow {
    pub description: String,
    pub proceeds: Money,
    pub basis: Money,
    pub adjustment_code: Option<String>,
    pub adjustment_amount: Money,
    pub gain_loss: Money,
    pub document_id: String,
}

/// Aggregates for one category (A-F).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub category: SaleCategory,
    pub rows: Vec<TransactionRow>,
    pub total_proceeds: NodeRef,
    pub total_basis: NodeRef,
    pub total_adjustments: NodeRef,
    pub total_gain_loss: NodeRef,
}

/// Computed Form 8949: per-category rows and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form8949Result {
    /// Categories that have at least one transaction, in letter order.
    pub categories: BTreeMap<SaleCategory, CategoryTotals>,
}

impl Form8949Result {
    pub fn has_transactions(&self) -> bool {
        !self.categories.is_empty()
    }

    pub fn category(&self, category: SaleCategory) -> Option<&CategoryTotals> {
        self.categories.get(&category)
    }

    /// Net gain/loss for a category, zero when empty.
    pub fn category_gain_loss(&self, category: SaleCategory) -> Money {
        self.categories
            .get(&category)
            .map(|c| c.total_gain_loss.amount)
            .unwrap_or(Money::ZERO)
    }
}

fn row_from(txn: &SaleTransaction) -> TransactionRow {
    // Wash-sale disallowance is an adjustment too; fold it into the
    // reported adjustment column the way brokers print it (code W).
    let adjustment = txn.adjustment_amount + txn.wash_sale_loss_disallowed;
    TransactionRow {
        description: txn.description.clone(),
        proceeds: txn.proceeds,
        basis: txn.reported_basis,
        adjustment_code: txn.adjustment_code.clone().or_else(|| {
            txn.wash_sale_loss_disallowed
                .is_positive()
                .then(|| "W".to_string())
        }),
        adjustment_amount: adjustment,
        gain_loss: txn.gain_loss(),
        document_id: txn.id.clone(),
    }
}

pub fn compute(model: &ReturnModel, trace: &mut Trace) -> Form8949Result {
    let mut categories = BTreeMap::new();

    for &category in SaleCategory::all() {
        let transactions: Vec<&SaleTransaction> = model
            .sale_transactions
            .iter()
            .filter(|t| t.category == category)
            .collect();
        if transactions.is_empty() {
            continue;
        }

        let mut rows = Vec::with_capacity(transactions.len());
        let mut gain_parts = Vec::with_capacity(transactions.len());
        for (i, txn) in transactions.iter().copied().enumerate() {
            rows.push(row_from(txn));
            gain_parts.push(trace.input(
                format!("form8949.{category}.row{i}.gainLoss"),
                txn.gain_loss(),
                format!("sale {} ({})", txn.id, txn.description),
            ));
        }

        let total_proceeds = trace.input(
            format!("form8949.{category}.totalProceeds"),
            transactions.iter().map(|t| t.proceeds).sum(),
            format!("category {category} proceeds"),
        );
        let total_basis = trace.input(
            format!("form8949.{category}.totalBasis"),
            transactions.iter().map(|t| t.reported_basis).sum(),
            format!("category {category} reported basis"),
        );
        let total_adjustments = trace.input(
            format!("form8949.{category}.totalAdjustments"),
            rows.iter().map(|r| r.adjustment_amount).sum(),
            format!("category {category} adjustments"),
        );
        let total_gain_loss = {
            let refs: Vec<&NodeRef> = gain_parts.iter().collect();
            trace.sum(format!("form8949.{category}.totalGainLoss"), &refs)
        };

        categories.insert(
            category,
            CategoryTotals {
                category,
                rows,
                total_proceeds,
                total_basis,
                total_adjustments,
                total_gain_loss,
            },
        );
    }

    Form8949Result { categories }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PersonInfo;
    use pretty_assertions::assert_eq;

    fn base_model() -> ReturnModel {
        ReturnModel::single(PersonInfo {
            first_name: "Sam".to_string(),
            last_name: "Rivera".to_string(),
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

    #[test]
    fn test_categorization_and_totals() {
        let mut model = base_model();
        model.sale_transactions = vec![
            sale("s1", SaleCategory::A, 1_000, 700),
            sale("s2", SaleCategory::A, 2_000, 2_400),
            sale("s3", SaleCategory::E, 5_000, 1_000),
        ];
        let mut trace = Trace::new();
        let result = compute(&model, &mut trace);

        assert_eq!(result.categories.len(), 2);
        let a = result.category(SaleCategory::A).unwrap();
        assert_eq!(a.total_proceeds.amount, Money::from_dollars(3_000));
        assert_eq!(a.total_gain_loss.amount, Money::from_dollars(-100));
        assert_eq!(result.category_gain_loss(SaleCategory::E), Money::from_dollars(4_000));
        assert_eq!(result.category_gain_loss(SaleCategory::B), Money::ZERO);
    }

    #[test]
    fn test_wash_sale_row_gets_code_w() {
        let mut model = base_model();
        let mut txn = sale("w1", SaleCategory::B, 300, 1_000);
        txn.wash_sale_loss_disallowed = Money::from_dollars(700);
        model.sale_transactions = vec![txn];

        let mut trace = Trace::new();
        let result = compute(&model, &mut trace);
        let b = result.category(SaleCategory::B).unwrap();
        assert_eq!(b.rows[0].adjustment_code.as_deref(), Some("W"));
        assert_eq!(b.rows[0].gain_loss, Money::ZERO);
        assert_eq!(b.total_gain_loss.amount, Money::ZERO);
    }
}
