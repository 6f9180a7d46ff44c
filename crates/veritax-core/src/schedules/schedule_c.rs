//! Schedule C: Profit or Loss From Business.

use crate::model::ReturnModel;
use crate::money::Money;
use crate::schedules::form8829::{self, Form8829Result};
use crate::trace::{NodeRef, Trace};
use crate::types::Owner;
use serde::{Deserialize, Serialize};

/// Computed Schedule C for one business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleCBusiness {
    pub business_id: String,
    pub owner: Owner,
    pub is_sstb: bool,
    /// Line 5: gross profit (receipts − returns − COGS).
    pub gross_profit: NodeRef,
    /// Line 7: gross income (gross profit + other income).
    pub gross_income: NodeRef,
    /// Line 28: total expenses (meals at 50%).
    pub total_expenses: NodeRef,
    /// Line 29: tentative profit.
    pub tentative_profit: NodeRef,
    /// Line 30: home-office deduction, when one applies.
    pub home_office: Option<Form8829Result>,
    /// Line 31: net profit or loss.
    pub net_profit: NodeRef,
    /// Health-insurance premiums for the SE-health-insurance adjustment.
    pub health_insurance_premiums: Money,
    /// SEP/SIMPLE contributions for the Schedule 1 adjustment.
    pub sep_simple_contributions: Money,
}

/// All Schedule C businesses on the return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleCResult {
    pub businesses: Vec<ScheduleCBusiness>,
    /// Sum of net profits across businesses.
    pub total_net_profit: NodeRef,
}

impl ScheduleCResult {
    /// Net profit attributable to one filer.
    pub fn net_profit_for(&self, owner: Owner) -> Money {
        self.businesses
            .iter()
            .filter(|b| b.owner == owner)
            .map(|b| b.net_profit.amount)
            .sum()
    }
}

pub fn compute(model: &ReturnModel, trace: &mut Trace) -> ScheduleCResult {
    let mut businesses = Vec::with_capacity(model.businesses.len());

    for (i, biz) in model.businesses.iter().enumerate() {
        let prefix = format!("scheduleC.{i}");

        let receipts = trace.input(
            format!("{prefix}.grossReceipts"),
            biz.gross_receipts,
            format!("{} gross receipts", biz.name),
        );
        let returns = trace.input(
            format!("{prefix}.returns"),
            biz.returns_and_allowances,
            format!("{} returns and allowances", biz.name),
        );
        let cogs = trace.input(
            format!("{prefix}.cogs"),
            biz.cost_of_goods_sold,
            format!("{} cost of goods sold", biz.name),
        );
        let after_returns = trace.sub(format!("{prefix}.netReceipts"), &receipts, &returns);
        let gross_profit = trace.sub(format!("{prefix}.grossProfit"), &after_returns, &cogs);

        let other_income = trace.input(
            format!("{prefix}.otherIncome"),
            biz.other_income,
            format!("{} other income", biz.name),
        );
        let gross_income = trace.sum(format!("{prefix}.grossIncome"), &[&gross_profit, &other_income]);

        let total_expenses = trace.input(
            format!("{prefix}.totalExpenses"),
            biz.expenses.total(),
            format!("{} expense categories, meals at 50%", biz.name),
        );
        let tentative_profit =
            trace.sub(format!("{prefix}.tentativeProfit"), &gross_income, &total_expenses);

        let home_office = biz
            .home_office
            .as_ref()
            .map(|worksheet| form8829::compute(worksheet, &format!("biz{i}"), &tentative_profit, trace));

        let net_profit = match &home_office {
            Some(ho) => trace.sub(format!("{prefix}.netProfit"), &tentative_profit, &ho.deduction),
            None => trace.rebind(&tentative_profit, format!("{prefix}.netProfit")),
        };

        businesses.push(ScheduleCBusiness {
            business_id: biz.id.clone(),
            owner: biz.owner,
            is_sstb: biz.is_sstb,
            gross_profit,
            gross_income,
            total_expenses,
            tentative_profit,
            home_office,
            net_profit,
            health_insurance_premiums: biz.health_insurance_premiums,
            sep_simple_contributions: biz.sep_simple_contributions,
        });
    }

    let total_net_profit = {
        let parts: Vec<&NodeRef> = businesses.iter().map(|b| &b.net_profit).collect();
        trace.sum("scheduleC.totalNetProfit", &parts)
    };

    ScheduleCResult {
        businesses,
        total_net_profit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AccountingMethod, BusinessExpenses, HomeOfficeMethod, HomeOfficeWorksheet,
        SelfEmploymentBusiness,
    };
    use crate::types::PersonInfo;
    use pretty_assertions::assert_eq;

    fn business(receipts: i64, expenses: BusinessExpenses) -> SelfEmploymentBusiness {
        SelfEmploymentBusiness {
            id: "biz-1".to_string(),
            name: "Design Studio".to_string(),
            principal_business_code: "541400".to_string(),
            ein: None,
            owner: Owner::Taxpayer,
            accounting_method: AccountingMethod::Cash,
            gross_receipts: Money::from_dollars(receipts),
            returns_and_allowances: Money::ZERO,
            cost_of_goods_sold: Money::ZERO,
            other_income: Money::ZERO,
            expenses,
            is_sstb: false,
            has_inventory: false,
            home_office: None,
            health_insurance_premiums: Money::ZERO,
            sep_simple_contributions: Money::ZERO,
        }
    }

    fn model_with(businesses: Vec<SelfEmploymentBusiness>) -> ReturnModel {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Noor".to_string(),
            last_name: "Haddad".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.businesses = businesses;
        model
    }

    #[test]
    fn test_net_profit_flow() {
        let expenses = BusinessExpenses {
            supplies: Money::from_dollars(5_000),
            meals: Money::from_dollars(2_000),
            ..BusinessExpenses::default()
        };
        let model = model_with(vec![business(80_000, expenses)]);
        let mut trace = Trace::new();
        let result = compute(&model, &mut trace);

        let biz = &result.businesses[0];
        assert_eq!(biz.gross_profit.amount, Money::from_dollars(80_000));
        // 5,000 + 50% of 2,000 = 6,000
        assert_eq!(biz.total_expenses.amount, Money::from_dollars(6_000));
        assert_eq!(biz.net_profit.amount, Money::from_dollars(74_000));
        assert_eq!(result.total_net_profit.amount, Money::from_dollars(74_000));
    }

    #[test]
    fn test_home_office_reduces_net() {
        let mut biz = business(30_000, BusinessExpenses::default());
        biz.home_office = Some(HomeOfficeWorksheet {
            method: HomeOfficeMethod::Simplified,
            business_area_sqft: 100,
            total_area_sqft: 1_000,
            direct_expenses: Default::default(),
            indirect_expenses: Default::default(),
            depreciation: Money::ZERO,
            allocatable_mortgage_interest: Money::ZERO,
            allocatable_real_estate_taxes: Money::ZERO,
        });
        let model = model_with(vec![biz]);
        let mut trace = Trace::new();
        let result = compute(&model, &mut trace);
        // 100 sq ft x $5 = $500
        assert_eq!(
            result.businesses[0].net_profit.amount,
            Money::from_dollars(29_500)
        );
    }

    #[test]
    fn test_owner_attribution() {
        let mut taxpayer_biz = business(40_000, BusinessExpenses::default());
        taxpayer_biz.id = "t".to_string();
        let mut spouse_biz = business(10_000, BusinessExpenses::default());
        spouse_biz.id = "s".to_string();
        spouse_biz.owner = Owner::Spouse;

        let model = model_with(vec![taxpayer_biz, spouse_biz]);
        let mut trace = Trace::new();
        let result = compute(&model, &mut trace);
        assert_eq!(result.net_profit_for(Owner::Taxpayer), Money::from_dollars(40_000));
        assert_eq!(result.net_profit_for(Owner::Spouse), Money::from_dollars(10_000));
    }
}
