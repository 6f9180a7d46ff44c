//! States with no personal income tax (FL, TX, WA): zero tax, but the
//! apportionment still computes and stray withholding surfaces as a
//! disclosure.

use crate::error::TaxResult;
use crate::model::{ReturnModel, StateReturnConfig};
use crate::money::Money;
use crate::result::FederalResult;
use crate::states::{self, StateComputeResult, StateDetail, StateModule};
use crate::trace::Trace;

pub struct NoIncomeTaxState {
    pub code: &'static str,
    pub label: &'static str,
}

impl StateModule for NoIncomeTaxState {
    fn state_code(&self) -> &'static str {
        self.code
    }

    fn form_label(&self) -> &'static str {
        self.label
    }

    fn sidebar_label(&self) -> &'static str {
        self.label
    }

    fn compute(
        &self,
        model: &ReturnModel,
        federal: &FederalResult,
        config: &StateReturnConfig,
        trace: &mut Trace,
    ) -> TaxResult<StateComputeResult> {
        let prefix = format!("state{}", self.code.to_lowercase());
        let ratio = states::apportionment_ratio(config)?;
        let mut disclosures = Vec::new();

        let state_agi = trace.rebind(&federal.form1040.line11, format!("{prefix}.stateAgi"));
        let taxable = trace.literal(
            format!("{prefix}.taxableIncome"),
            Money::ZERO,
            "no state income tax",
        );
        let state_tax = trace.literal(format!("{prefix}.tax"), Money::ZERO, "no state income tax");
        let tax_after_credits = trace.literal(
            format!("{prefix}.taxAfterCredits"),
            Money::ZERO,
            "no state income tax",
        );

        let withholding = states::withholding_node(model, self.code, &prefix, trace);
        let total_payments = trace.rebind(&withholding, format!("{prefix}.totalPayments"));
        let (overpaid, amount_owed) =
            states::reconcile(&prefix, &tax_after_credits, &total_payments, trace);

        let withholding_present = withholding.amount.is_positive();
        if withholding_present {
            disclosures.push(format!(
                "{} has no personal income tax but W-2 withholding was reported; \
                 verify box 15 on the wage statement",
                self.code
            ));
        }

        Ok(StateComputeResult {
            state_code: self.code.to_string(),
            form_label: self.label.to_string(),
            residency_type: config.residency_type,
            apportionment_ratio: ratio,
            state_agi,
            state_taxable_income: taxable,
            state_tax,
            tax_after_credits,
            state_withholding: withholding,
            total_payments,
            overpaid,
            amount_owed,
            detail: StateDetail::NoIncomeTax { withholding_present },
            disclosures,
            requires_income_tax_filing: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form1040;
    use crate::model::{W2StateRow, WageStatement};
    use crate::states::get_state_module;
    use crate::trace::Trace;
    use crate::types::{Owner, PersonInfo};
    use pretty_assertions::assert_eq;

    fn fl_model(withholding: i64) -> ReturnModel {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Pia".to_string(),
            last_name: "Cruz".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.wage_statements = vec![WageStatement {
            id: "w2".to_string(),
            owner: Owner::Taxpayer,
            employer_name: "Gulf Coast Co".to_string(),
            employer_ein: "12-3456789".to_string(),
            box1_wages: Money::from_dollars(70_000),
            box2_federal_withholding: Money::from_dollars(7_000),
            box3_social_security_wages: Money::from_dollars(70_000),
            box4_social_security_withheld: Money::ZERO,
            box5_medicare_wages: Money::from_dollars(70_000),
            box6_medicare_withheld: Money::ZERO,
            box12: Vec::new(),
            retirement_plan: false,
            third_party_sick_pay: false,
            state_rows: vec![W2StateRow {
                box15_state: "FL".to_string(),
                box16_state_wages: Money::from_dollars(70_000),
                box17_state_withholding: Money::from_dollars(withholding),
            }],
        }];
        model.state_returns = vec![StateReturnConfig::full_year("FL")];
        model
    }

    #[test]
    fn test_zero_tax_and_withholding_disclosure() {
        let model = fl_model(500);
        let mut trace = Trace::new();
        let federal = form1040::compute(&model, &mut trace).unwrap();
        let module = get_state_module("FL").unwrap();
        let result = module
            .compute(&model, &federal, &model.state_returns[0], &mut trace)
            .unwrap();

        assert_eq!(result.state_tax.amount, Money::ZERO);
        assert!(!result.requires_income_tax_filing);
        // The stray withholding refunds in full and is disclosed.
        assert_eq!(result.overpaid.amount, Money::from_dollars(500));
        assert!(!result.disclosures.is_empty());
        match result.detail {
            StateDetail::NoIncomeTax { withholding_present } => assert!(withholding_present),
            ref other => panic!("unexpected detail: {other:?}"),
        }
    }

    #[test]
    fn test_clean_return_has_no_disclosure() {
        let model = fl_model(0);
        let mut trace = Trace::new();
        let federal = form1040::compute(&model, &mut trace).unwrap();
        let module = get_state_module("FL").unwrap();
        let result = module
            .compute(&model, &federal, &model.state_returns[0], &mut trace)
            .unwrap();
        assert!(result.disclosures.is_empty());
        assert_eq!(result.overpaid.amount, Money::ZERO);
        assert_eq!(result.amount_owed.amount, Money::ZERO);
    }
}
