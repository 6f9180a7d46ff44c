//! State engine: per-state modules behind a common trait, dispatched by
//! state code, each producing a `StateComputeResult`.

mod az;
mod ca;
mod co;
mod dc;
mod il;
mod ma;
mod md;
mod nc;
mod nj;
mod no_tax;
mod ny;
mod pa;
mod va;

use crate::error::{TaxError, TaxResult};
use crate::model::{ResidencyType, ReturnModel, StateReturnConfig};
use crate::money::Money;
use crate::result::FederalResult;
use crate::trace::{NodeRef, Trace};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One section of the state review screen (labels plus node ids).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSection {
    pub title: String,
    pub node_ids: Vec<String>,
}

/// One line in the state result summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResultLine {
    pub label: String,
    pub node_id: String,
}

/// State-specific detail, a sum type keyed by state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StateDetail {
    California {
        exemption_credits: Money,
        renters_credit: Money,
        mental_health_surcharge: Money,
    },
    NewYork {
        dependent_exemptions: Money,
        household_credit: Money,
    },
    NewJersey {
        exemptions: Money,
        property_tax_deduction: Money,
    },
    Virginia {
        age_deduction: Money,
        reciprocity_applied: bool,
    },
    Maryland {
        county_tax: Money,
        reciprocity_applied: bool,
    },
    DistrictOfColumbia {
        reciprocity_applied: bool,
    },
    Massachusetts {
        surtax: Money,
        rental_deduction: Money,
    },
    Illinois {
        exemption_allowance: Money,
        retirement_subtraction: Money,
    },
    Pennsylvania {
        taxable_compensation: Money,
    },
    Colorado {
        social_security_subtraction: Money,
    },
    Arizona {
        dependent_credit: Money,
    },
    NorthCarolina {
        standard_deduction: Money,
    },
    NoIncomeTax {
        withholding_present: bool,
    },
}

/// The computed state return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateComputeResult {
    pub state_code: String,
    pub form_label: String,
    pub residency_type: ResidencyType,
    /// Scale-4 ratio in [0, 1].
    pub apportionment_ratio: Decimal,
    pub state_agi: NodeRef,
    pub state_taxable_income: NodeRef,
    pub state_tax: NodeRef,
    pub tax_after_credits: NodeRef,
    pub state_withholding: NodeRef,
    pub total_payments: NodeRef,
    pub overpaid: NodeRef,
    pub amount_owed: NodeRef,
    pub detail: StateDetail,
    pub disclosures: Vec<String>,
    pub requires_income_tax_filing: bool,
}

/// A registered state module.
pub trait StateModule: Send + Sync {
    fn state_code(&self) -> &'static str;
    fn form_label(&self) -> &'static str;
    fn sidebar_label(&self) -> &'static str;

    fn compute(
        &self,
        model: &ReturnModel,
        federal: &FederalResult,
        config: &StateReturnConfig,
        trace: &mut Trace,
    ) -> TaxResult<StateComputeResult>;

    fn review_layout(&self) -> Vec<ReviewSection> {
        Vec::new()
    }

    fn review_result_lines(&self) -> Vec<ReviewResultLine> {
        vec![
            ReviewResultLine {
                label: "State AGI".to_string(),
                node_id: format!("{}.stateAgi", self.node_prefix()),
            },
            ReviewResultLine {
                label: "Tax after credits".to_string(),
                node_id: format!("{}.taxAfterCredits", self.node_prefix()),
            },
        ]
    }

    /// Trace node prefix, derived from the form label ("form540", ...).
    fn node_prefix(&self) -> String {
        self.form_label()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase()
    }
}

static CA: ca::California = ca::California;
static NY: ny::NewYork = ny::NewYork;
static NJ: nj::NewJersey = nj::NewJersey;
static VA: va::Virginia = va::Virginia;
static MD: md::Maryland = md::Maryland;
static DC: dc::DistrictOfColumbia = dc::DistrictOfColumbia;
static MA: ma::Massachusetts = ma::Massachusetts;
static IL: il::Illinois = il::Illinois;
static PA: pa::Pennsylvania = pa::Pennsylvania;
static CO: co::Colorado = co::Colorado;
static AZ: az::Arizona = az::Arizona;
static NC: nc::NorthCarolina = nc::NorthCarolina;
static FL: no_tax::NoIncomeTaxState = no_tax::NoIncomeTaxState {
    code: "FL",
    label: "FL (no income tax)",
};
static TX: no_tax::NoIncomeTaxState = no_tax::NoIncomeTaxState {
    code: "TX",
    label: "TX (no income tax)",
};
static WA: no_tax::NoIncomeTaxState = no_tax::NoIncomeTaxState {
    code: "WA",
    label: "WA (no income tax)",
};

/// Looks up a registered module; unknown codes return `None` and the
/// caller decides the fallback.
pub fn get_state_module(code: &str) -> Option<&'static dyn StateModule> {
    match code {
        "CA" => Some(&CA),
        "NY" => Some(&NY),
        "NJ" => Some(&NJ),
        "VA" => Some(&VA),
        "MD" => Some(&MD),
        "DC" => Some(&DC),
        "MA" => Some(&MA),
        "IL" => Some(&IL),
        "PA" => Some(&PA),
        "CO" => Some(&CO),
        "AZ" => Some(&AZ),
        "NC" => Some(&NC),
        "FL" => Some(&FL),
        "TX" => Some(&TX),
        "WA" => Some(&WA),
        _ => None,
    }
}

/// Every registered module, in registry order.
pub fn all_state_modules() -> Vec<&'static dyn StateModule> {
    ["CA", "NY", "NJ", "VA", "MD", "DC", "MA", "IL", "PA", "CO", "AZ", "NC", "FL", "TX", "WA"]
        .iter()
        .filter_map(|code| get_state_module(code))
        .collect()
}

/// Days in the tax year (2025 is not a leap year).
const DAYS_IN_YEAR: i64 = 365;

/// Apportionment ratio per residency: 1.0 full-year, 0.0 nonresident,
/// inclusive-day-count / 365 for part-year, scale-4, clamped to [0, 1].
pub fn apportionment_ratio(config: &StateReturnConfig) -> TaxResult<Decimal> {
    use chrono::NaiveDate;
    match config.residency_type {
        ResidencyType::FullYear => Ok(Decimal::ONE),
        ResidencyType::Nonresident => Ok(Decimal::ZERO),
        ResidencyType::PartYear => {
            let year_start = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
            let year_end = NaiveDate::from_ymd_opt(2025, 12, 31).expect("valid date");
            let start = config.move_in_date.unwrap_or(year_start).max(year_start);
            let end = config.move_out_date.unwrap_or(year_end).min(year_end);
            if end < start {
                return Err(TaxError::model_invalid(
                    format!("stateReturns[{}]", config.state_code),
                    "move-out date precedes move-in date",
                ));
            }
            let days = (end - start).num_days() + 1;
            let ratio = Decimal::new(days, 0) / Decimal::new(DAYS_IN_YEAR, 0);
            Ok(ratio
                .round_dp(4)
                .clamp(Decimal::ZERO, Decimal::ONE))
        }
    }
}

/// Applies the apportionment ratio to an amount (half-even to cents).
pub(crate) fn apportion(amount: Money, ratio: Decimal) -> Money {
    amount.mul_rate(ratio, crate::money::Rounding::HalfEven)
}

/// W-2 box 17 withholding whose box 15 matches the state.
pub(crate) fn withholding_node(
    model: &ReturnModel,
    code: &str,
    prefix: &str,
    trace: &mut Trace,
) -> NodeRef {
    let total: Money = model
        .wage_statements
        .iter()
        .map(|w| w.state_withholding_for(code))
        .sum();
    trace.input(
        format!("{prefix}.withholding"),
        total,
        format!("W-2 box 17 rows with box 15 = {code}"),
    )
}

/// W-2 box 16 wages sourced to the state (nonresident base).
pub(crate) fn sourced_wages(model: &ReturnModel, code: &str) -> Money {
    model
        .wage_statements
        .iter()
        .map(|w| w.state_wages_for(code))
        .sum()
}

/// Standard overpaid/owed reconciliation: exactly one side is non-zero.
pub(crate) fn reconcile(
    prefix: &str,
    tax_after_credits: &NodeRef,
    total_payments: &NodeRef,
    trace: &mut Trace,
) -> (NodeRef, NodeRef) {
    let over_raw = trace.sub(format!("{prefix}.overpaidRaw"), total_payments, tax_after_credits);
    let overpaid = trace.clamp_zero(format!("{prefix}.overpaid"), &over_raw);
    let owed_raw = trace.sub(format!("{prefix}.owedRaw"), tax_after_credits, total_payments);
    let owed = trace.clamp_zero(format!("{prefix}.amountOwed"), &owed_raw);
    (overpaid, owed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_registry_lookup() {
        assert!(get_state_module("CA").is_some());
        assert!(get_state_module("ZZ").is_none());
        assert_eq!(all_state_modules().len(), 15);
    }

    #[test]
    fn test_full_year_ratio() {
        let config = StateReturnConfig::full_year("CA");
        assert_eq!(apportionment_ratio(&config).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_part_year_ratio() {
        let mut config = StateReturnConfig::full_year("CA");
        config.residency_type = ResidencyType::PartYear;
        config.move_in_date = NaiveDate::from_ymd_opt(2025, 7, 1);
        // July 1 through Dec 31 inclusive = 184 days.
        let ratio = apportionment_ratio(&config).unwrap();
        assert_eq!(ratio, dec!(0.5041));
    }

    #[test]
    fn test_inverted_dates_rejected() {
        let mut config = StateReturnConfig::full_year("CA");
        config.residency_type = ResidencyType::PartYear;
        config.move_in_date = NaiveDate::from_ymd_opt(2025, 8, 1);
        config.move_out_date = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert!(apportionment_ratio(&config).is_err());
    }

    #[test]
    fn test_nonresident_ratio_zero() {
        let mut config = StateReturnConfig::full_year("TX");
        config.residency_type = ResidencyType::Nonresident;
        assert_eq!(apportionment_ratio(&config).unwrap(), Decimal::ZERO);
    }
}
