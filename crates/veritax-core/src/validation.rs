//! Non-blocking validation: data anomalies surface as diagnostics while
//! the engine still produces a full, best-effort result.

use crate::model::{DistributionCode, ReturnModel};
use crate::money::Money;
use crate::result::FederalResult;
use crate::rules::Rules2025;
use crate::types::{FilingStatus, TAX_YEAR};
use serde::{Deserialize, Serialize};

/// Severity of a validation item. Nothing here blocks computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationItem {
    pub code: &'static str,
    pub severity: Severity,
    pub category: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation: Option<&'static str>,
}

impl ValidationItem {
    fn new(
        code: &'static str,
        severity: Severity,
        category: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            severity,
            category,
            message: message.into(),
            citation: None,
        }
    }

    fn with_citation(mut self, citation: &'static str) -> Self {
        self.citation = Some(citation);
        self
    }
}

/// Validates the model (and, when present, the computed result).
pub fn validate_federal_return(
    model: &ReturnModel,
    result: Option<&FederalResult>,
) -> Vec<ValidationItem> {
    let mut items = Vec::new();
    let rules = Rules2025::new();

    // SSA-1099 internal consistency.
    for stmt in &model.social_security_statements {
        let expected = stmt.box3_benefits_paid - stmt.box4_benefits_repaid;
        if expected != stmt.box5_net_benefits {
            items.push(ValidationItem::new(
                "SSA_BOX5_MISMATCH",
                Severity::Warning,
                "social_security",
                format!(
                    "SSA-1099 {}: box 3 minus box 4 is {} but box 5 reads {}",
                    stmt.id, expected, stmt.box5_net_benefits
                ),
            ));
        }
        if stmt.box5_net_benefits.is_negative() {
            items.push(ValidationItem::new(
                "SSA_NEGATIVE_NET",
                Severity::Info,
                "social_security",
                format!(
                    "SSA-1099 {}: negative net benefits produce no taxable amount this year",
                    stmt.id
                ),
            ));
        }
    }

    // MFS with benefits and no lived-apart flag uses $0 thresholds.
    if model.filing_status == FilingStatus::MarriedFilingSeparately
        && !model.social_security_statements.is_empty()
        && !model.mfs_lived_apart_all_year
    {
        items.push(
            ValidationItem::new(
                "MFS_SS_LIVED_TOGETHER",
                Severity::Warning,
                "social_security",
                "married filing separately with Social Security benefits and no \
                 lived-apart-all-year flag: the $0 base amount applies",
            )
            .with_citation("IRC 86(c)(1)(C)"),
        );
    }

    // OBBBA senior deduction notice.
    if model.taxpayer.is_65_or_older(TAX_YEAR)
        || model
            .spouse
            .as_ref()
            .is_some_and(|s| s.is_65_or_older(TAX_YEAR))
    {
        items.push(ValidationItem::new(
            "SENIOR_DEDUCTION_NOTICE",
            Severity::Info,
            "deductions",
            "a filer is 65 or older; the OBBBA senior bonus deduction is not modeled \
             and may further reduce taxable income",
        ));
    }

    // Dependent-filer limitation.
    if model.taxpayer.can_be_claimed_as_dependent {
        items.push(ValidationItem::new(
            "DEPENDENT_FILER",
            Severity::Info,
            "deductions",
            "the taxpayer can be claimed as a dependent; the reduced standard \
             deduction rule applies",
        ));
    }

    // Early distributions.
    for dist in &model.retirement_distributions {
        if matches!(dist.box7_code, DistributionCode::EarlyNoException) {
            items.push(ValidationItem::new(
                "EARLY_DISTRIBUTION",
                Severity::Warning,
                "retirement",
                format!(
                    "1099-R {}: distribution code 1 adds the 10% additional tax; \
                     check whether an exception applies",
                    dist.id
                ),
            ));
        }
    }

    // Possible self-employment income without a Schedule C business.
    if model.businesses.is_empty() {
        let misc_other: Money = model
            .misc_statements
            .iter()
            .map(|m| m.box3_other_income)
            .sum();
        if misc_other > Money::from_dollars(600) {
            items.push(ValidationItem::new(
                "MISC_WITHOUT_SCHEDULE_C",
                Severity::Warning,
                "business",
                format!(
                    "1099-MISC box 3 totals {misc_other} with no Schedule C business; \
                     confirm this is not self-employment income"
                ),
            ));
        }
    }

    // K-1 dividends are treated as non-qualified.
    if model
        .k1_passthroughs
        .iter()
        .any(|k| k.box6a_dividends.is_positive())
    {
        items.push(ValidationItem::new(
            "K1_DIVIDENDS_ORDINARY",
            Severity::Info,
            "investments",
            "K-1 box 6a dividends are treated as non-qualified absent explicit \
             qualification data",
        ));
    }

    // Wash-sale adjustment larger than the raw loss.
    for txn in &model.sale_transactions {
        let raw = txn.proceeds - (txn.reported_basis + txn.adjustment_amount);
        if txn.wash_sale_loss_disallowed.is_positive()
            && txn.wash_sale_loss_disallowed > raw.abs()
        {
            items.push(ValidationItem::new(
                "WASH_SALE_EXCEEDS_LOSS",
                Severity::Warning,
                "investments",
                format!(
                    "sale {}: wash-sale disallowed amount exceeds the raw loss",
                    txn.id
                ),
            ));
        }
    }

    // HSA contributions above the statutory limit.
    if let Some(hsa) = &model.hsa {
        let limit = match hsa.coverage {
            crate::model::HsaCoverage::SelfOnly => rules.hsa_limit_self_only(),
            crate::model::HsaCoverage::Family => rules.hsa_limit_family(),
        } + if hsa.age_55_or_older {
            rules.hsa_catch_up()
        } else {
            Money::ZERO
        };
        let total = hsa.taxpayer_contributions + model.employer_hsa_contributions();
        if total > limit {
            items.push(ValidationItem::new(
                "HSA_EXCESS_CONTRIBUTION",
                Severity::Warning,
                "hsa",
                format!(
                    "HSA contributions of {total} exceed the {limit} limit; the 6% \
                     excise applies until withdrawn"
                ),
            ));
        }
    }

    // Excess Social Security withholding across employers.
    let ss_withheld: Money = model
        .wage_statements
        .iter()
        .map(|w| w.box4_social_security_withheld)
        .sum();
    let ss_max = rules
        .social_security_wage_base()
        .pct(620, crate::money::Rounding::HalfEven);
    if ss_withheld > ss_max {
        items.push(ValidationItem::new(
            "EXCESS_SS_WITHHOLDING",
            Severity::Info,
            "payments",
            format!(
                "Social Security withholding of {ss_withheld} exceeds the annual \
                 maximum {ss_max}; the excess is recoverable"
            ),
        ));
    }

    // Elected state returns without a registered module are skipped by
    // the engine; say so.
    for config in &model.state_returns {
        if crate::states::get_state_module(&config.state_code).is_none() {
            items.push(ValidationItem::new(
                "UNSUPPORTED_STATE_RETURN",
                Severity::Warning,
                "states",
                format!(
                    "no state module is registered for {}; the state return is skipped",
                    config.state_code
                ),
            ));
        }
    }

    // State withholding for a state with no registered module.
    for w2 in &model.wage_statements {
        for row in &w2.state_rows {
            if row.box17_state_withholding.is_positive()
                && crate::states::get_state_module(&row.box15_state).is_none()
            {
                items.push(ValidationItem::new(
                    "UNSUPPORTED_STATE_WITHHOLDING",
                    Severity::Warning,
                    "states",
                    format!(
                        "W-2 {} withholds for {}, which has no registered state module",
                        w2.id, row.box15_state
                    ),
                ));
            }
        }
    }

    // Result-dependent diagnostics.
    if let Some(federal) = result {
        if federal
            .qbi
            .as_ref()
            .is_some_and(|q| q.conservative_zero_applied)
        {
            items.push(
                ValidationItem::new(
                    "QBI_CONSERVATIVE_ZERO",
                    Severity::Warning,
                    "qbi",
                    "taxable income is above the QBI threshold and a business lacks \
                     W-2 wage or UBIA data (or is a phased-out SSTB); its deduction \
                     is conservatively zero",
                )
                .with_citation("IRC 199A(b)"),
            );
        }
        if federal
            .foreign_tax
            .as_ref()
            .is_some_and(|f| f.disallowed.is_positive())
        {
            items.push(ValidationItem::new(
                "FOREIGN_TAX_CARRYOVER",
                Severity::Info,
                "credits",
                "foreign tax above the Form 1116 limit is disallowed this year; \
                 the carryover is not modeled",
            ));
        }
    }

    items
}
