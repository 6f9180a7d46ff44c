//! Form 8889: Health Savings Accounts.

use crate::model::{HsaCoverage, ReturnModel};
use crate::money::{Money, Rounding};
use crate::rules::Rules2025;
use crate::trace::{NodeRef, Trace};
use serde::{Deserialize, Serialize};

/// Computed Form 8889.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form8889Result {
    /// Contribution limit for the coverage tier plus any catch-up.
    pub contribution_limit: NodeRef,
    /// Employer contributions (W-2 box 12 code W).
    pub employer_contributions: NodeRef,
    /// Line 13: the HSA deduction (Schedule 1).
    pub deduction: NodeRef,
    /// Contributions above the limit, subject to the 6% excise.
    pub excess_contributions: NodeRef,
    /// 6% excise on the excess (Schedule 2).
    pub excess_penalty: NodeRef,
    /// Taxable HSA distributions (Form 1040 line 8 path).
    pub taxable_distributions: NodeRef,
    /// 20% additional tax on taxable distributions (Schedule 2), unless
    /// the age-65-or-disabled exception applies.
    pub distribution_penalty: NodeRef,
}

pub fn compute(model: &ReturnModel, rules: &Rules2025, trace: &mut Trace) -> Option<Form8889Result> {
    let hsa = model.hsa.as_ref()?;

    let base_limit = match hsa.coverage {
        HsaCoverage::SelfOnly => rules.hsa_limit_self_only(),
        HsaCoverage::Family => rules.hsa_limit_family(),
    };
    let catch_up = if hsa.age_55_or_older {
        rules.hsa_catch_up()
    } else {
        Money::ZERO
    };
    let contribution_limit = trace.literal(
        "form8889.contributionLimit",
        base_limit + catch_up,
        match hsa.coverage {
            HsaCoverage::SelfOnly => "self-only HDHP limit plus catch-up",
            HsaCoverage::Family => "family HDHP limit plus catch-up",
        },
    );

    let employer_contributions = trace.input(
        "form8889.employerContributions",
        model.employer_hsa_contributions(),
        "W-2 box 12 code W totals",
    );
    let taxpayer_contributions = trace.input(
        "form8889.taxpayerContributions",
        hsa.taxpayer_contributions,
        "direct HSA contributions",
    );

    // Deduction: the taxpayer's own contributions, limited to the room
    // the employer contributions leave.
    let room = trace.sub(
        "form8889.limitAfterEmployer",
        &contribution_limit,
        &employer_contributions,
    );
    let room_clamped = trace.clamp_zero("form8889.limitRemaining", &room);
    let deduction = trace.min("form8889.deduction", &taxpayer_contributions, &room_clamped);

    let total_contributions = trace.sum(
        "form8889.totalContributions",
        &[&employer_contributions, &taxpayer_contributions],
    );
    let over = trace.sub(
        "form8889.overLimit",
        &total_contributions,
        &contribution_limit,
    );
    let excess_contributions = trace.clamp_zero("form8889.excessContributions", &over);
    let excess_penalty = trace.pct(
        "form8889.excessPenalty",
        &excess_contributions,
        Rules2025::HSA_EXCESS_BPS,
        Rounding::HalfEven,
    );

    let distributions: Money = model
        .hsa_distributions
        .iter()
        .map(|d| d.box1_gross_distribution)
        .sum();
    let distributions = trace.input(
        "form8889.distributions",
        distributions,
        "1099-SA box 1 totals",
    );
    let qualified = trace.input(
        "form8889.qualifiedExpenses",
        hsa.qualified_medical_expenses,
        "unreimbursed qualified medical expenses",
    );
    let taxable_raw = trace.sub("form8889.taxableRaw", &distributions, &qualified);
    let taxable_distributions = trace.clamp_zero("form8889.taxableDistributions", &taxable_raw);

    let distribution_penalty = if hsa.age_65_or_disabled {
        trace.literal(
            "form8889.distributionPenalty",
            Money::ZERO,
            "20% additional tax waived at 65 or on disability",
        )
    } else {
        trace.pct(
            "form8889.distributionPenalty",
            &taxable_distributions,
            Rules2025::HSA_DISTRIBUTION_PENALTY_BPS,
            Rounding::HalfEven,
        )
    };

    Some(Form8889Result {
        contribution_limit,
        employer_contributions,
        deduction,
        excess_contributions,
        excess_penalty,
        taxable_distributions,
        distribution_penalty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Box12Entry, HsaDistribution, HsaInfo, WageStatement};
    use crate::types::{Owner, PersonInfo};
    use pretty_assertions::assert_eq;

    fn model_with_hsa(hsa: HsaInfo, employer_w: i64) -> ReturnModel {
        let mut model = ReturnModel::single(PersonInfo {
            first_name: "Dana".to_string(),
            last_name: "Kim".to_string(),
            ssn: None,
            date_of_birth: None,
            is_blind: false,
            can_be_claimed_as_dependent: false,
            is_nonresident_alien: false,
        });
        model.hsa = Some(hsa);
        if employer_w > 0 {
            model.wage_statements = vec![WageStatement {
                id: "w2".to_string(),
                owner: Owner::Taxpayer,
                employer_name: "Employer".to_string(),
                employer_ein: "12-3456789".to_string(),
                box1_wages: Money::from_dollars(60_000),
                box2_federal_withholding: Money::ZERO,
                box3_social_security_wages: Money::from_dollars(60_000),
                box4_social_security_withheld: Money::ZERO,
                box5_medicare_wages: Money::from_dollars(60_000),
                box6_medicare_withheld: Money::ZERO,
                box12: vec![Box12Entry {
                    code: "W".to_string(),
                    amount: Money::from_dollars(employer_w),
                }],
                retirement_plan: false,
                third_party_sick_pay: false,
                state_rows: Vec::new(),
            }];
        }
        model
    }

    fn hsa(coverage: HsaCoverage, own: i64, expenses: i64) -> HsaInfo {
        HsaInfo {
            coverage,
            taxpayer_contributions: Money::from_dollars(own),
            qualified_medical_expenses: Money::from_dollars(expenses),
            age_55_or_older: false,
            age_65_or_disabled: false,
        }
    }

    #[test]
    fn test_deduction_limited_by_employer_share() {
        let model = model_with_hsa(hsa(HsaCoverage::SelfOnly, 3_000, 0), 2_000);
        let rules = Rules2025::new();
        let mut trace = Trace::new();
        let result = compute(&model, &rules, &mut trace).unwrap();
        // Limit 4,300; employer took 2,000; own deduction capped at 2,300.
        assert_eq!(result.deduction.amount, Money::from_dollars(2_300));
        // Total 5,000 exceeds the limit by 700; 6% excise = $42.
        assert_eq!(result.excess_contributions.amount, Money::from_dollars(700));
        assert_eq!(result.excess_penalty.amount, Money::from_dollars(42));
    }

    #[test]
    fn test_distribution_penalty() {
        let mut model = model_with_hsa(hsa(HsaCoverage::Family, 0, 1_000), 0);
        model.hsa_distributions = vec![HsaDistribution {
            id: "sa-1".to_string(),
            owner: Owner::Taxpayer,
            box1_gross_distribution: Money::from_dollars(3_000),
        }];
        let rules = Rules2025::new();
        let mut trace = Trace::new();
        let result = compute(&model, &rules, &mut trace).unwrap();
        assert_eq!(result.taxable_distributions.amount, Money::from_dollars(2_000));
        assert_eq!(result.distribution_penalty.amount, Money::from_dollars(400));
    }

    #[test]
    fn test_penalty_waived_at_65() {
        let mut info = hsa(HsaCoverage::SelfOnly, 0, 0);
        info.age_65_or_disabled = true;
        let mut model = model_with_hsa(info, 0);
        model.hsa_distributions = vec![HsaDistribution {
            id: "sa-1".to_string(),
            owner: Owner::Taxpayer,
            box1_gross_distribution: Money::from_dollars(3_000),
        }];
        let rules = Rules2025::new();
        let mut trace = Trace::new();
        let result = compute(&model, &rules, &mut trace).unwrap();
        assert_eq!(result.taxable_distributions.amount, Money::from_dollars(3_000));
        assert_eq!(result.distribution_penalty.amount, Money::ZERO);
    }

    #[test]
    fn test_catch_up_raises_limit() {
        let mut info = hsa(HsaCoverage::SelfOnly, 5_300, 0);
        info.age_55_or_older = true;
        let model = model_with_hsa(info, 0);
        let rules = Rules2025::new();
        let mut trace = Trace::new();
        let result = compute(&model, &rules, &mut trace).unwrap();
        assert_eq!(result.contribution_limit.amount, Money::from_dollars(5_300));
        assert_eq!(result.deduction.amount, Money::from_dollars(5_300));
        assert_eq!(result.excess_contributions.amount, Money::ZERO);
    }
}
