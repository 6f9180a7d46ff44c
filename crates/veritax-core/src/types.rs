//! Core types used throughout the rules engine.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Tax year (e.g., 2025).
pub type TaxYear = u16;

/// The tax year this engine computes.
pub const TAX_YEAR: TaxYear = 2025;

/// Filing status for federal income tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
    QualifyingSurvivingSpouse,
}

impl FilingStatus {
    /// Returns all filing statuses.
    pub fn all() -> &'static [FilingStatus] {
        &[
            FilingStatus::Single,
            FilingStatus::MarriedFilingJointly,
            FilingStatus::MarriedFilingSeparately,
            FilingStatus::HeadOfHousehold,
            FilingStatus::QualifyingSurvivingSpouse,
        ]
    }

    /// Returns the IRS form code for this filing status.
    pub fn code(&self) -> &'static str {
        match self {
            FilingStatus::Single => "S",
            FilingStatus::MarriedFilingJointly => "MFJ",
            FilingStatus::MarriedFilingSeparately => "MFS",
            FilingStatus::HeadOfHousehold => "HOH",
            FilingStatus::QualifyingSurvivingSpouse => "QSS",
        }
    }

    /// Returns true for the two married statuses filing one return.
    pub fn is_joint(&self) -> bool {
        matches!(
            self,
            FilingStatus::MarriedFilingJointly | FilingStatus::QualifyingSurvivingSpouse
        )
    }
}

impl std::fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilingStatus::Single => write!(f, "Single"),
            FilingStatus::MarriedFilingJointly => write!(f, "Married Filing Jointly"),
            FilingStatus::MarriedFilingSeparately => write!(f, "Married Filing Separately"),
            FilingStatus::HeadOfHousehold => write!(f, "Head of Household"),
            FilingStatus::QualifyingSurvivingSpouse => write!(f, "Qualifying Surviving Spouse"),
        }
    }
}

/// Relationship of a dependent to the taxpayer (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependentRelationship {
    Son,
    Daughter,
    Stepchild,
    FosterChild,
    Brother,
    Sister,
    Grandchild,
    Niece,
    Nephew,
    Parent,
    Grandparent,
    AuntUncle,
    Other,
}

impl DependentRelationship {
    /// Returns true if the relationship can make a "qualifying child"
    /// for the Child Tax Credit.
    pub fn is_qualifying_child_relationship(&self) -> bool {
        matches!(
            self,
            DependentRelationship::Son
                | DependentRelationship::Daughter
                | DependentRelationship::Stepchild
                | DependentRelationship::FosterChild
                | DependentRelationship::Brother
                | DependentRelationship::Sister
                | DependentRelationship::Grandchild
        )
    }
}

/// Information about a dependent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
    pub first_name: String,
    pub last_name: String,
    /// Social Security Number; absent when the dependent has none.
    #[serde(default)]
    pub ssn: Option<String>,
    pub relationship: DependentRelationship,
    /// Date of birth; absent when unknown.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Months lived with taxpayer during the tax year.
    pub months_lived_with_taxpayer: u8,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub is_student: bool,
}

impl Dependent {
    /// Age at the end of the given tax year, when a DOB is present.
    pub fn age_at_year_end(&self, tax_year: TaxYear) -> Option<i32> {
        let dob = self.date_of_birth?;
        Some(i32::from(tax_year) - dob.year())
    }
}

/// Demographic facts for the taxpayer or spouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonInfo {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub ssn: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub is_blind: bool,
    /// Set when the person may be claimed as a dependent on another return.
    #[serde(default)]
    pub can_be_claimed_as_dependent: bool,
    #[serde(default)]
    pub is_nonresident_alien: bool,
}

impl PersonInfo {
    /// Returns true if the person is 65 or older at the end of the tax year.
    ///
    /// Per IRS: "You are considered 65 on the day before your 65th
    /// birthday", so a January 1 birthday counts for the prior year.
    pub fn is_65_or_older(&self, tax_year: TaxYear) -> bool {
        let Some(dob) = self.date_of_birth else {
            return false;
        };
        // Anyone born before Jan 2 of (year - 64) has a 65th birthday on
        // or before Jan 1 of the following year.
        let cutoff = NaiveDate::from_ymd_opt(i32::from(tax_year) - 64, 1, 2)
            .expect("jan 2 always exists");
        dob < cutoff
    }
}

/// Which spouse a document or business belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    Taxpayer,
    Spouse,
}

/// Deduction method elected on the return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionMethod {
    Standard,
    Itemized,
}

/// Tags identifying which schedules/attachments a result requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleTag {
    Schedule1,
    Schedule2,
    Schedule3,
    ScheduleA,
    ScheduleB,
    ScheduleC,
    ScheduleD,
    ScheduleE,
    ScheduleSe,
    Form8949,
    Form8812,
    Form8863,
    Form6251,
    Form8889,
    Form8995,
    Form8995A,
    Form8829,
    Form1116,
    Form8582,
    Form8606,
    Form8959,
    Form8960,
    Form8962,
}

impl std::fmt::Display for ScheduleTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ScheduleTag::Schedule1 => "Schedule 1",
            ScheduleTag::Schedule2 => "Schedule 2",
            ScheduleTag::Schedule3 => "Schedule 3",
            ScheduleTag::ScheduleA => "Schedule A",
            ScheduleTag::ScheduleB => "Schedule B",
            ScheduleTag::ScheduleC => "Schedule C",
            ScheduleTag::ScheduleD => "Schedule D",
            ScheduleTag::ScheduleE => "Schedule E",
            ScheduleTag::ScheduleSe => "Schedule SE",
            ScheduleTag::Form8949 => "Form 8949",
            ScheduleTag::Form8812 => "Schedule 8812",
            ScheduleTag::Form8863 => "Form 8863",
            ScheduleTag::Form6251 => "Form 6251",
            ScheduleTag::Form8889 => "Form 8889",
            ScheduleTag::Form8995 => "Form 8995",
            ScheduleTag::Form8995A => "Form 8995-A",
            ScheduleTag::Form8829 => "Form 8829",
            ScheduleTag::Form1116 => "Form 1116",
            ScheduleTag::Form8582 => "Form 8582",
            ScheduleTag::Form8606 => "Form 8606",
            ScheduleTag::Form8959 => "Form 8959",
            ScheduleTag::Form8960 => "Form 8960",
            ScheduleTag::Form8962 => "Form 8962",
        };
        write!(f, "{label}")
    }
}
