//! Compute results: Form 1040 lines, schedule records, the full result.

use crate::schedules::credits::ctc::Form8812Result;
use crate::schedules::credits::dependent_care::Form2441Result;
use crate::schedules::credits::education::Form8863Result;
use crate::schedules::credits::energy::Form5695Result;
use crate::schedules::credits::foreign_tax::ForeignTaxResult;
use crate::schedules::credits::premium::Form8962Result;
use crate::schedules::credits::savers::Form8880Result;
use crate::schedules::form6251::Form6251Result;
use crate::schedules::form8606::Form8606Result;
use crate::schedules::form8889::Form8889Result;
use crate::schedules::form8949::Form8949Result;
use crate::schedules::form8959::Form8959Result;
use crate::schedules::form8960::Form8960Result;
use crate::schedules::qbi::QbiResult;
use crate::schedules::schedule_a::ScheduleAResult;
use crate::schedules::schedule_b::ScheduleBResult;
use crate::schedules::schedule_c::ScheduleCResult;
use crate::schedules::schedule_d::ScheduleDResult;
use crate::schedules::schedule_e::ScheduleEResult;
use crate::schedules::schedule_se::ScheduleSeResult;
use crate::schedules::social_security::SocialSecurityResult;
use crate::trace::{NodeRef, Trace};
use crate::types::ScheduleTag;
use crate::validation::ValidationItem;
use crate::worksheets::TaxMethod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Form 1040 line values (each a handle into the trace).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form1040 {
    pub line1a: NodeRef,
    pub line1z: NodeRef,
    pub line2a: NodeRef,
    pub line2b: NodeRef,
    pub line3a: NodeRef,
    pub line3b: NodeRef,
    pub line4a: NodeRef,
    pub line4b: NodeRef,
    pub line5a: NodeRef,
    pub line5b: NodeRef,
    pub line6a: NodeRef,
    pub line6b: NodeRef,
    pub line7: NodeRef,
    pub line8: NodeRef,
    pub line9: NodeRef,
    pub line10: NodeRef,
    pub line11: NodeRef,
    pub line12: NodeRef,
    pub line13: NodeRef,
    pub line15: NodeRef,
    pub line16: NodeRef,
    pub line17: NodeRef,
    pub line18: NodeRef,
    pub line19: NodeRef,
    pub line20: NodeRef,
    pub line21: NodeRef,
    pub line22: NodeRef,
    pub line23: NodeRef,
    pub line24: NodeRef,
    pub line25a: NodeRef,
    pub line25b: NodeRef,
    pub line25d: NodeRef,
    pub line26: NodeRef,
    pub line28: NodeRef,
    pub line29: NodeRef,
    pub line31: NodeRef,
    pub line32: NodeRef,
    pub line33: NodeRef,
    pub line34: NodeRef,
    pub line37: NodeRef,
    /// True when the standard deduction won the line 12 comparison.
    pub standard_deduction_used: bool,
    pub tax_method: TaxMethod,
}

impl Form1040 {
    /// Looks up a line value by its label ("11", "2b", ...).
    pub fn line(&self, line_id: &str) -> Option<&NodeRef> {
        match line_id {
            "1a" => Some(&self.line1a),
            "1z" => Some(&self.line1z),
            "2a" => Some(&self.line2a),
            "2b" => Some(&self.line2b),
            "3a" => Some(&self.line3a),
            "3b" => Some(&self.line3b),
            "4a" => Some(&self.line4a),
            "4b" => Some(&self.line4b),
            "5a" => Some(&self.line5a),
            "5b" => Some(&self.line5b),
            "6a" => Some(&self.line6a),
            "6b" => Some(&self.line6b),
            "7" => Some(&self.line7),
            "8" => Some(&self.line8),
            "9" => Some(&self.line9),
            "10" => Some(&self.line10),
            "11" => Some(&self.line11),
            "12" => Some(&self.line12),
            "13" => Some(&self.line13),
            "15" => Some(&self.line15),
            "16" => Some(&self.line16),
            "17" => Some(&self.line17),
            "18" => Some(&self.line18),
            "19" => Some(&self.line19),
            "20" => Some(&self.line20),
            "21" => Some(&self.line21),
            "22" => Some(&self.line22),
            "23" => Some(&self.line23),
            "24" => Some(&self.line24),
            "25a" => Some(&self.line25a),
            "25b" => Some(&self.line25b),
            "25d" => Some(&self.line25d),
            "26" => Some(&self.line26),
            "28" => Some(&self.line28),
            "29" => Some(&self.line29),
            "31" => Some(&self.line31),
            "32" => Some(&self.line32),
            "33" => Some(&self.line33),
            "34" => Some(&self.line34),
            "37" => Some(&self.line37),
            _ => None,
        }
    }
}

/// Schedule 1: additional income (Part I) and adjustments (Part II).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule1Result {
    /// Line 10: total additional income (Form 1040 line 8).
    pub additional_income: NodeRef,
    /// Line 25: total adjustments (Form 1040 line 10).
    pub adjustments: NodeRef,
    /// Half of SE tax claimed as an adjustment.
    pub half_se_tax: NodeRef,
    /// HSA deduction claimed as an adjustment.
    pub hsa_deduction: NodeRef,
}

/// Schedule 2: additional taxes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule2Result {
    /// Line 3: AMT plus excess advance PTC (Form 1040 line 17).
    pub part1_total: NodeRef,
    /// Line 21: other taxes (Form 1040 line 23).
    pub part2_total: NodeRef,
}

/// Schedule 3: additional credits and payments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule3Result {
    /// Line 8: non-refundable credits (Form 1040 line 20).
    pub non_refundable: NodeRef,
    /// Line 13-equivalent: refundable net premium tax credit.
    pub refundable_ptc: NodeRef,
}

/// Everything the federal computation produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederalResult {
    pub form1040: Form1040,
    pub schedule_b: ScheduleBResult,
    pub form8949: Form8949Result,
    pub schedule_d: Option<ScheduleDResult>,
    pub schedule_c: Option<ScheduleCResult>,
    pub schedule_se: Option<ScheduleSeResult>,
    pub schedule_e: Option<ScheduleEResult>,
    pub schedule_a: Option<ScheduleAResult>,
    pub social_security: Option<SocialSecurityResult>,
    pub form8889: Option<Form8889Result>,
    pub form8606: Option<Form8606Result>,
    pub qbi: Option<QbiResult>,
    pub form6251: Option<Form6251Result>,
    pub form8959: Option<Form8959Result>,
    pub form8960: Option<Form8960Result>,
    pub form8812: Form8812Result,
    pub form8863: Option<Form8863Result>,
    pub form5695: Option<Form5695Result>,
    pub form8880: Option<Form8880Result>,
    pub form2441: Option<Form2441Result>,
    pub foreign_tax: Option<ForeignTaxResult>,
    pub form8962: Option<Form8962Result>,
    pub schedule1: Schedule1Result,
    pub schedule2: Schedule2Result,
    pub schedule3: Schedule3Result,
    /// Attachments this return requires.
    pub executed_schedules: BTreeSet<ScheduleTag>,
}

/// Aggregated quality-gate report (see `quality`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateReport {
    pub gates: Vec<crate::quality::GateCheck>,
}

impl GateReport {
    pub fn all_passed(&self) -> bool {
        self.gates.iter().all(|g| g.passed)
    }
}

/// The complete output of `compute_all`.
#[derive(Debug, Clone, Serialize)]
pub struct FullResult {
    pub federal: FederalResult,
    pub state_results: Vec<crate::states::StateComputeResult>,
    /// Every traced value, keyed by node id.
    pub values: Trace,
    pub validation: Vec<ValidationItem>,
    pub quality_gates: GateReport,
}

impl FullResult {
    /// Convenience accessor mirroring `values[nodeId].amount`.
    pub fn amount(&self, node_id: &str) -> Option<crate::money::Money> {
        self.values.get(node_id).map(|v| v.amount)
    }

    pub fn form1040(&self) -> &Form1040 {
        &self.federal.form1040
    }

    pub fn schedule_b(&self) -> &ScheduleBResult {
        &self.federal.schedule_b
    }

    pub fn executed_schedules(&self) -> &BTreeSet<ScheduleTag> {
        &self.federal.executed_schedules
    }
}
