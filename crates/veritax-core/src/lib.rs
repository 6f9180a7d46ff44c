//! veritax-core: a deterministic rules engine for the 2025 US individual
//! income tax return.
//!
//! Given a fully populated [`model::ReturnModel`], [`compute_all`]
//! produces every triggered federal form line, the elected state
//! returns, a provenance trace for every value, a non-blocking
//! validation report, and a cross-form quality-gate report. The engine
//! is pure: no I/O, no clock, no randomness; identical input produces
//! identical output.

pub mod error;
pub mod explain;
pub mod form1040;
pub mod model;
pub mod money;
pub mod quality;
pub mod result;
pub mod rules;
pub mod schedules;
pub mod states;
pub mod trace;
pub mod triggers;
pub mod types;
pub mod validation;
pub mod worksheets;

pub use error::{TaxError, TaxResult};
pub use explain::{TraceGraph, build_trace, explain_line};
pub use model::ReturnModel;
pub use money::{Money, Rounding};
pub use result::{FederalResult, FullResult, GateReport};
pub use states::{
    StateComputeResult, StateModule, all_state_modules, apportionment_ratio, get_state_module,
};
pub use trace::{NodeRef, Source, Trace, TracedValue};
pub use types::{FilingStatus, ScheduleTag};
pub use validation::{Severity, ValidationItem, validate_federal_return};

use schedules::schedule_b;

/// Computes the complete return: federal, every elected state, the
/// trace, validation, and quality gates.
pub fn compute_all(model: &ReturnModel) -> TaxResult<FullResult> {
    let mut trace = Trace::new();
    let federal = form1040::compute(model, &mut trace)?;

    let mut state_results = Vec::new();
    for config in &model.state_returns {
        // Unknown codes are skipped here; the validator flags their
        // withholding separately.
        if let Some(module) = get_state_module(&config.state_code) {
            state_results.push(module.compute(model, &federal, config, &mut trace)?);
        }
    }

    let validation = validate_federal_return(model, Some(&federal));
    let quality_gates = quality::run_gates(&federal, &state_results, &trace);

    Ok(FullResult {
        federal,
        state_results,
        values: trace,
        validation,
        quality_gates,
    })
}

/// Computes only the federal return (used heavily in tests).
pub fn compute_form1040(model: &ReturnModel) -> TaxResult<FederalResult> {
    let mut trace = Trace::new();
    form1040::compute(model, &mut trace)
}

/// Computes only Schedule B.
pub fn compute_schedule_b(model: &ReturnModel) -> schedule_b::ScheduleBResult {
    let mut trace = Trace::new();
    schedule_b::compute(model, &rules::Rules2025::new(), &mut trace)
}
