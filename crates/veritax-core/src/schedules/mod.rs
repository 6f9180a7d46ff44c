//! Federal schedules and attachment forms, one module per form.

pub mod adjustments;
pub mod credits;
pub mod form4952;
pub mod form6251;
pub mod form8582;
pub mod form8606;
pub mod form8829;
pub mod form8889;
pub mod form8949;
pub mod form8959;
pub mod form8960;
pub mod qbi;
pub mod schedule_a;
pub mod schedule_b;
pub mod schedule_c;
pub mod schedule_d;
pub mod schedule_e;
pub mod schedule_se;
pub mod social_security;
