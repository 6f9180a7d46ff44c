//! Credit forms: Schedule 8812, 8863, 5695, 8880, 2441, 1116, 8962.

pub mod ctc;
pub mod dependent_care;
pub mod education;
pub mod energy;
pub mod foreign_tax;
pub mod premium;
pub mod savers;
