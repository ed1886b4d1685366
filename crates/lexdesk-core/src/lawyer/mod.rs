//! Lawyer directory domain.

pub mod model;

pub use model::LawyerRecord;
