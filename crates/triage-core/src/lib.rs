//! triage-core
//!
//! Pure domain types for the emergency triage engine: vitals, severity
//! distributions, hospitals, capability clusters and recommendation records.
//! No async runtime and no I/O.

pub mod error;
pub mod models;
pub mod numeric;
