//! Tenant risk scoring that favours cash-flow features over credit score, with a
//! legacy model kept alongside for side-by-side disparity audits.

pub mod config;
pub mod error;
pub mod screening;
pub mod telemetry;
