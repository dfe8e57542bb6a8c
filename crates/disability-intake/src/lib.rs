//! Eligibility quiz and lead intake for a disability-benefits legal funnel.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
