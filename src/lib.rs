//! Childcare Subsidy Engine
//!
//! This crate estimates a household's childcare subsidy entitlement and
//! out-of-pocket cost from a versioned rate schedule, and enumerates
//! alternative work-schedule combinations to find the financially optimal one.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod scenario;
