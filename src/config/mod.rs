//! Configuration loading and management for the Childcare Subsidy Engine.
//!
//! This module provides functionality to load versioned rate schedules from
//! YAML files, including income tiers, rate caps, activity test thresholds,
//! and withholding bounds.
//!
//! # Example
//!
//! ```no_run
//! use subsidy_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ccs").unwrap();
//! println!("Loaded program: {}", config.program().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ActivityTestConfig, HigherTier, PolicyConfig, ProgramMetadata, RateCap, RateSchedule,
    StandardTier, TaperBand, WithholdingConfig,
};

#[cfg(test)]
pub(crate) use types::test_support;
