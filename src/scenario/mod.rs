//! Scenario generation and comparison.
//!
//! This module re-runs the household calculation across alternative work
//! arrangements and ranks the outcomes, so a household can see how working
//! more or fewer days changes their net position.

mod comparator;
mod generator;

pub use comparator::{
    FilterCriteria, ScenarioMetric, SortOrder, compare, filter_scenarios, find_best, sort_scenarios,
};
pub use generator::{CustomScenario, ScenarioGenerator, ScenarioMode, scenario_metrics};
