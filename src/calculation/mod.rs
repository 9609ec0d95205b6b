//! Calculation logic for the Childcare Subsidy Engine.
//!
//! This module contains the calculation stages for one household: income
//! adjustment, the activity test, care schedule resolution, subsidy rate
//! resolution by income tier and sibling position, and per-child cost
//! calculation. [`calculate_household`] runs them in order.

mod activity_test;
mod cache;
mod cost;
mod household;
mod income;
mod schedule;
mod subsidy_rate;

pub use activity_test::{ActivityTestOutcome, MAX_DAYS_PER_FORTNIGHT, evaluate_activity_test};
pub use cache::{CalculationCache, calculate_household_cached};
pub use cost::{ChildCostResult, aggregate_totals, calculate_child_cost, round_currency};
pub(crate) use cost::checked_product;
pub use household::calculate_household;
pub use income::{HouseholdSnapshotResult, adjust_income, calculate_household_snapshot};
pub use schedule::{DayAnchor, ScheduleOutcome, derive_work_days, resolve_care_schedule};
pub use subsidy_rate::{
    HigherRateOutcome, SubsidyRateResult, higher_rate, resolve_subsidy_rates, sibling_positions,
    standard_rate,
};
