//! Core data models for the Childcare Subsidy Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_result;
mod child;
mod household;
mod parent;
mod scenario;

pub use calculation_result::{
    ActivityLevel, ActivityTestResult, AuditStep, AuditTrace, AuditWarning, CareUnit,
    CostAmounts, CostBreakdown, HouseholdCalculation, HouseholdTotals, RateTier, SchedulePolicy,
    ScheduleResult, SubsidyDetermination,
};
pub use child::{AgeCategory, CareType, ChildProfile, FeeMode, MAX_CHILD_AGE, MAX_HOURS_PER_WEEK};
pub use household::{HouseholdInput, HouseholdSnapshot};
pub use parent::{MAX_HOURS_PER_DAY, MAX_WORK_DAYS, ParentProfile, WorkDay};
pub use scenario::{Scenario, ScenarioMetrics};
