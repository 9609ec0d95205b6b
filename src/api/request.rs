//! Request types for the Childcare Subsidy Engine API.
//!
//! This module defines the JSON request structures for the `/calculate` and
//! `/scenarios` endpoints and their validated conversion into domain types.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{DayAnchor, derive_work_days};
use crate::error::{EngineError, EngineResult};
use crate::models::{ChildProfile, HouseholdInput, ParentProfile, WorkDay};
use crate::scenario::{CustomScenario, FilterCriteria, ScenarioMetric, ScenarioMode, SortOrder};

/// Request body for the `/calculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The household to calculate.
    pub household: HouseholdRequest,
    /// The policy period to use, e.g. "2025-26".
    #[serde(default)]
    pub policy_period: Option<String>,
    /// Use the schedule effective on this date when no period is given.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Household information in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdRequest {
    /// The first parent.
    pub parent1: ParentRequest,
    /// The second parent, omitted for single-parent households.
    #[serde(default)]
    pub parent2: Option<ParentRequest>,
    /// Children in care.
    pub children: Vec<ChildProfile>,
    /// Overrides the schedule's default withholding percentage.
    #[serde(default)]
    pub withholding_percentage: Option<Decimal>,
}

/// Parent information in a request.
///
/// Either `work_days` or `work_days_per_week` must be given. When only the
/// count is given, concrete days are derived: parent 1 from Monday, parent 2
/// from Friday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentRequest {
    /// Annual full-time-equivalent income.
    pub fte_income: Decimal,
    /// Number of days worked per week.
    #[serde(default)]
    pub work_days_per_week: Option<u8>,
    /// Hours worked on each work day.
    pub hours_per_day: Decimal,
    /// The specific weekdays worked.
    #[serde(default)]
    pub work_days: Option<Vec<WorkDay>>,
}

impl ParentRequest {
    fn into_profile(self, prefix: &str, anchor: DayAnchor) -> EngineResult<ParentProfile> {
        let (work_days_per_week, work_days): (u8, BTreeSet<WorkDay>) =
            match (self.work_days_per_week, self.work_days) {
                (count, Some(days)) => {
                    let days: BTreeSet<WorkDay> = days.into_iter().collect();
                    (count.unwrap_or(days.len() as u8), days)
                }
                (Some(count), None) => (count, derive_work_days(count, anchor)),
                (None, None) => {
                    return Err(EngineError::invalid_field(
                        format!("{}.work_days_per_week", prefix),
                        "either work_days or work_days_per_week is required",
                    ));
                }
            };

        let profile = ParentProfile {
            fte_income: self.fte_income,
            work_days_per_week,
            hours_per_day: self.hours_per_day,
            work_days,
        };
        profile.validate(prefix)?;
        Ok(profile)
    }
}

impl TryFrom<HouseholdRequest> for HouseholdInput {
    type Error = EngineError;

    fn try_from(req: HouseholdRequest) -> Result<Self, Self::Error> {
        let parent1 = req.parent1.into_profile("parent1", DayAnchor::FromMonday)?;
        let parent2 = req
            .parent2
            .map(|p| p.into_profile("parent2", DayAnchor::FromFriday))
            .transpose()?;

        let input = HouseholdInput {
            parent1,
            parent2,
            children: req.children,
            withholding_percentage: req.withholding_percentage,
        };
        input.validate()?;
        Ok(input)
    }
}

/// The scenario set requested from `/scenarios`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioModeRequest {
    /// Every day-count pair.
    #[default]
    All,
    /// A curated set of typical arrangements.
    Common,
    /// One earner working one to five days.
    SingleParent,
    /// Arrangements listed in `custom`.
    Custom,
}

/// Sort options for `/scenarios`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SortRequest {
    /// The metric to sort by.
    pub metric: ScenarioMetric,
    /// The sort direction; descending when omitted.
    #[serde(default)]
    pub order: SortOrder,
}

/// Request body for the `/scenarios` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRequest {
    /// The household to generate scenarios for.
    pub household: HouseholdRequest,
    /// Which arrangements to generate.
    #[serde(default)]
    pub mode: ScenarioModeRequest,
    /// Arrangements for `custom` mode.
    #[serde(default)]
    pub custom: Option<Vec<CustomScenario>>,
    /// How to order the returned scenarios; candidate order when omitted.
    #[serde(default)]
    pub sort: Option<SortRequest>,
    /// Which scenarios to return.
    #[serde(default)]
    pub filter: Option<FilterCriteria>,
    /// Salt for scenario ids; random when omitted.
    #[serde(default)]
    pub salt: Option<Uuid>,
    /// The policy period to use, e.g. "2025-26".
    #[serde(default)]
    pub policy_period: Option<String>,
    /// Use the schedule effective on this date when no period is given.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl ScenarioRequest {
    /// Resolves the requested mode, taking the custom list for `custom` mode.
    pub fn scenario_mode(&mut self) -> EngineResult<ScenarioMode> {
        Ok(match self.mode {
            ScenarioModeRequest::All => ScenarioMode::All,
            ScenarioModeRequest::Common => ScenarioMode::Common,
            ScenarioModeRequest::SingleParent => ScenarioMode::SingleParent,
            ScenarioModeRequest::Custom => match self.custom.take() {
                Some(custom) => ScenarioMode::Custom(custom),
                None => {
                    return Err(EngineError::invalid_field(
                        "custom",
                        "is required when mode is custom",
                    ));
                }
            },
        })
    }
}
