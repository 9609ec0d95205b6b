//! Scenario generation.
//!
//! The [`ScenarioGenerator`] enumerates candidate work arrangements for a
//! household, re-runs the full calculation pipeline for each, and packages
//! the outcomes as [`Scenario`] records. Candidates are computed in parallel
//! with [`rayon`] and returned in candidate order.

use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::calculation::{
    DayAnchor, calculate_household, checked_product, derive_work_days, resolve_care_schedule,
    round_currency,
};
use crate::config::RateSchedule;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    HouseholdInput, HouseholdTotals, MAX_WORK_DAYS, ParentProfile, Scenario, ScenarioMetrics,
};

/// Two-parent arrangements offered in [`ScenarioMode::Common`].
const COMMON_PAIRS: [(u8, u8); 8] = [(5, 5), (5, 4), (5, 3), (5, 2), (4, 4), (4, 3), (3, 3), (5, 0)];

/// Sole-earner arrangements offered in [`ScenarioMode::Common`] when the
/// second parent is absent or has no income.
const COMMON_SINGLE_EARNER_DAYS: [u8; 4] = [5, 4, 3, 2];

/// A caller-supplied work arrangement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomScenario {
    /// Display name; a default is generated when empty.
    #[serde(default)]
    pub name: String,
    /// Days per week parent 1 works.
    pub parent1_days: u8,
    /// Days per week parent 2 works.
    #[serde(default)]
    pub parent2_days: u8,
}

/// Which set of arrangements to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioMode {
    /// Every day-count pair except neither parent working.
    All,
    /// A curated set of typical arrangements.
    Common,
    /// The first parent working one to five days with no second earner.
    SingleParent,
    /// Arrangements supplied by the caller.
    Custom(Vec<CustomScenario>),
}

impl ScenarioMode {
    /// Returns the mode's identifier for logs and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioMode::All => "all",
            ScenarioMode::Common => "common",
            ScenarioMode::SingleParent => "single_parent",
            ScenarioMode::Custom(_) => "custom",
        }
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    name: String,
    parent1_days: u8,
    parent2_days: u8,
}

impl Candidate {
    fn from_pair(parent1_days: u8, parent2_days: u8, has_parent2: bool) -> Self {
        let name = if has_parent2 {
            format!("Parent 1: {} days, Parent 2: {} days", parent1_days, parent2_days)
        } else {
            format!("{} days", parent1_days)
        };
        Self {
            name,
            parent1_days,
            parent2_days,
        }
    }
}

/// Generates and computes scenarios against one rate schedule.
///
/// # Example
///
/// ```no_run
/// use subsidy_engine::config::ConfigLoader;
/// use subsidy_engine::models::HouseholdInput;
/// use subsidy_engine::scenario::{ScenarioGenerator, ScenarioMode};
/// use uuid::Uuid;
///
/// # fn household() -> HouseholdInput { unimplemented!() }
/// let loader = ConfigLoader::load("./config/ccs")?;
/// let generator = ScenarioGenerator::new(loader.latest()?).with_salt(Uuid::nil());
///
/// let scenarios = generator.generate(&household(), &ScenarioMode::All)?;
/// for scenario in &scenarios {
///     println!("{}: net ${}", scenario.name, scenario.metrics.net_income);
/// }
/// # Ok::<(), subsidy_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioGenerator<'a> {
    schedule: &'a RateSchedule,
    salt: Uuid,
}

impl<'a> ScenarioGenerator<'a> {
    /// Creates a generator with a random salt.
    pub fn new(schedule: &'a RateSchedule) -> Self {
        Self {
            schedule,
            salt: Uuid::new_v4(),
        }
    }

    /// Sets the salt scenario ids are derived from.
    ///
    /// The same salt and input always produce the same ids.
    pub fn with_salt(mut self, salt: Uuid) -> Self {
        self.salt = salt;
        self
    }

    /// Returns the salt in use.
    pub fn salt(&self) -> Uuid {
        self.salt
    }

    /// Generates every scenario for `mode`, in candidate order.
    ///
    /// # Errors
    ///
    /// Returns the first error from input validation, custom arrangement
    /// validation, or any scenario's calculation.
    pub fn generate(&self, input: &HouseholdInput, mode: &ScenarioMode) -> EngineResult<Vec<Scenario>> {
        input.validate()?;
        let candidates = candidates_for(input, mode)?;

        let scenarios = candidates
            .into_par_iter()
            .enumerate()
            .map(|(index, candidate)| self.build_scenario(input, index, candidate))
            .collect::<EngineResult<Vec<Scenario>>>()?;

        debug!(
            mode = mode.as_str(),
            period = %self.schedule.period,
            salt = %self.salt,
            scenarios = scenarios.len(),
            "Generated scenarios"
        );

        Ok(scenarios)
    }

    fn build_scenario(&self, input: &HouseholdInput, index: usize, candidate: Candidate) -> EngineResult<Scenario> {
        let parent1 = with_work_days(&input.parent1, candidate.parent1_days, DayAnchor::FromMonday);
        let parent2 = input
            .parent2
            .as_ref()
            .map(|p| with_work_days(p, candidate.parent2_days, DayAnchor::FromFriday));

        let care_days = resolve_care_schedule(&parent1, parent2.as_ref(), 0)
            .result
            .care_days_count;
        let children = input
            .children
            .iter()
            .map(|child| child.limited_to_care_days(care_days))
            .collect();

        let scenario_input = HouseholdInput {
            parent1,
            parent2,
            children,
            withholding_percentage: input.withholding_percentage,
        };
        let calculation = calculate_household(&scenario_input, self.schedule)?;
        let metrics = scenario_metrics(calculation.snapshot.household_income, &calculation.totals)?;

        let id_name = format!("{}:{}:{}", index, candidate.parent1_days, candidate.parent2_days);

        Ok(Scenario {
            id: Uuid::new_v5(&self.salt, id_name.as_bytes()),
            name: candidate.name,
            parent1_days: candidate.parent1_days,
            parent2_days: candidate.parent2_days,
            total_work_days: candidate.parent1_days + candidate.parent2_days,
            care_days,
            snapshot: calculation.snapshot,
            costs: calculation.costs,
            totals: calculation.totals,
            metrics,
            favorited: false,
            removed: false,
        })
    }
}

fn with_work_days(parent: &ParentProfile, days: u8, anchor: DayAnchor) -> ParentProfile {
    let work_days = derive_work_days(days, anchor);
    ParentProfile {
        work_days_per_week: work_days.len() as u8,
        work_days,
        ..parent.clone()
    }
}

/// Computes the comparison metrics for a scenario's totals.
///
/// The cost percentage is rounded to two decimal places and is zero when the
/// household has no income.
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] if net income or the cost
/// percentage cannot be represented.
pub fn scenario_metrics(household_income: Decimal, totals: &HouseholdTotals) -> EngineResult<ScenarioMetrics> {
    let annual_out_of_pocket = totals.annual.out_of_pocket;
    let cost_percentage_of_income = if household_income.is_zero() {
        Decimal::ZERO
    } else {
        let share = annual_out_of_pocket
            .checked_div(household_income)
            .ok_or_else(|| EngineError::overflow("cost percentage of income"))?;
        round_currency(checked_product(share, Decimal::ONE_HUNDRED, "cost percentage of income")?)
    };
    let net_income = household_income
        .checked_sub(annual_out_of_pocket)
        .ok_or_else(|| EngineError::overflow("net income"))?;

    Ok(ScenarioMetrics {
        annual_subsidy: totals.annual.paid_subsidy,
        annual_out_of_pocket,
        net_income,
        cost_percentage_of_income,
    })
}

fn single_earner_candidates(days: impl IntoIterator<Item = u8>, has_parent2: bool) -> Vec<Candidate> {
    days.into_iter()
        .map(|d| Candidate::from_pair(d, 0, has_parent2))
        .collect()
}

fn candidates_for(input: &HouseholdInput, mode: &ScenarioMode) -> EngineResult<Vec<Candidate>> {
    let has_parent2 = !input.is_single_parent();

    let candidates = match mode {
        ScenarioMode::All if has_parent2 => (0..=MAX_WORK_DAYS)
            .flat_map(|p1| (0..=MAX_WORK_DAYS).map(move |p2| (p1, p2)))
            .filter(|&pair| pair != (0, 0))
            .map(|(p1, p2)| Candidate::from_pair(p1, p2, true))
            .collect(),
        ScenarioMode::All | ScenarioMode::SingleParent => {
            single_earner_candidates(1..=MAX_WORK_DAYS, has_parent2)
        }
        ScenarioMode::Common => {
            let second_earner = input
                .parent2
                .as_ref()
                .is_some_and(|p| p.fte_income > Decimal::ZERO);
            if second_earner {
                COMMON_PAIRS
                    .iter()
                    .map(|&(p1, p2)| Candidate::from_pair(p1, p2, true))
                    .collect()
            } else {
                single_earner_candidates(COMMON_SINGLE_EARNER_DAYS, has_parent2)
            }
        }
        ScenarioMode::Custom(custom) => validate_custom(custom, has_parent2)?,
    };

    Ok(candidates)
}

fn validate_custom(custom: &[CustomScenario], has_parent2: bool) -> EngineResult<Vec<Candidate>> {
    if custom.is_empty() {
        return Err(EngineError::invalid_field(
            "custom",
            "must contain at least one scenario",
        ));
    }

    custom
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let field = |name: &str| format!("custom[{}].{}", i, name);
            if c.parent1_days > MAX_WORK_DAYS {
                return Err(EngineError::invalid_field(
                    field("parent1_days"),
                    format!("must be between 0 and 5 (got {})", c.parent1_days),
                ));
            }
            if c.parent2_days > MAX_WORK_DAYS {
                return Err(EngineError::invalid_field(
                    field("parent2_days"),
                    format!("must be between 0 and 5 (got {})", c.parent2_days),
                ));
            }
            if c.parent1_days == 0 && c.parent2_days == 0 {
                return Err(EngineError::invalid_field(
                    format!("custom[{}]", i),
                    "at least one parent must work",
                ));
            }
            if !has_parent2 && c.parent2_days > 0 {
                return Err(EngineError::invalid_field(
                    field("parent2_days"),
                    "must be 0 for a single-parent household",
                ));
            }

            let mut candidate = Candidate::from_pair(c.parent1_days, c.parent2_days, has_parent2);
            if !c.name.trim().is_empty() {
                candidate.name = c.name.clone();
            }
            Ok(candidate)
        })
        .collect()
}
