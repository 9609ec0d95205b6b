//! Scenario comparison, filtering, and ranking.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Scenario;

/// A figure scenarios can be ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioMetric {
    /// Household income less annual out-of-pocket cost. Higher is better.
    NetIncome,
    /// Annual out-of-pocket cost. Lower is better.
    OutOfPocket,
    /// Annual paid subsidy. Higher is better.
    Subsidy,
    /// Combined work days of both parents. Higher is better.
    TotalWorkDays,
    /// Out-of-pocket cost as a percentage of income. Lower is better.
    CostPercentage,
}

impl ScenarioMetric {
    /// Returns the scenario's value for this metric.
    pub fn value(&self, scenario: &Scenario) -> Decimal {
        match self {
            ScenarioMetric::NetIncome => scenario.metrics.net_income,
            ScenarioMetric::OutOfPocket => scenario.metrics.annual_out_of_pocket,
            ScenarioMetric::Subsidy => scenario.metrics.annual_subsidy,
            ScenarioMetric::TotalWorkDays => Decimal::from(scenario.total_work_days),
            ScenarioMetric::CostPercentage => scenario.metrics.cost_percentage_of_income,
        }
    }

    /// Returns true if a larger value of this metric is preferable.
    pub fn higher_is_better(&self) -> bool {
        matches!(
            self,
            ScenarioMetric::NetIncome | ScenarioMetric::Subsidy | ScenarioMetric::TotalWorkDays
        )
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Smallest first.
    Ascending,
    /// Largest first.
    #[default]
    Descending,
}

/// Compares two scenarios by `metric` in the given direction.
pub fn compare(a: &Scenario, b: &Scenario, metric: ScenarioMetric, order: SortOrder) -> Ordering {
    let ordering = metric.value(a).cmp(&metric.value(b));
    match order {
        SortOrder::Ascending => ordering,
        SortOrder::Descending => ordering.reverse(),
    }
}

/// Sorts scenarios in place; scenarios with equal values keep their order.
pub fn sort_scenarios(scenarios: &mut [Scenario], metric: ScenarioMetric, order: SortOrder) {
    scenarios.sort_by(|a, b| compare(a, b, metric, order));
}

/// Conditions a scenario must meet to be kept by [`filter_scenarios`].
///
/// Every condition that is set must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Lowest acceptable net income.
    pub min_net_income: Option<Decimal>,
    /// Highest acceptable annual out-of-pocket cost.
    pub max_out_of_pocket: Option<Decimal>,
    /// Fewest combined work days.
    pub min_work_days: Option<u8>,
    /// Most combined work days.
    pub max_work_days: Option<u8>,
    /// Keep only favourites.
    pub favorited_only: bool,
    /// Keep scenarios tagged as removed.
    pub include_removed: bool,
}

impl FilterCriteria {
    /// Returns true if `scenario` meets every condition.
    pub fn matches(&self, scenario: &Scenario) -> bool {
        if scenario.removed && !self.include_removed {
            return false;
        }
        if self.favorited_only && !scenario.favorited {
            return false;
        }
        if self
            .min_net_income
            .is_some_and(|min| scenario.metrics.net_income < min)
        {
            return false;
        }
        if self
            .max_out_of_pocket
            .is_some_and(|max| scenario.metrics.annual_out_of_pocket > max)
        {
            return false;
        }
        if self
            .min_work_days
            .is_some_and(|min| scenario.total_work_days < min)
        {
            return false;
        }
        if self
            .max_work_days
            .is_some_and(|max| scenario.total_work_days > max)
        {
            return false;
        }
        true
    }
}

/// Returns the scenarios that meet `criteria`, in their original order.
pub fn filter_scenarios(scenarios: &[Scenario], criteria: &FilterCriteria) -> Vec<Scenario> {
    scenarios
        .iter()
        .filter(|s| criteria.matches(s))
        .cloned()
        .collect()
}

/// Returns the best scenario by `metric`, or `None` if there are none.
///
/// Net income, subsidy and work days are maximised; out-of-pocket cost and
/// cost percentage are minimised. The earliest scenario wins a tie.
pub fn find_best(scenarios: &[Scenario], metric: ScenarioMetric) -> Option<&Scenario> {
    let wanted = if metric.higher_is_better() {
        Ordering::Greater
    } else {
        Ordering::Less
    };

    scenarios.iter().fold(None, |best: Option<&Scenario>, candidate| match best {
        Some(current) if metric.value(candidate).cmp(&metric.value(current)) != wanted => {
            Some(current)
        }
        _ => Some(candidate),
    })
}
