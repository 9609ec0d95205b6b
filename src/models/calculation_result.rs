//! Calculation result models for the Childcare Subsidy Engine.
//!
//! This module contains the [`HouseholdCalculation`] type and the per-stage
//! records it is assembled from: subsidy determinations, the activity test
//! result, the resolved care schedule, per-child cost breakdowns, household
//! totals, and the audit trace.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AgeCategory, CareType, HouseholdSnapshot, WorkDay};

/// Which subsidy percentage schedule applied to a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateTier {
    /// The schedule for the eldest child and children above the age ceiling.
    Standard,
    /// The schedule for younger siblings at or below the age ceiling.
    Higher,
}

/// The subsidy percentage resolved for one child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsidyDetermination {
    /// Index of the child in the household input.
    pub child_index: usize,
    /// 1-based position among siblings, oldest first.
    pub position: usize,
    /// The resolved subsidy percentage (0-100).
    pub percentage: Decimal,
    /// The tier the child was assigned to.
    pub tier: RateTier,
    /// True when the higher tier fell back to the standard schedule.
    pub reverted_to_standard: bool,
}

/// The two allowance levels of the activity test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Lower-activity parent at or below the cutoff.
    Base,
    /// Lower-activity parent above the cutoff.
    Higher,
}

/// The subsidised care allowance granted by the activity test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTestResult {
    /// Fortnightly hours of the parent with the lower activity.
    pub lower_parent_hours_per_fortnight: Decimal,
    /// The allowance level selected.
    pub level: ActivityLevel,
    /// Subsidised hours per fortnight.
    pub subsidised_hours_per_fortnight: Decimal,
    /// Subsidised hours per week.
    pub subsidised_hours_per_week: Decimal,
    /// Nominal subsidised days per fortnight (0-10).
    pub subsidised_days_per_fortnight: Decimal,
    /// Nominal subsidised days per week (0-5).
    pub subsidised_days_per_week: Decimal,
}

/// How the days requiring paid care are derived from the parents' work days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulePolicy {
    /// Care is needed only on days every parent works.
    Intersection,
}

/// The weekdays on which paid childcare is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// The policy used to combine the parents' work days.
    pub policy: SchedulePolicy,
    /// Weekdays on which paid care is required.
    pub care_days: BTreeSet<WorkDay>,
    /// Number of care days (0-5).
    pub care_days_count: u8,
    /// Weekdays on which no paid care is required.
    pub days_without_care: BTreeSet<WorkDay>,
    /// Human-readable explanation of the resolution.
    pub explanation: String,
}

/// The unit a provider fee is charged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareUnit {
    /// Fee per hour.
    Hour,
    /// Fee per day.
    Day,
}

/// The monetary amounts of a cost calculation over one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CostAmounts {
    /// Subsidy before withholding.
    pub gross_subsidy: Decimal,
    /// Subsidy held back by the payer.
    pub withheld_amount: Decimal,
    /// Subsidy paid to the provider (`gross_subsidy - withheld_amount`).
    pub paid_subsidy: Decimal,
    /// The provider's fee for all units booked.
    pub full_cost: Decimal,
    /// What the household pays (`full_cost - paid_subsidy`).
    pub out_of_pocket: Decimal,
}

impl CostAmounts {
    /// Multiplies every amount by `factor`, or returns `None` on overflow.
    pub fn checked_scaled(&self, factor: Decimal) -> Option<CostAmounts> {
        Some(CostAmounts {
            gross_subsidy: self.gross_subsidy.checked_mul(factor)?,
            withheld_amount: self.withheld_amount.checked_mul(factor)?,
            paid_subsidy: self.paid_subsidy.checked_mul(factor)?,
            full_cost: self.full_cost.checked_mul(factor)?,
            out_of_pocket: self.out_of_pocket.checked_mul(factor)?,
        })
    }

    /// Adds two sets of amounts field by field, or returns `None` on overflow.
    pub fn checked_add(&self, rhs: &CostAmounts) -> Option<CostAmounts> {
        Some(CostAmounts {
            gross_subsidy: self.gross_subsidy.checked_add(rhs.gross_subsidy)?,
            withheld_amount: self.withheld_amount.checked_add(rhs.withheld_amount)?,
            paid_subsidy: self.paid_subsidy.checked_add(rhs.paid_subsidy)?,
            full_cost: self.full_cost.checked_add(rhs.full_cost)?,
            out_of_pocket: self.out_of_pocket.checked_add(rhs.out_of_pocket)?,
        })
    }
}

/// The cost calculation for one child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Index of the child in the household input.
    pub child_index: usize,
    /// 1-based position among siblings, oldest first.
    pub position: usize,
    /// The care type used for the cap lookup.
    pub care_type: CareType,
    /// The age category used for the cap lookup.
    pub age_category: AgeCategory,
    /// The unit fees and caps are expressed in.
    pub unit: CareUnit,
    /// The provider's fee per unit.
    pub provider_fee: Decimal,
    /// The schedule's cap per unit.
    pub rate_cap: Decimal,
    /// The lesser of the provider fee and the cap.
    pub effective_rate: Decimal,
    /// The subsidy percentage applied.
    pub subsidy_percentage: Decimal,
    /// Units booked per week.
    pub units_needed: Decimal,
    /// Units per week that attract subsidy.
    pub subsidised_units: Decimal,
    /// Subsidy per subsidised unit.
    pub subsidy_per_unit: Decimal,
    /// The withholding percentage applied.
    pub withholding_percentage: Decimal,
    /// Weekly amounts.
    pub weekly: CostAmounts,
    /// Annual amounts.
    pub annual: CostAmounts,
}

/// Household totals summed across children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HouseholdTotals {
    /// Weekly totals.
    pub weekly: CostAmounts,
    /// Annual totals.
    pub annual: CostAmounts,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The rate schedule section the rule reads from.
    pub policy_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Returns the step number the next recorded step should use.
    pub fn next_step_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }
}

/// The complete result of a household calculation.
///
/// This record is a pure function of the household input and the rate
/// schedule: it carries no identifiers or timestamps, so recomputing it with
/// the same inputs yields an identical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdCalculation {
    /// The policy period of the rate schedule used.
    pub policy_period: String,
    /// Adjusted incomes.
    pub snapshot: HouseholdSnapshot,
    /// The activity test outcome.
    pub activity_test: ActivityTestResult,
    /// The days on which paid care is required.
    pub schedule: ScheduleResult,
    /// Subsidy percentages, in input order.
    pub subsidies: Vec<SubsidyDetermination>,
    /// Cost breakdowns, in input order.
    pub costs: Vec<CostBreakdown>,
    /// Totals across children.
    pub totals: HouseholdTotals,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}
