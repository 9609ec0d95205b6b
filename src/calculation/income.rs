//! Income adjustment functionality.
//!
//! This module converts a parent's full-time-equivalent income and work
//! pattern into the adjusted income used for subsidy assessment, and sums
//! the parents' adjusted incomes into a [`HouseholdSnapshot`].

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, HouseholdSnapshot, MAX_HOURS_PER_DAY, MAX_WORK_DAYS, ParentProfile};

use super::cost::{checked_product, round_currency};

/// The result of building a household snapshot, including the audit step.
#[derive(Debug, Clone)]
pub struct HouseholdSnapshotResult {
    /// The adjusted incomes.
    pub snapshot: HouseholdSnapshot,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Adjusts a full-time-equivalent income for the days actually worked.
///
/// The adjusted income is `base_income × work_days_per_week / 5`, rounded to
/// cents. `hours_per_day` is validated but does not affect the result; it is
/// accepted so callers can pass a whole work pattern.
///
/// # Errors
///
/// Returns [`EngineError::InvalidField`] if the income is negative, the day
/// count exceeds 5, or the hours fall outside 0-24.
///
/// # Examples
///
/// ```
/// use subsidy_engine::calculation::adjust_income;
/// use rust_decimal::Decimal;
///
/// let adjusted = adjust_income(Decimal::new(100_000, 0), 3, Decimal::new(8, 0)).unwrap();
/// assert_eq!(adjusted, Decimal::new(60_000, 0));
///
/// // Hours per day do not change the result.
/// let same = adjust_income(Decimal::new(100_000, 0), 3, Decimal::new(4, 0)).unwrap();
/// assert_eq!(adjusted, same);
/// ```
pub fn adjust_income(
    base_income: Decimal,
    work_days_per_week: u8,
    hours_per_day: Decimal,
) -> EngineResult<Decimal> {
    if base_income < Decimal::ZERO {
        return Err(EngineError::invalid_field(
            "fte_income",
            format!("must not be negative (got {})", base_income),
        ));
    }
    if work_days_per_week > MAX_WORK_DAYS {
        return Err(EngineError::invalid_field(
            "work_days_per_week",
            format!("must be between 0 and 5 (got {})", work_days_per_week),
        ));
    }
    if hours_per_day < Decimal::ZERO || hours_per_day > MAX_HOURS_PER_DAY {
        return Err(EngineError::invalid_field(
            "hours_per_day",
            format!("must be between 0 and 24 (got {})", hours_per_day),
        ));
    }

    let share = Decimal::from(work_days_per_week) / Decimal::from(MAX_WORK_DAYS);
    Ok(round_currency(checked_product(base_income, share, "adjusted income")?))
}

/// Builds the household snapshot from one or two parents.
///
/// # Errors
///
/// Returns [`EngineError::InvalidField`] for an invalid work pattern and
/// [`EngineError::CalculationError`] if the summed income overflows.
///
/// # Examples
///
/// ```
/// use subsidy_engine::calculation::calculate_household_snapshot;
/// use subsidy_engine::models::{ParentProfile, WorkDay};
/// use rust_decimal::Decimal;
///
/// let parent1 = ParentProfile::new(Decimal::new(90_000, 0), WorkDay::ALL, Decimal::new(8, 0)).unwrap();
/// let parent2 = ParentProfile::new(
///     Decimal::new(50_000, 0),
///     [WorkDay::Wednesday, WorkDay::Thursday],
///     Decimal::new(8, 0),
/// )
/// .unwrap();
///
/// let result = calculate_household_snapshot(&parent1, Some(&parent2), 1).unwrap();
/// assert_eq!(result.snapshot.household_income, Decimal::new(110_000, 0));
/// ```
pub fn calculate_household_snapshot(
    parent1: &ParentProfile,
    parent2: Option<&ParentProfile>,
    step_number: u32,
) -> EngineResult<HouseholdSnapshotResult> {
    let parent1_adjusted =
        adjust_income(parent1.fte_income, parent1.work_days_per_week, parent1.hours_per_day)?;
    let parent2_adjusted = parent2
        .map(|p| adjust_income(p.fte_income, p.work_days_per_week, p.hours_per_day))
        .transpose()?;

    let household_income = parent1_adjusted
        .checked_add(parent2_adjusted.unwrap_or(Decimal::ZERO))
        .ok_or_else(|| EngineError::overflow("household income"))?;

    let reasoning = match (parent2, parent2_adjusted) {
        (Some(p2), Some(p2_adjusted)) => format!(
            "${} × {}/5 = ${}; ${} × {}/5 = ${}; household income ${}",
            parent1.fte_income.normalize(),
            parent1.work_days_per_week,
            parent1_adjusted.normalize(),
            p2.fte_income.normalize(),
            p2.work_days_per_week,
            p2_adjusted.normalize(),
            household_income.normalize()
        ),
        _ => format!(
            "${} × {}/5 = ${}; single-parent household income ${}",
            parent1.fte_income.normalize(),
            parent1.work_days_per_week,
            parent1_adjusted.normalize(),
            household_income.normalize()
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_adjustment".to_string(),
        rule_name: "Income Adjustment".to_string(),
        policy_ref: "household_income".to_string(),
        input: serde_json::json!({
            "parent1_fte_income": parent1.fte_income.to_string(),
            "parent1_work_days": parent1.work_days_per_week,
            "parent2_fte_income": parent2.map(|p| p.fte_income.to_string()),
            "parent2_work_days": parent2.map(|p| p.work_days_per_week),
        }),
        output: serde_json::json!({
            "parent1_adjusted_income": parent1_adjusted.to_string(),
            "parent2_adjusted_income": parent2_adjusted.map(|i| i.to_string()),
            "household_income": household_income.to_string(),
        }),
        reasoning,
    };

    Ok(HouseholdSnapshotResult {
        snapshot: HouseholdSnapshot {
            parent1_adjusted_income: parent1_adjusted,
            parent2_adjusted_income: parent2_adjusted,
            household_income,
        },
        audit_step,
    })
}
