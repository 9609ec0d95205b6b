//! Household calculation pipeline.
//!
//! This module runs every calculation stage in order for one household and
//! assembles the [`HouseholdCalculation`] record with its audit trace.

use crate::config::RateSchedule;
use crate::error::EngineResult;
use crate::models::{AuditTrace, AuditWarning, FeeMode, HouseholdCalculation, HouseholdInput};

use super::activity_test::evaluate_activity_test;
use super::cost::{aggregate_totals, calculate_child_cost};
use super::income::calculate_household_snapshot;
use super::schedule::resolve_care_schedule;
use super::subsidy_rate::resolve_subsidy_rates;

/// Calculates subsidies and costs for a household under one rate schedule.
///
/// The stages run in this order, each adding to the audit trace:
///
/// 1. Income adjustment
/// 2. Activity test
/// 3. Care schedule
/// 4. Subsidy rate per child
/// 5. Cost per child
///
/// The result depends only on `input` and `schedule`; calling this twice with
/// the same arguments yields equal records.
///
/// # Errors
///
/// - [`crate::error::EngineError::InvalidField`] or
///   [`crate::error::EngineError::NoChildren`] if the input fails validation
/// - [`crate::error::EngineError::WithholdingOutOfRange`] if the withholding
///   override is outside the schedule's bounds
/// - [`crate::error::EngineError::RateCapNotFound`] if a child's care type has
///   no cap in the schedule
/// - [`crate::error::EngineError::CalculationError`] if an income or cost
///   amount is too large to represent
///
/// # Examples
///
/// ```no_run
/// use subsidy_engine::calculation::calculate_household;
/// use subsidy_engine::config::ConfigLoader;
/// use subsidy_engine::models::{CareType, ChildProfile, FeeMode, HouseholdInput, ParentProfile, WorkDay};
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/ccs")?;
/// let schedule = loader.schedule("2025-26")?;
///
/// let input = HouseholdInput {
///     parent1: ParentProfile::new(Decimal::new(100_000, 0), WorkDay::ALL, Decimal::new(8, 0))?,
///     parent2: None,
///     children: vec![ChildProfile {
///         age: 3,
///         care_type: CareType::CentreBasedDayCare,
///         fee: FeeMode::Hourly {
///             hourly_fee: Decimal::new(1625, 2),
///             hours_per_week: Decimal::new(40, 0),
///         },
///     }],
///     withholding_percentage: None,
/// };
///
/// let result = calculate_household(&input, schedule)?;
/// println!("Weekly out of pocket: ${}", result.totals.weekly.out_of_pocket);
/// # Ok::<(), subsidy_engine::error::EngineError>(())
/// ```
pub fn calculate_household(
    input: &HouseholdInput,
    schedule: &RateSchedule,
) -> EngineResult<HouseholdCalculation> {
    input.validate()?;
    let withholding = schedule.withholding_percentage(input.withholding_percentage)?;

    let mut audit_trace = AuditTrace::default();
    let parent2 = input.parent2.as_ref();

    let snapshot = calculate_household_snapshot(&input.parent1, parent2, audit_trace.next_step_number())?;
    audit_trace.steps.push(snapshot.audit_step);
    let snapshot = snapshot.snapshot;

    let activity = evaluate_activity_test(
        &input.parent1,
        parent2,
        &schedule.activity_test,
        audit_trace.next_step_number(),
    )?;
    audit_trace.steps.push(activity.audit_step);
    let activity_test = activity.result;

    let care = resolve_care_schedule(&input.parent1, parent2, audit_trace.next_step_number());
    audit_trace.steps.push(care.audit_step);
    let care_schedule = care.result;

    let rates = resolve_subsidy_rates(
        &input.children,
        snapshot.household_income,
        schedule,
        audit_trace.next_step_number(),
    );
    audit_trace.steps.extend(rates.audit_steps);
    let subsidies = rates.determinations;

    let mut costs = Vec::with_capacity(input.children.len());
    for (child, determination) in input.children.iter().zip(&subsidies) {
        let cost = calculate_child_cost(
            child,
            determination.child_index,
            determination.position,
            determination.percentage,
            &activity_test,
            schedule,
            withholding,
            audit_trace.next_step_number(),
        )?;
        audit_trace.steps.push(cost.audit_step);
        audit_trace.warnings.extend(cost.warnings);
        costs.push(cost.breakdown);
    }

    let has_booking = input.children.iter().any(|child| match &child.fee {
        FeeMode::Daily { days_of_care, .. } => *days_of_care > 0,
        FeeMode::Hourly { hours_per_week, .. } => !hours_per_week.is_zero(),
    });
    if care_schedule.care_days_count == 0 && has_booking {
        audit_trace.warnings.push(AuditWarning {
            code: "CARE_NOT_REQUIRED".to_string(),
            message: format!("Care is booked but {}", care_schedule.explanation),
            severity: "low".to_string(),
        });
    }

    let totals = aggregate_totals(&costs)?;

    Ok(HouseholdCalculation {
        policy_period: schedule.period.clone(),
        snapshot,
        activity_test,
        schedule: care_schedule,
        subsidies,
        costs,
        totals,
        audit_trace,
    })
}
