//! Activity test functionality.
//!
//! The activity test sets how many hours of care per fortnight attract
//! subsidy. It looks at the parent with the lower recognised activity and
//! grants the base or higher allowance depending on whether that parent's
//! fortnightly hours exceed the cutoff.

use rust_decimal::Decimal;

use crate::config::ActivityTestConfig;
use crate::error::EngineResult;
use crate::models::{ActivityLevel, ActivityTestResult, AuditStep, ParentProfile};

/// The maximum nominal subsidised days in a fortnight.
pub const MAX_DAYS_PER_FORTNIGHT: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// The result of the activity test, including the audit step.
#[derive(Debug, Clone)]
pub struct ActivityTestOutcome {
    /// The allowance granted.
    pub result: ActivityTestResult,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Evaluates the activity test for one or two parents.
///
/// # Arguments
///
/// * `parent1` - The first parent
/// * `parent2` - The second parent, if any
/// * `config` - The schedule's activity test thresholds
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// The subsidised allowance in hours and nominal days, per fortnight and per
/// week. A single-parent household is assessed on that parent alone.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidField`] if either parent's
/// work pattern is invalid, for example negative hours per day.
///
/// # Examples
///
/// ```
/// use subsidy_engine::calculation::evaluate_activity_test;
/// use subsidy_engine::config::ActivityTestConfig;
/// use subsidy_engine::models::{ActivityLevel, ParentProfile, WorkDay};
/// use rust_decimal::Decimal;
///
/// let config = ActivityTestConfig {
///     cutoff_hours: Decimal::new(48, 0),
///     base_hours: Decimal::new(72, 0),
///     higher_hours: Decimal::new(100, 0),
///     nominal_session_hours: Decimal::new(10, 0),
/// };
/// let parent = ParentProfile::new(Decimal::new(80_000, 0), WorkDay::ALL, Decimal::new(8, 0)).unwrap();
///
/// let outcome = evaluate_activity_test(&parent, None, &config, 1).unwrap();
/// assert_eq!(outcome.result.level, ActivityLevel::Higher);
/// assert_eq!(outcome.result.subsidised_hours_per_week, Decimal::new(50, 0));
/// ```
pub fn evaluate_activity_test(
    parent1: &ParentProfile,
    parent2: Option<&ParentProfile>,
    config: &ActivityTestConfig,
    step_number: u32,
) -> EngineResult<ActivityTestOutcome> {
    parent1.validate("parent1")?;
    if let Some(parent2) = parent2 {
        parent2.validate("parent2")?;
    }

    let parent1_hours = parent1.hours_per_fortnight();
    let parent2_hours = parent2.map(ParentProfile::hours_per_fortnight);
    let lower_hours = match parent2_hours {
        Some(hours) => parent1_hours.min(hours),
        None => parent1_hours,
    };

    let (level, hours_per_fortnight) = if lower_hours <= config.cutoff_hours {
        (ActivityLevel::Base, config.base_hours)
    } else {
        (ActivityLevel::Higher, config.higher_hours)
    };

    let hours_per_week = hours_per_fortnight / Decimal::TWO;
    let days_per_fortnight = if config.nominal_session_hours > Decimal::ZERO {
        (hours_per_fortnight / config.nominal_session_hours).min(MAX_DAYS_PER_FORTNIGHT)
    } else {
        MAX_DAYS_PER_FORTNIGHT
    };
    let days_per_week = days_per_fortnight / Decimal::TWO;

    let level_name = match level {
        ActivityLevel::Base => "base",
        ActivityLevel::Higher => "higher",
    };
    let comparison = if lower_hours <= config.cutoff_hours {
        "at or below"
    } else {
        "above"
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "activity_test".to_string(),
        rule_name: "Activity Test".to_string(),
        policy_ref: "activity_test".to_string(),
        input: serde_json::json!({
            "parent1_hours_per_fortnight": parent1_hours.normalize().to_string(),
            "parent2_hours_per_fortnight": parent2_hours.map(|h| h.normalize().to_string()),
            "cutoff_hours": config.cutoff_hours.to_string()
        }),
        output: serde_json::json!({
            "level": level,
            "subsidised_hours_per_fortnight": hours_per_fortnight.to_string(),
            "subsidised_hours_per_week": hours_per_week.normalize().to_string(),
            "subsidised_days_per_week": days_per_week.normalize().to_string()
        }),
        reasoning: format!(
            "Lower activity is {} hours/fortnight, {} the {}-hour cutoff: {} allowance of {} hours/fortnight ({} hours/week)",
            lower_hours.normalize(),
            comparison,
            config.cutoff_hours.normalize(),
            level_name,
            hours_per_fortnight.normalize(),
            hours_per_week.normalize()
        ),
    };

    Ok(ActivityTestOutcome {
        result: ActivityTestResult {
            lower_parent_hours_per_fortnight: lower_hours,
            level,
            subsidised_hours_per_fortnight: hours_per_fortnight,
            subsidised_hours_per_week: hours_per_week,
            subsidised_days_per_fortnight: days_per_fortnight,
            subsidised_days_per_week: days_per_week,
        },
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::reference_schedule;
    use crate::error::EngineError;
    use crate::models::WorkDay;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_parent(days: &[WorkDay], hours: &str) -> ParentProfile {
        ParentProfile::new(dec("80000"), days.iter().copied(), dec(hours)).unwrap()
    }

    fn evaluate(parent1: &ParentProfile, parent2: Option<&ParentProfile>) -> ActivityTestResult {
        let config = reference_schedule().activity_test;
        evaluate_activity_test(parent1, parent2, &config, 1).unwrap().result
    }

    /// AT-001: the lower parent at 45.6 hours/fortnight gets the base allowance
    #[test]
    fn test_lower_parent_below_cutoff_gets_base_allowance() {
        let full_time = create_parent(&WorkDay::ALL, "8");
        let part_time = create_parent(
            &[WorkDay::Monday, WorkDay::Tuesday, WorkDay::Wednesday],
            "7.6",
        );

        let result = evaluate(&full_time, Some(&part_time));
        assert_eq!(result.lower_parent_hours_per_fortnight, dec("45.6"));
        assert_eq!(result.level, ActivityLevel::Base);
        assert_eq!(result.subsidised_hours_per_fortnight, dec("72"));
        assert_eq!(result.subsidised_hours_per_week, dec("36"));
        assert_eq!(result.subsidised_days_per_fortnight, dec("7.2"));
        assert_eq!(result.subsidised_days_per_week, dec("3.6"));
    }

    /// AT-002: both parents above the cutoff get the higher allowance
    #[test]
    fn test_both_parents_above_cutoff_get_higher_allowance() {
        let parent1 = create_parent(&WorkDay::ALL, "8");
        let parent2 = create_parent(
            &[WorkDay::Monday, WorkDay::Tuesday, WorkDay::Wednesday, WorkDay::Thursday],
            "7.5",
        );

        let result = evaluate(&parent1, Some(&parent2));
        assert_eq!(result.lower_parent_hours_per_fortnight, dec("60"));
        assert_eq!(result.level, ActivityLevel::Higher);
        assert_eq!(result.subsidised_hours_per_week, dec("50"));
        assert_eq!(result.subsidised_days_per_fortnight, dec("10"));
        assert_eq!(result.subsidised_days_per_week, dec("5"));
    }

    /// AT-003: exactly at the cutoff is the base allowance
    #[test]
    fn test_exactly_at_cutoff_is_base() {
        let parent = create_parent(&[WorkDay::Monday, WorkDay::Tuesday, WorkDay::Wednesday], "8");
        let result = evaluate(&parent, None);
        assert_eq!(result.lower_parent_hours_per_fortnight, dec("48"));
        assert_eq!(result.level, ActivityLevel::Base);
    }

    #[test]
    fn test_single_parent_assessed_alone() {
        let parent = create_parent(&WorkDay::ALL, "10");
        let result = evaluate(&parent, None);
        assert_eq!(result.lower_parent_hours_per_fortnight, dec("100"));
        assert_eq!(result.level, ActivityLevel::Higher);
    }

    #[test]
    fn test_non_working_parent_gets_base_allowance() {
        let parent1 = create_parent(&WorkDay::ALL, "8");
        let parent2 = create_parent(&[], "0");

        let result = evaluate(&parent1, Some(&parent2));
        assert_eq!(result.lower_parent_hours_per_fortnight, Decimal::ZERO);
        assert_eq!(result.level, ActivityLevel::Base);
        assert_eq!(result.subsidised_hours_per_week, dec("36"));
    }

    #[test]
    fn test_negative_hours_are_rejected() {
        let mut parent = create_parent(&WorkDay::ALL, "8");
        parent.hours_per_day = dec("-1");
        let config = reference_schedule().activity_test;

        match evaluate_activity_test(&parent, None, &config, 1) {
            Err(EngineError::InvalidField { field, .. }) => {
                assert_eq!(field, "parent1.hours_per_day")
            }
            other => panic!("Expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_audit_step_records_level() {
        let parent = create_parent(&[WorkDay::Monday], "8");
        let config = reference_schedule().activity_test;
        let outcome = evaluate_activity_test(&parent, None, &config, 4).unwrap();

        assert_eq!(outcome.audit_step.step_number, 4);
        assert_eq!(outcome.audit_step.rule_id, "activity_test");
        assert_eq!(outcome.audit_step.output["level"], "base");
        assert!(outcome.audit_step.reasoning.contains("at or below"));
    }
}
