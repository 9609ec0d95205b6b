//! Care schedule resolution functionality.
//!
//! Paid care is needed on the weekdays when no parent is free to look after
//! the children. With two parents that is the intersection of their work
//! days; a single parent needs care on every day they work.

use std::collections::BTreeSet;

use crate::models::{AuditStep, ParentProfile, SchedulePolicy, ScheduleResult, WorkDay, MAX_WORK_DAYS};

/// Which end of the week [`derive_work_days`] fills from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayAnchor {
    /// Monday onwards.
    FromMonday,
    /// Friday backwards.
    FromFriday,
}

/// The resolved care schedule, including the audit step.
#[derive(Debug, Clone)]
pub struct ScheduleOutcome {
    /// The days requiring paid care.
    pub result: ScheduleResult,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Derives a concrete set of weekdays for a weekly day count.
///
/// Counts above five are treated as five.
///
/// # Examples
///
/// ```
/// use subsidy_engine::calculation::{derive_work_days, DayAnchor};
/// use subsidy_engine::models::WorkDay;
///
/// let days = derive_work_days(2, DayAnchor::FromFriday);
/// assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![WorkDay::Thursday, WorkDay::Friday]);
/// ```
pub fn derive_work_days(count: u8, anchor: DayAnchor) -> BTreeSet<WorkDay> {
    let count = usize::from(count.min(MAX_WORK_DAYS));
    match anchor {
        DayAnchor::FromMonday => WorkDay::ALL.iter().take(count).copied().collect(),
        DayAnchor::FromFriday => WorkDay::ALL.iter().rev().take(count).copied().collect(),
    }
}

fn format_days(days: &BTreeSet<WorkDay>) -> String {
    days.iter()
        .map(WorkDay::short_name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolves the weekdays on which paid care is required.
///
/// # Arguments
///
/// * `parent1` - The first parent
/// * `parent2` - The second parent, if any
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use subsidy_engine::calculation::resolve_care_schedule;
/// use subsidy_engine::models::{ParentProfile, WorkDay};
/// use rust_decimal::Decimal;
///
/// let parent1 = ParentProfile::new(Decimal::new(90_000, 0), WorkDay::ALL, Decimal::new(8, 0)).unwrap();
/// let parent2 = ParentProfile::new(
///     Decimal::new(60_000, 0),
///     [WorkDay::Monday, WorkDay::Wednesday],
///     Decimal::new(8, 0),
/// )
/// .unwrap();
///
/// let outcome = resolve_care_schedule(&parent1, Some(&parent2), 1);
/// assert_eq!(outcome.result.care_days_count, 2);
/// ```
pub fn resolve_care_schedule(
    parent1: &ParentProfile,
    parent2: Option<&ParentProfile>,
    step_number: u32,
) -> ScheduleOutcome {
    let care_days: BTreeSet<WorkDay> = match parent2 {
        Some(parent2) => parent1
            .work_days
            .intersection(&parent2.work_days)
            .copied()
            .collect(),
        None => parent1.work_days.clone(),
    };
    let days_without_care: BTreeSet<WorkDay> = WorkDay::ALL
        .iter()
        .filter(|day| !care_days.contains(day))
        .copied()
        .collect();
    let care_days_count = care_days.len() as u8;

    let explanation = match (parent2.is_some(), care_days.is_empty()) {
        (true, false) => format!(
            "Both parents work {}: paid care needed on {} day(s)",
            format_days(&care_days),
            care_days_count
        ),
        (true, true) => "No weekday on which both parents work: no paid care needed".to_string(),
        (false, false) => format!(
            "Single parent works {}: paid care needed on {} day(s)",
            format_days(&care_days),
            care_days_count
        ),
        (false, true) => "Single parent does not work: no paid care needed".to_string(),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "care_schedule".to_string(),
        rule_name: "Care Schedule".to_string(),
        policy_ref: "care_days".to_string(),
        input: serde_json::json!({
            "parent1_work_days": parent1.work_days,
            "parent2_work_days": parent2.map(|p| &p.work_days)
        }),
        output: serde_json::json!({
            "policy": SchedulePolicy::Intersection,
            "care_days": care_days,
            "care_days_count": care_days_count
        }),
        reasoning: explanation.clone(),
    };

    ScheduleOutcome {
        result: ScheduleResult {
            policy: SchedulePolicy::Intersection,
            care_days,
            care_days_count,
            days_without_care,
            explanation,
        },
        audit_step,
    }
}
