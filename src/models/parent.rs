//! Parent model and related types.
//!
//! This module defines the [`ParentProfile`] struct and the [`WorkDay`] enum
//! for representing a parent's income and weekly work pattern.

use std::collections::BTreeSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The maximum number of work days in a week.
pub const MAX_WORK_DAYS: u8 = 5;

/// The maximum number of hours in a work day.
pub const MAX_HOURS_PER_DAY: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// A weekday on which a parent may work and a child may need care.
///
/// Weekends are not modelled; childcare sessions are booked Monday to Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkDay {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
}

impl WorkDay {
    /// All five weekdays, Monday first.
    pub const ALL: [WorkDay; 5] = [
        WorkDay::Monday,
        WorkDay::Tuesday,
        WorkDay::Wednesday,
        WorkDay::Thursday,
        WorkDay::Friday,
    ];

    /// Returns the three-letter abbreviation used in explanations.
    pub fn short_name(&self) -> &'static str {
        match self {
            WorkDay::Monday => "Mon",
            WorkDay::Tuesday => "Tue",
            WorkDay::Wednesday => "Wed",
            WorkDay::Thursday => "Thu",
            WorkDay::Friday => "Fri",
        }
    }
}

impl fmt::Display for WorkDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkDay::Monday => "Monday",
            WorkDay::Tuesday => "Tuesday",
            WorkDay::Wednesday => "Wednesday",
            WorkDay::Thursday => "Thursday",
            WorkDay::Friday => "Friday",
        };
        write!(f, "{}", name)
    }
}

/// Represents one parent's income and work pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentProfile {
    /// Annual full-time-equivalent income.
    pub fte_income: Decimal,
    /// Number of days worked per week (0-5).
    pub work_days_per_week: u8,
    /// Hours worked on each work day (0-24).
    pub hours_per_day: Decimal,
    /// The specific weekdays worked. Its size must equal `work_days_per_week`.
    #[serde(default)]
    pub work_days: BTreeSet<WorkDay>,
}

impl ParentProfile {
    /// Creates a validated parent profile from a set of work days.
    ///
    /// `work_days_per_week` is taken from the number of distinct days supplied.
    ///
    /// # Examples
    ///
    /// ```
    /// use subsidy_engine::models::{ParentProfile, WorkDay};
    /// use rust_decimal::Decimal;
    ///
    /// let parent = ParentProfile::new(
    ///     Decimal::new(90_000, 0),
    ///     [WorkDay::Monday, WorkDay::Tuesday, WorkDay::Wednesday],
    ///     Decimal::new(76, 1),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(parent.work_days_per_week, 3);
    /// assert_eq!(parent.hours_per_fortnight(), Decimal::new(456, 1));
    /// ```
    pub fn new(
        fte_income: Decimal,
        work_days: impl IntoIterator<Item = WorkDay>,
        hours_per_day: Decimal,
    ) -> EngineResult<Self> {
        let work_days: BTreeSet<WorkDay> = work_days.into_iter().collect();
        let parent = Self {
            fte_income,
            work_days_per_week: work_days.len() as u8,
            hours_per_day,
            work_days,
        };
        parent.validate("parent")?;
        Ok(parent)
    }

    /// Validates every field, naming offending fields under `prefix`.
    pub fn validate(&self, prefix: &str) -> EngineResult<()> {
        if self.fte_income < Decimal::ZERO {
            return Err(EngineError::invalid_field(
                format!("{}.fte_income", prefix),
                format!("must not be negative (got {})", self.fte_income),
            ));
        }
        if self.work_days_per_week > MAX_WORK_DAYS {
            return Err(EngineError::invalid_field(
                format!("{}.work_days_per_week", prefix),
                format!(
                    "must be between 0 and {} (got {})",
                    MAX_WORK_DAYS, self.work_days_per_week
                ),
            ));
        }
        if self.hours_per_day < Decimal::ZERO || self.hours_per_day > MAX_HOURS_PER_DAY {
            return Err(EngineError::invalid_field(
                format!("{}.hours_per_day", prefix),
                format!("must be between 0 and 24 (got {})", self.hours_per_day),
            ));
        }
        if self.work_days.len() != usize::from(self.work_days_per_week) {
            return Err(EngineError::invalid_field(
                format!("{}.work_days", prefix),
                format!(
                    "{} day(s) selected but work_days_per_week is {}",
                    self.work_days.len(),
                    self.work_days_per_week
                ),
            ));
        }
        Ok(())
    }

    /// Returns the hours worked across a fortnight.
    pub fn hours_per_fortnight(&self) -> Decimal {
        self.hours_per_day * Decimal::from(self.work_days_per_week) * Decimal::TWO
    }
}
