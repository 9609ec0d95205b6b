//! Child model and related types.
//!
//! This module defines the [`ChildProfile`] struct along with the care type,
//! age category, and fee mode enums that drive rate cap lookup and cost
//! calculation.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::parent::{MAX_HOURS_PER_DAY, MAX_WORK_DAYS};

/// The maximum age accepted for a child in care.
pub const MAX_CHILD_AGE: u8 = 18;

/// The maximum number of care hours in a week.
pub const MAX_HOURS_PER_WEEK: Decimal = Decimal::from_parts(168, 0, 0, false, 0);

/// Represents the category of approved childcare service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareType {
    /// Long day care delivered from a centre.
    CentreBasedDayCare,
    /// Care delivered by an educator in their own home.
    FamilyDayCare,
    /// Before/after school and vacation care.
    OutsideSchoolHoursCare,
    /// Care delivered in the child's home.
    InHomeCare,
}

impl CareType {
    /// Returns the snake_case identifier used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            CareType::CentreBasedDayCare => "centre_based_day_care",
            CareType::FamilyDayCare => "family_day_care",
            CareType::OutsideSchoolHoursCare => "outside_school_hours_care",
            CareType::InHomeCare => "in_home_care",
        }
    }
}

impl fmt::Display for CareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Represents the age grouping used by the rate cap tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeCategory {
    /// A child who has not yet started school.
    BelowSchoolAge,
    /// A child attending school.
    SchoolAge,
}

impl AgeCategory {
    /// Returns the snake_case identifier used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeCategory::BelowSchoolAge => "below_school_age",
            AgeCategory::SchoolAge => "school_age",
        }
    }
}

impl fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a provider charges for care, with the booking quantities for that mode.
///
/// # Example
///
/// ```
/// use subsidy_engine::models::FeeMode;
/// use rust_decimal::Decimal;
///
/// let fee: FeeMode = serde_json::from_str(
///     r#"{"mode": "daily", "daily_fee": "150", "hours_per_day": "10", "days_of_care": 3}"#,
/// )
/// .unwrap();
///
/// assert_eq!(fee.fee_amount(), Decimal::new(150, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FeeMode {
    /// A fee charged per day of care.
    Daily {
        /// The provider's fee for one day.
        daily_fee: Decimal,
        /// The length of a day session in hours.
        hours_per_day: Decimal,
        /// Number of days booked each week (0-5).
        days_of_care: u8,
    },
    /// A fee charged per hour of care.
    Hourly {
        /// The provider's fee for one hour.
        hourly_fee: Decimal,
        /// Hours of care booked each week.
        hours_per_week: Decimal,
    },
}

impl FeeMode {
    /// Returns the fee charged per unit, whichever the unit is.
    pub fn fee_amount(&self) -> Decimal {
        match self {
            FeeMode::Daily { daily_fee, .. } => *daily_fee,
            FeeMode::Hourly { hourly_fee, .. } => *hourly_fee,
        }
    }
}

/// Represents one child in care.
///
/// A child's position among siblings is not stored; it is derived by sorting
/// the household's children oldest-first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChildProfile {
    /// Age in whole years (0-18).
    pub age: u8,
    /// The category of care the child attends.
    pub care_type: CareType,
    /// The provider's fee and the booking quantities.
    pub fee: FeeMode,
}

impl ChildProfile {
    /// Validates every field, naming offending fields under `children[index]`.
    pub fn validate(&self, index: usize) -> EngineResult<()> {
        let field = |name: &str| format!("children[{}].{}", index, name);

        if self.age > MAX_CHILD_AGE {
            return Err(EngineError::invalid_field(
                field("age"),
                format!("must be between 0 and {} (got {})", MAX_CHILD_AGE, self.age),
            ));
        }

        match &self.fee {
            FeeMode::Daily {
                daily_fee,
                hours_per_day,
                days_of_care,
            } => {
                if *daily_fee < Decimal::ZERO {
                    return Err(EngineError::invalid_field(
                        field("daily_fee"),
                        format!("must not be negative (got {})", daily_fee),
                    ));
                }
                if *hours_per_day <= Decimal::ZERO || *hours_per_day > MAX_HOURS_PER_DAY {
                    return Err(EngineError::invalid_field(
                        field("hours_per_day"),
                        format!("must be greater than 0 and at most 24 (got {})", hours_per_day),
                    ));
                }
                if *days_of_care > MAX_WORK_DAYS {
                    return Err(EngineError::invalid_field(
                        field("days_of_care"),
                        format!("must be between 0 and 5 (got {})", days_of_care),
                    ));
                }
            }
            FeeMode::Hourly {
                hourly_fee,
                hours_per_week,
            } => {
                if *hourly_fee < Decimal::ZERO {
                    return Err(EngineError::invalid_field(
                        field("hourly_fee"),
                        format!("must not be negative (got {})", hourly_fee),
                    ));
                }
                if *hours_per_week < Decimal::ZERO || *hours_per_week > MAX_HOURS_PER_WEEK {
                    return Err(EngineError::invalid_field(
                        field("hours_per_week"),
                        format!("must be between 0 and 168 (got {})", hours_per_week),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Returns a copy of this child with the booking reduced to `care_days` a week.
    ///
    /// Daily bookings keep at most `care_days` days. Hourly bookings are treated
    /// as spread evenly over five days and keep the hours for `care_days` of them.
    /// Bookings are never increased.
    ///
    /// # Examples
    ///
    /// ```
    /// use subsidy_engine::models::{CareType, ChildProfile, FeeMode};
    /// use rust_decimal::Decimal;
    ///
    /// let child = ChildProfile {
    ///     age: 3,
    ///     care_type: CareType::CentreBasedDayCare,
    ///     fee: FeeMode::Hourly {
    ///         hourly_fee: Decimal::new(15, 0),
    ///         hours_per_week: Decimal::new(50, 0),
    ///     },
    /// };
    ///
    /// let reduced = child.limited_to_care_days(2);
    /// assert_eq!(
    ///     reduced.fee,
    ///     FeeMode::Hourly {
    ///         hourly_fee: Decimal::new(15, 0),
    ///         hours_per_week: Decimal::new(20, 0),
    ///     }
    /// );
    /// ```
    pub fn limited_to_care_days(&self, care_days: u8) -> ChildProfile {
        let care_days = care_days.min(MAX_WORK_DAYS);
        let fee = match &self.fee {
            FeeMode::Daily {
                daily_fee,
                hours_per_day,
                days_of_care,
            } => FeeMode::Daily {
                daily_fee: *daily_fee,
                hours_per_day: *hours_per_day,
                days_of_care: (*days_of_care).min(care_days),
            },
            FeeMode::Hourly {
                hourly_fee,
                hours_per_week,
            } => {
                let spread = *hours_per_week * Decimal::from(care_days)
                    / Decimal::from(MAX_WORK_DAYS);
                FeeMode::Hourly {
                    hourly_fee: *hourly_fee,
                    hours_per_week: (*hours_per_week).min(spread),
                }
            }
        };

        ChildProfile {
            age: self.age,
            care_type: self.care_type,
            fee,
        }
    }
}
