//! Configuration types for subsidy calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. One [`RateSchedule`] holds
//! every table needed for a single policy period.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AgeCategory, CareType};

/// Metadata about the subsidy program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramMetadata {
    /// Short program code (e.g., "CCS").
    pub code: String,
    /// The human-readable name of the program.
    pub name: String,
    /// The jurisdiction that administers the program.
    pub jurisdiction: String,
    /// URL to the official program documentation.
    pub source_url: String,
}

/// The standard subsidy percentage schedule.
///
/// Income below `taper_start` receives `max_rate`. From `taper_start` the rate
/// falls by `step` percentage points for every `increment` dollars (the first
/// step applies at `taper_start` itself), never below `floor_rate`. Income at
/// or above `cutoff` receives `floor_rate`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StandardTier {
    /// The rate paid below the taper.
    pub max_rate: Decimal,
    /// The lowest rate paid.
    pub floor_rate: Decimal,
    /// The income at which the taper begins.
    pub taper_start: Decimal,
    /// Percentage points removed per increment.
    pub step: Decimal,
    /// Dollars of income per step.
    pub increment: Decimal,
    /// Income from which only the floor rate is paid.
    pub cutoff: Decimal,
}

/// One tapering band of the higher subsidy schedule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaperBand {
    /// The income at which this band's taper begins.
    pub start: Decimal,
    /// Percentage points removed per increment.
    pub step: Decimal,
    /// Dollars of income per step.
    pub increment: Decimal,
    /// The flat rate this band tapers down to.
    pub floor_rate: Decimal,
}

/// The higher subsidy percentage schedule for younger siblings.
///
/// The rate starts at `max_rate` and each band in turn tapers from the
/// previous band's floor (or `max_rate`) down to its own floor. Income above
/// `revert_threshold` is assessed on the standard schedule instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HigherTier {
    /// Children at or below this age are eligible in position two or later.
    pub age_ceiling: u8,
    /// The rate paid before the first band.
    pub max_rate: Decimal,
    /// Tapering bands in ascending income order.
    pub bands: Vec<TaperBand>,
    /// Income above which the standard schedule applies.
    pub revert_threshold: Decimal,
}

/// A maximum hourly rate the subsidy is calculated on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateCap {
    /// The care type this cap applies to.
    pub care_type: CareType,
    /// The age category this cap applies to.
    pub age_category: AgeCategory,
    /// The hourly cap.
    pub hourly: Decimal,
}

/// Activity test thresholds. All hour values are per fortnight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityTestConfig {
    /// Lower-activity parent hours at or below which the base allowance applies.
    pub cutoff_hours: Decimal,
    /// Subsidised hours for the base allowance.
    pub base_hours: Decimal,
    /// Subsidised hours for the higher allowance.
    pub higher_hours: Decimal,
    /// Session length used to express allowances in days.
    pub nominal_session_hours: Decimal,
}

/// Bounds for the percentage of subsidy withheld.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WithholdingConfig {
    /// Percentage withheld when the household does not choose one.
    pub default: Decimal,
    /// Lowest percentage a household may choose.
    pub min: Decimal,
    /// Highest percentage a household may choose.
    pub max: Decimal,
}

/// Every table needed to calculate subsidy for one policy period.
///
/// Immutable for a given calculation; loading a different schedule is the
/// way to support a new policy year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateSchedule {
    /// The policy period identifier (e.g., "2025-26").
    pub period: String,
    /// The first day this schedule applies.
    pub effective_date: NaiveDate,
    /// Weeks used to annualize weekly amounts.
    #[serde(default = "default_weeks_per_year")]
    pub weeks_per_year: u32,
    /// Age from which a child falls in the school-age cap category.
    pub school_age_from: u8,
    /// The standard percentage schedule.
    pub standard_tier: StandardTier,
    /// The higher percentage schedule.
    pub higher_tier: HigherTier,
    /// Hourly rate caps by care type and age category.
    pub rate_caps: Vec<RateCap>,
    /// Activity test thresholds.
    pub activity_test: ActivityTestConfig,
    /// Withholding bounds.
    pub withholding: WithholdingConfig,
}

fn default_weeks_per_year() -> u32 {
    52
}

impl RateSchedule {
    /// Returns the cap age category for a child of `age`.
    pub fn age_category(&self, age: u8) -> AgeCategory {
        if age >= self.school_age_from {
            AgeCategory::SchoolAge
        } else {
            AgeCategory::BelowSchoolAge
        }
    }

    /// Returns the hourly rate cap for a care type and age category.
    ///
    /// Returns [`EngineError::RateCapNotFound`] rather than defaulting when the
    /// schedule has no entry for the combination.
    pub fn hourly_cap(&self, care_type: CareType, age_category: AgeCategory) -> EngineResult<Decimal> {
        self.rate_caps
            .iter()
            .find(|cap| cap.care_type == care_type && cap.age_category == age_category)
            .map(|cap| cap.hourly)
            .ok_or_else(|| EngineError::RateCapNotFound {
                care_type: care_type.to_string(),
                age_category: age_category.to_string(),
            })
    }

    /// Resolves a withholding override against the schedule's bounds.
    ///
    /// `None` yields the default percentage.
    pub fn withholding_percentage(&self, requested: Option<Decimal>) -> EngineResult<Decimal> {
        let value = requested.unwrap_or(self.withholding.default);
        if value < self.withholding.min || value > self.withholding.max {
            return Err(EngineError::WithholdingOutOfRange {
                value,
                min: self.withholding.min,
                max: self.withholding.max,
            });
        }
        Ok(value)
    }

    /// Checks the schedule for internally inconsistent values.
    pub fn validate(&self) -> EngineResult<()> {
        let field = |name: &str| format!("{}.{}", self.period, name);

        check_rate(&field("standard_tier.max_rate"), self.standard_tier.max_rate)?;
        check_rate(&field("standard_tier.floor_rate"), self.standard_tier.floor_rate)?;
        check_positive(&field("standard_tier.increment"), self.standard_tier.increment)?;
        check_positive(&field("standard_tier.step"), self.standard_tier.step)?;
        if self.standard_tier.floor_rate > self.standard_tier.max_rate {
            return Err(EngineError::invalid_config(
                field("standard_tier.floor_rate"),
                "must not exceed max_rate",
            ));
        }
        if self.standard_tier.cutoff < self.standard_tier.taper_start {
            return Err(EngineError::invalid_config(
                field("standard_tier.cutoff"),
                "must not be below taper_start",
            ));
        }

        check_rate(&field("higher_tier.max_rate"), self.higher_tier.max_rate)?;
        let mut previous_start = Decimal::MIN;
        let mut previous_rate = self.higher_tier.max_rate;
        for (index, band) in self.higher_tier.bands.iter().enumerate() {
            let band_field = |name: &str| field(&format!("higher_tier.bands[{}].{}", index, name));
            check_rate(&band_field("floor_rate"), band.floor_rate)?;
            check_positive(&band_field("increment"), band.increment)?;
            check_positive(&band_field("step"), band.step)?;
            if band.start <= previous_start {
                return Err(EngineError::invalid_config(
                    band_field("start"),
                    "bands must be in ascending income order",
                ));
            }
            if band.floor_rate > previous_rate {
                return Err(EngineError::invalid_config(
                    band_field("floor_rate"),
                    "must not exceed the preceding band's rate",
                ));
            }
            previous_start = band.start;
            previous_rate = band.floor_rate;
        }
        if self.higher_tier.revert_threshold < previous_start {
            return Err(EngineError::invalid_config(
                field("higher_tier.revert_threshold"),
                "must not be below the last band's start",
            ));
        }

        for cap in &self.rate_caps {
            if cap.hourly < Decimal::ZERO {
                return Err(EngineError::invalid_config(
                    field(&format!("rate_caps.{}.{}", cap.care_type, cap.age_category)),
                    "must not be negative",
                ));
            }
        }

        let activity = &self.activity_test;
        check_positive(
            &field("activity_test.nominal_session_hours"),
            activity.nominal_session_hours,
        )?;
        if activity.base_hours < Decimal::ZERO || activity.higher_hours < activity.base_hours {
            return Err(EngineError::invalid_config(
                field("activity_test.higher_hours"),
                "allowances must be non-negative and higher_hours >= base_hours",
            ));
        }

        let withholding = &self.withholding;
        check_rate(&field("withholding.min"), withholding.min)?;
        check_rate(&field("withholding.max"), withholding.max)?;
        if withholding.default < withholding.min || withholding.default > withholding.max {
            return Err(EngineError::invalid_config(
                field("withholding.default"),
                "must lie within min..=max",
            ));
        }

        if self.weeks_per_year == 0 {
            return Err(EngineError::invalid_config(
                field("weeks_per_year"),
                "must be positive",
            ));
        }

        Ok(())
    }
}

fn check_rate(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(EngineError::invalid_config(
            field,
            format!("must be between 0 and 100 (got {})", value),
        ));
    }
    Ok(())
}

fn check_positive(field: &str, value: Decimal) -> EngineResult<()> {
    if value <= Decimal::ZERO {
        return Err(EngineError::invalid_config(
            field,
            format!("must be positive (got {})", value),
        ));
    }
    Ok(())
}

/// The complete program configuration loaded from YAML files.
///
/// Holds the program metadata and every loaded rate schedule.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    /// Program metadata.
    metadata: ProgramMetadata,
    /// Rate schedules by effective date (sorted oldest first).
    schedules: Vec<RateSchedule>,
}

impl PolicyConfig {
    /// Creates a new PolicyConfig from its component parts.
    pub fn new(metadata: ProgramMetadata, schedules: Vec<RateSchedule>) -> Self {
        let mut sorted_schedules = schedules;
        sorted_schedules.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Self {
            metadata,
            schedules: sorted_schedules,
        }
    }

    /// Returns the program metadata.
    pub fn program(&self) -> &ProgramMetadata {
        &self.metadata
    }

    /// Returns all rate schedules, oldest first.
    pub fn schedules(&self) -> &[RateSchedule] {
        &self.schedules
    }
}
