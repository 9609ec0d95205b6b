//! Error types for the Childcare Subsidy Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during a subsidy calculation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the Childcare Subsidy Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use subsidy_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/program.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/program.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A loaded rate schedule contained an inconsistent value.
    #[error("Invalid configuration '{field}': {message}")]
    InvalidConfig {
        /// The offending configuration field.
        field: String,
        /// A description of the violated constraint.
        message: String,
    },

    /// No rate schedule exists for the requested policy period.
    #[error("Policy period not found: {period}")]
    PolicyPeriodNotFound {
        /// The requested period identifier.
        period: String,
    },

    /// No rate schedule is effective on the requested date.
    #[error("No rate schedule effective on {date}")]
    NoScheduleForDate {
        /// The date for which a schedule was requested.
        date: NaiveDate,
    },

    /// The rate schedule has no cap for a care type and age category.
    #[error("Rate cap not found for care type '{care_type}' and age category '{age_category}'")]
    RateCapNotFound {
        /// The requested care type.
        care_type: String,
        /// The requested age category.
        age_category: String,
    },

    /// An input field was out of range or inconsistent.
    #[error("Invalid field '{field}': {message}")]
    InvalidField {
        /// The field that was invalid.
        field: String,
        /// A description of the violated constraint.
        message: String,
    },

    /// A calculation required at least one child but none were supplied.
    #[error("At least one child is required")]
    NoChildren,

    /// The withholding percentage is outside the schedule's bounds.
    #[error("Withholding {value}% is outside the allowed range {min}%..={max}%")]
    WithholdingOutOfRange {
        /// The requested withholding percentage.
        value: Decimal,
        /// The minimum allowed withholding percentage.
        min: Decimal,
        /// The maximum allowed withholding percentage.
        max: Decimal,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Creates an [`EngineError::InvalidField`] for the given field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an [`EngineError::InvalidConfig`] for the given field.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an [`EngineError::CalculationError`] for an amount that does
    /// not fit in a `Decimal`.
    pub fn overflow(quantity: impl Into<String>) -> Self {
        EngineError::CalculationError {
            message: format!("{} is too large to represent", quantity.into()),
        }
    }

    /// Returns true for errors caused by the rate schedule rather than the input.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EngineError::ConfigNotFound { .. }
                | EngineError::ConfigParseError { .. }
                | EngineError::InvalidConfig { .. }
                | EngineError::RateCapNotFound { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
