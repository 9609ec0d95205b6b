//! Application state for the Childcare Subsidy Engine API.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::{ConfigLoader, RateSchedule};
use crate::error::EngineResult;

/// Shared application state.
///
/// Holds the loaded rate schedules, shared read-only across all handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Selects the rate schedule for a request.
    ///
    /// An explicit period wins over a date; with neither, the latest schedule
    /// is used.
    pub fn select_schedule(
        &self,
        policy_period: Option<&str>,
        as_of: Option<NaiveDate>,
    ) -> EngineResult<&RateSchedule> {
        match (policy_period, as_of) {
            (Some(period), _) => self.config.schedule(period),
            (None, Some(date)) => self.config.schedule_for(date),
            (None, None) => self.config.latest(),
        }
    }
}
