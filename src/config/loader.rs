//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading subsidy program
//! configuration from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{PolicyConfig, ProgramMetadata, RateSchedule};

/// Loads and provides access to versioned rate schedules.
///
/// The `ConfigLoader` reads YAML configuration files from a directory,
/// validates every rate schedule, and provides lookup by policy period or by
/// date.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/ccs/
/// ├── program.yaml      # Program metadata
/// └── periods/
///     ├── 2024-25.yaml  # One rate schedule per policy period
///     └── 2025-26.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use subsidy_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/ccs").unwrap();
///
/// let schedule = loader.schedule("2025-26").unwrap();
/// println!("Standard tier starts tapering at ${}", schedule.standard_tier.taper_start);
///
/// let date = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// let schedule = loader.schedule_for(date).unwrap();
/// println!("Effective schedule: {}", schedule.period);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PolicyConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/ccs")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any rate schedule fails validation
    /// - Two schedules share a policy period identifier
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let program_path = path.join("program.yaml");
        let metadata = Self::load_yaml::<ProgramMetadata>(&program_path)?;

        let periods_dir = path.join("periods");
        let schedules = Self::load_schedules(&periods_dir)?;

        debug!(
            program = %metadata.code,
            periods = schedules.len(),
            "Loaded rate schedules"
        );

        Ok(Self::from_config(PolicyConfig::new(metadata, schedules)))
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads and validates all schedule files from the periods directory.
    fn load_schedules(periods_dir: &Path) -> EngineResult<Vec<RateSchedule>> {
        let periods_dir_str = periods_dir.display().to_string();

        if !periods_dir.exists() {
            return Err(EngineError::ConfigNotFound {
                path: periods_dir_str,
            });
        }

        let entries = fs::read_dir(periods_dir).map_err(|_| EngineError::ConfigNotFound {
            path: periods_dir_str.clone(),
        })?;

        let mut schedules: Vec<RateSchedule> = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: periods_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let schedule = Self::load_yaml::<RateSchedule>(&path)?;
                schedule.validate()?;
                if schedules.iter().any(|s| s.period == schedule.period) {
                    return Err(EngineError::invalid_config(
                        format!("{}.period", schedule.period),
                        format!("duplicate policy period in {}", path.display()),
                    ));
                }
                schedules.push(schedule);
            }
        }

        if schedules.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no schedule files found)", periods_dir_str),
            });
        }

        Ok(schedules)
    }

    /// Returns the underlying program configuration.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Returns the program metadata.
    pub fn program(&self) -> &ProgramMetadata {
        self.config.program()
    }

    /// Gets the rate schedule for a policy period identifier.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use subsidy_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/ccs")?;
    /// let schedule = loader.schedule("2025-26")?;
    /// assert_eq!(schedule.period, "2025-26");
    /// # Ok::<(), subsidy_engine::error::EngineError>(())
    /// ```
    pub fn schedule(&self, period: &str) -> EngineResult<&RateSchedule> {
        self.config
            .schedules()
            .iter()
            .find(|s| s.period == period)
            .ok_or_else(|| EngineError::PolicyPeriodNotFound {
                period: period.to_string(),
            })
    }

    /// Gets the rate schedule effective on a given date.
    ///
    /// The method finds the most recent schedule that is effective on or
    /// before the given date.
    pub fn schedule_for(&self, date: NaiveDate) -> EngineResult<&RateSchedule> {
        self.config
            .schedules()
            .iter()
            .rfind(|s| s.effective_date <= date)
            .ok_or(EngineError::NoScheduleForDate { date })
    }

    /// Returns the most recent rate schedule.
    pub fn latest(&self) -> EngineResult<&RateSchedule> {
        self.config
            .schedules()
            .last()
            .ok_or_else(|| EngineError::ConfigNotFound {
                path: "no rate schedules loaded".to_string(),
            })
    }
}
