//! Memoisation of household calculations.

use std::collections::HashMap;

use crate::config::RateSchedule;
use crate::error::EngineResult;
use crate::models::{HouseholdCalculation, HouseholdInput};

use super::household::calculate_household;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    schedule: RateSchedule,
    input: HouseholdInput,
}

/// A caller-owned store of calculation results keyed by rate schedule and input.
///
/// The key holds the whole schedule, not just its period id, so an edited or
/// replaced schedule never returns a result computed under the old one.
/// Errors are not cached.
///
/// Entries are never evicted. An unbounded cache grows until the caller calls
/// [`CalculationCache::clear`]; one built with
/// [`CalculationCache::with_max_entries`] stops storing new results once full
/// and keeps serving the ones it has.
#[derive(Debug, Clone, Default)]
pub struct CalculationCache {
    entries: HashMap<CacheKey, HouseholdCalculation>,
    max_entries: Option<usize>,
}

impl CalculationCache {
    /// Creates an empty, unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache that stores at most `max_entries` results.
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: Some(max_entries),
        }
    }

    /// Returns the cached result for `input` under `schedule`, if any.
    pub fn get(&self, schedule: &RateSchedule, input: &HouseholdInput) -> Option<&HouseholdCalculation> {
        let key = CacheKey {
            schedule: schedule.clone(),
            input: input.clone(),
        };
        self.entries.get(&key)
    }

    /// Returns the number of cached results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every cached result.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn is_full(&self) -> bool {
        self.max_entries.is_some_and(|max| self.entries.len() >= max)
    }
}

/// Calculates a household, reusing a cached result when one exists.
pub fn calculate_household_cached(
    cache: &mut CalculationCache,
    input: &HouseholdInput,
    schedule: &RateSchedule,
) -> EngineResult<HouseholdCalculation> {
    let key = CacheKey {
        schedule: schedule.clone(),
        input: input.clone(),
    };
    if let Some(hit) = cache.entries.get(&key) {
        return Ok(hit.clone());
    }

    let result = calculate_household(input, schedule)?;
    if !cache.is_full() {
        cache.entries.insert(key, result.clone());
    }
    Ok(result)
}
