//! Household input and snapshot models.
//!
//! This module contains the [`HouseholdInput`] consumed by the calculation
//! pipeline and the derived [`HouseholdSnapshot`] of adjusted incomes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{ChildProfile, ParentProfile};

/// Everything the engine needs to know about a household for one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HouseholdInput {
    /// The first (required) parent.
    pub parent1: ParentProfile,
    /// The second parent, absent for single-parent households.
    #[serde(default)]
    pub parent2: Option<ParentProfile>,
    /// Children in care, in any order.
    pub children: Vec<ChildProfile>,
    /// Overrides the schedule's default withholding percentage.
    #[serde(default)]
    pub withholding_percentage: Option<Decimal>,
}

impl HouseholdInput {
    /// Validates both parents and every child.
    ///
    /// Returns [`EngineError::NoChildren`] when the children list is empty.
    pub fn validate(&self) -> EngineResult<()> {
        self.parent1.validate("parent1")?;
        if let Some(parent2) = &self.parent2 {
            parent2.validate("parent2")?;
        }
        if self.children.is_empty() {
            return Err(EngineError::NoChildren);
        }
        for (index, child) in self.children.iter().enumerate() {
            child.validate(index)?;
        }
        Ok(())
    }

    /// Returns true if the household has only one parent.
    pub fn is_single_parent(&self) -> bool {
        self.parent2.is_none()
    }
}

/// Adjusted incomes for a household.
///
/// Derived from the parents' profiles; recomputed whenever a profile changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdSnapshot {
    /// Parent 1's income adjusted for days worked.
    pub parent1_adjusted_income: Decimal,
    /// Parent 2's adjusted income, if there is a second parent.
    pub parent2_adjusted_income: Option<Decimal>,
    /// The sum of all adjusted incomes.
    pub household_income: Decimal,
}
