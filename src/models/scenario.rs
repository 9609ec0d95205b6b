//! Scenario models.
//!
//! A [`Scenario`] is one fully computed outcome for a specific combination of
//! both parents' weekly work-day counts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CostBreakdown, HouseholdSnapshot, HouseholdTotals};

/// Summary figures used to compare scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    /// Annual subsidy paid after withholding.
    pub annual_subsidy: Decimal,
    /// Annual out-of-pocket childcare cost.
    pub annual_out_of_pocket: Decimal,
    /// Household income less the annual out-of-pocket cost.
    pub net_income: Decimal,
    /// Annual out-of-pocket cost as a percentage of household income.
    pub cost_percentage_of_income: Decimal,
}

/// One candidate work arrangement and its computed outcome.
///
/// The computed fields never change after generation. `favorited` and
/// `removed` are presentation tags a host may set on a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Stable identifier, unique within a generated batch.
    pub id: Uuid,
    /// Display name of the arrangement.
    pub name: String,
    /// Days per week parent 1 works.
    pub parent1_days: u8,
    /// Days per week parent 2 works (0 for single-parent households).
    pub parent2_days: u8,
    /// Combined work days of both parents.
    pub total_work_days: u8,
    /// Days per week on which paid care is required.
    pub care_days: u8,
    /// Adjusted incomes for this arrangement.
    pub snapshot: HouseholdSnapshot,
    /// Per-child cost breakdowns, in input order.
    pub costs: Vec<CostBreakdown>,
    /// Totals across children.
    pub totals: HouseholdTotals,
    /// Summary figures.
    pub metrics: ScenarioMetrics,
    /// Tagged as a favourite by the host.
    #[serde(default)]
    pub favorited: bool,
    /// Hidden from views by the host.
    #[serde(default)]
    pub removed: bool,
}

impl Scenario {
    /// Returns a copy tagged (or untagged) as a favourite.
    pub fn with_favorited(&self, favorited: bool) -> Scenario {
        Scenario {
            favorited,
            ..self.clone()
        }
    }

    /// Returns a copy tagged (or untagged) as removed.
    pub fn with_removed(&self, removed: bool) -> Scenario {
        Scenario {
            removed,
            ..self.clone()
        }
    }
}
