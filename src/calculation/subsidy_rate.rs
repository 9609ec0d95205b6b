//! Subsidy rate resolution functionality.
//!
//! This module maps household income to a subsidy percentage. The standard
//! schedule applies to the eldest child and to any child above the higher
//! schedule's age ceiling; younger siblings at or below the ceiling use the
//! higher schedule, which falls back to the standard schedule above its
//! revert threshold.

use rust_decimal::Decimal;

use crate::config::{HigherTier, RateSchedule, StandardTier};
use crate::models::{AuditStep, ChildProfile, RateTier, SubsidyDetermination};

/// The outcome of evaluating the higher schedule for an income.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HigherRateOutcome {
    /// The resolved percentage.
    pub percentage: Decimal,
    /// True when the income exceeded the revert threshold.
    pub reverted_to_standard: bool,
}

/// The result of resolving subsidy rates for every child.
#[derive(Debug, Clone)]
pub struct SubsidyRateResult {
    /// One determination per child, in input order.
    pub determinations: Vec<SubsidyDetermination>,
    /// One audit step per child, in input order.
    pub audit_steps: Vec<AuditStep>,
}

/// Counts the taper steps for `income` above `start`, counting `start` itself as one step.
fn taper_steps(income: Decimal, start: Decimal, increment: Decimal) -> Decimal {
    ((income - start) / increment).floor() + Decimal::ONE
}

/// Calculates the standard subsidy percentage for a household income.
///
/// Income below the taper start receives the maximum rate; from the taper
/// start the rate falls by one step for every increment (the taper start
/// itself is the first step); income at or above the cutoff receives the
/// floor rate.
///
/// # Examples
///
/// ```
/// use subsidy_engine::calculation::standard_rate;
/// use subsidy_engine::config::StandardTier;
/// use rust_decimal::Decimal;
///
/// let tier = StandardTier {
///     max_rate: Decimal::new(90, 0),
///     floor_rate: Decimal::ZERO,
///     taper_start: Decimal::new(85_280, 0),
///     step: Decimal::ONE,
///     increment: Decimal::new(5_000, 0),
///     cutoff: Decimal::new(535_280, 0),
/// };
///
/// assert_eq!(standard_rate(Decimal::new(85_279, 0), &tier), Decimal::new(90, 0));
/// assert_eq!(standard_rate(Decimal::new(85_280, 0), &tier), Decimal::new(89, 0));
/// assert_eq!(standard_rate(Decimal::new(100_000, 0), &tier), Decimal::new(87, 0));
/// ```
pub fn standard_rate(income: Decimal, tier: &StandardTier) -> Decimal {
    if income < tier.taper_start {
        return tier.max_rate;
    }
    if income >= tier.cutoff {
        return tier.floor_rate;
    }

    let steps = taper_steps(income, tier.taper_start, tier.increment);
    (tier.max_rate - steps * tier.step).max(tier.floor_rate)
}

/// Calculates the higher subsidy percentage for a household income.
///
/// Each band tapers from the previous band's floor (the maximum rate for the
/// first band) down to its own floor, producing a stair of flat and tapering
/// segments. Above the revert threshold the standard schedule is used for the
/// same income; the standard schedule never consults the higher one.
pub fn higher_rate(income: Decimal, higher: &HigherTier, standard: &StandardTier) -> HigherRateOutcome {
    if income > higher.revert_threshold {
        return HigherRateOutcome {
            percentage: standard_rate(income, standard),
            reverted_to_standard: true,
        };
    }

    let mut rate = higher.max_rate;
    let mut band_start_rate = higher.max_rate;
    for band in &higher.bands {
        if income < band.start {
            break;
        }
        let steps = taper_steps(income, band.start, band.increment);
        rate = (band_start_rate - steps * band.step).max(band.floor_rate);
        band_start_rate = band.floor_rate;
    }

    HigherRateOutcome {
        percentage: rate,
        reverted_to_standard: false,
    }
}

/// Returns each child's 1-based sibling position, indexed by input order.
///
/// Children are ranked oldest first; children of equal age keep their input
/// order.
///
/// # Examples
///
/// ```
/// use subsidy_engine::calculation::sibling_positions;
/// use subsidy_engine::models::{CareType, ChildProfile, FeeMode};
/// use rust_decimal::Decimal;
///
/// let child = |age| ChildProfile {
///     age,
///     care_type: CareType::CentreBasedDayCare,
///     fee: FeeMode::Hourly { hourly_fee: Decimal::new(15, 0), hours_per_week: Decimal::new(30, 0) },
/// };
///
/// assert_eq!(sibling_positions(&[child(2), child(7), child(4)]), vec![3, 1, 2]);
/// ```
pub fn sibling_positions(children: &[ChildProfile]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..children.len()).collect();
    order.sort_by(|&a, &b| children[b].age.cmp(&children[a].age));

    let mut positions = vec![0; children.len()];
    for (rank, &index) in order.iter().enumerate() {
        positions[index] = rank + 1;
    }
    positions
}

/// Resolves the subsidy percentage for every child in a household.
///
/// # Arguments
///
/// * `children` - The household's children, in input order
/// * `household_income` - The summed adjusted income
/// * `schedule` - The rate schedule for the policy period
/// * `step_number` - The step number of the first audit step
///
/// # Tier Assignment
///
/// - Position 1 always uses the standard tier
/// - Position 2 or later, aged at or below the age ceiling, uses the higher tier
/// - Any child above the age ceiling uses the standard tier
pub fn resolve_subsidy_rates(
    children: &[ChildProfile],
    household_income: Decimal,
    schedule: &RateSchedule,
    step_number: u32,
) -> SubsidyRateResult {
    let positions = sibling_positions(children);
    let age_ceiling = schedule.higher_tier.age_ceiling;

    let mut determinations = Vec::with_capacity(children.len());
    let mut audit_steps = Vec::with_capacity(children.len());

    for (index, child) in children.iter().enumerate() {
        let position = positions[index];
        let eligible_for_higher = position > 1 && child.age <= age_ceiling;

        let (percentage, tier, reverted_to_standard) = if eligible_for_higher {
            let outcome = higher_rate(household_income, &schedule.higher_tier, &schedule.standard_tier);
            (outcome.percentage, RateTier::Higher, outcome.reverted_to_standard)
        } else {
            (
                standard_rate(household_income, &schedule.standard_tier),
                RateTier::Standard,
                false,
            )
        };

        let reasoning = match (tier, reverted_to_standard) {
            (RateTier::Standard, _) if position == 1 => format!(
                "Child {} is the eldest (position 1): standard rate {}% at income ${}",
                index + 1,
                percentage.normalize(),
                household_income.normalize()
            ),
            (RateTier::Standard, _) => format!(
                "Child {} (position {}) is aged {}, above the higher-rate ceiling of {}: standard rate {}%",
                index + 1,
                position,
                child.age,
                age_ceiling,
                percentage.normalize()
            ),
            (RateTier::Higher, true) => format!(
                "Child {} (position {}) qualifies for the higher rate, but income ${} exceeds ${}: reverted to standard rate {}%",
                index + 1,
                position,
                household_income.normalize(),
                schedule.higher_tier.revert_threshold.normalize(),
                percentage.normalize()
            ),
            (RateTier::Higher, false) => format!(
                "Child {} (position {}) aged {} is a younger sibling at or below {}: higher rate {}%",
                index + 1,
                position,
                child.age,
                age_ceiling,
                percentage.normalize()
            ),
        };

        audit_steps.push(AuditStep {
            step_number: step_number + index as u32,
            rule_id: "subsidy_rate".to_string(),
            rule_name: "Subsidy Rate Resolution".to_string(),
            policy_ref: match tier {
                RateTier::Standard => "standard_tier".to_string(),
                RateTier::Higher => "higher_tier".to_string(),
            },
            input: serde_json::json!({
                "child_index": index,
                "age": child.age,
                "position": position,
                "household_income": household_income.to_string()
            }),
            output: serde_json::json!({
                "percentage": percentage.to_string(),
                "tier": tier,
                "reverted_to_standard": reverted_to_standard
            }),
            reasoning,
        });

        determinations.push(SubsidyDetermination {
            child_index: index,
            position,
            percentage,
            tier,
            reverted_to_standard,
        });
    }

    SubsidyRateResult {
        determinations,
        audit_steps,
    }
}
