//! Per-child cost calculation functionality.
//!
//! This module applies a child's subsidy percentage to the lesser of the
//! provider's fee and the schedule's rate cap, limits the subsidised quantity
//! to the activity test allowance, splits the subsidy into withheld and paid
//! portions, and derives the out-of-pocket cost per week and per year.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::RateSchedule;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ActivityTestResult, AuditStep, AuditWarning, CareUnit, ChildProfile, CostAmounts,
    CostBreakdown, FeeMode, HouseholdTotals, MAX_WORK_DAYS,
};

/// Rounds a monetary amount to cents, half away from zero, with a fixed scale of 2.
///
/// # Examples
///
/// ```
/// use subsidy_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_currency(Decimal::new(474_012, 3)).to_string(), "474.01");
/// assert_eq!(round_currency(Decimal::new(23_705, 3)).to_string(), "23.71");
/// assert_eq!(round_currency(Decimal::new(132_000, 0)).to_string(), "132000.00");
/// ```
pub fn round_currency(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Multiplies two amounts, reporting overflow as a calculation error naming `quantity`.
pub(crate) fn checked_product(a: Decimal, b: Decimal, quantity: &str) -> EngineResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| EngineError::overflow(quantity))
}

/// The cost calculation for one child, including the audit step and warnings.
#[derive(Debug, Clone)]
pub struct ChildCostResult {
    /// The cost breakdown.
    pub breakdown: CostBreakdown,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Warnings raised for this child.
    pub warnings: Vec<AuditWarning>,
}

/// Per-unit quantities for one child, resolved from the fee mode.
struct UnitTerms {
    unit: CareUnit,
    provider_fee: Decimal,
    rate_cap: Decimal,
    units_needed: Decimal,
    allowance: Decimal,
}

fn unit_terms(fee: &FeeMode, hourly_cap: Decimal, activity: &ActivityTestResult) -> EngineResult<UnitTerms> {
    let provider_fee = fee.fee_amount();
    let terms = match fee {
        FeeMode::Hourly { hours_per_week, .. } => UnitTerms {
            unit: CareUnit::Hour,
            provider_fee,
            rate_cap: hourly_cap,
            units_needed: *hours_per_week,
            allowance: activity.subsidised_hours_per_week,
        },
        FeeMode::Daily {
            hours_per_day,
            days_of_care,
            ..
        } => {
            let max_days = Decimal::from(MAX_WORK_DAYS);
            // A quotient too large to represent is above five days anyway.
            let allowance = if *hours_per_day > Decimal::ZERO {
                activity
                    .subsidised_hours_per_week
                    .checked_div(*hours_per_day)
                    .map_or(max_days, |days| days.min(max_days))
            } else {
                Decimal::ZERO
            };
            UnitTerms {
                unit: CareUnit::Day,
                provider_fee,
                rate_cap: checked_product(hourly_cap, *hours_per_day, "daily rate cap")?,
                units_needed: Decimal::from(*days_of_care),
                allowance,
            }
        }
    };
    Ok(terms)
}

/// Calculates the weekly and annual cost of care for one child.
///
/// # Arguments
///
/// * `child` - The child and their booking
/// * `child_index` - Index of the child in the household input
/// * `position` - The child's sibling position
/// * `subsidy_percentage` - The resolved subsidy percentage (0-100)
/// * `activity` - The household's activity test allowance
/// * `schedule` - The rate schedule supplying caps and weeks per year
/// * `withholding_percentage` - The share of the subsidy held back (0-100)
/// * `step_number` - The step number for audit trail sequencing
///
/// # Formula
///
/// ```text
/// effective_rate = min(provider_fee, rate_cap)
/// subsidised     = min(units_needed, allowance)
/// gross          = round(percentage / 100 × effective_rate × subsidised)
/// withheld       = round(gross × withholding / 100)
/// paid           = gross - withheld
/// full_cost      = round(provider_fee × units_needed)
/// out_of_pocket  = full_cost - paid
/// ```
///
/// For daily fees the cap is the hourly cap times the session length and the
/// allowance is the weekly subsidised hours divided by the session length,
/// at most five days. Annual amounts are the weekly amounts times the
/// schedule's weeks per year. Out-of-pocket may be negative; a warning is
/// raised rather than clamping.
///
/// # Errors
///
/// - [`EngineError::RateCapNotFound`] if the schedule has no cap for the
///   child's care type and age category
/// - [`EngineError::CalculationError`] if an amount overflows
#[allow(clippy::too_many_arguments)]
pub fn calculate_child_cost(
    child: &ChildProfile,
    child_index: usize,
    position: usize,
    subsidy_percentage: Decimal,
    activity: &ActivityTestResult,
    schedule: &RateSchedule,
    withholding_percentage: Decimal,
    step_number: u32,
) -> EngineResult<ChildCostResult> {
    let age_category = schedule.age_category(child.age);
    let hourly_cap = schedule.hourly_cap(child.care_type, age_category)?;
    let terms = unit_terms(&child.fee, hourly_cap, activity)?;

    let effective_rate = terms.provider_fee.min(terms.rate_cap);
    let subsidised_units = terms.units_needed.min(terms.allowance);
    let subsidy_per_unit = checked_product(
        subsidy_percentage / Decimal::ONE_HUNDRED,
        effective_rate,
        "subsidy per unit",
    )?;

    let gross_subsidy = round_currency(checked_product(subsidy_per_unit, subsidised_units, "weekly gross subsidy")?);
    let withheld_amount = round_currency(checked_product(
        gross_subsidy,
        withholding_percentage / Decimal::ONE_HUNDRED,
        "weekly withheld amount",
    )?);
    let paid_subsidy = gross_subsidy - withheld_amount;
    let full_cost = round_currency(checked_product(terms.provider_fee, terms.units_needed, "weekly full cost")?);
    let out_of_pocket = full_cost - paid_subsidy;

    let weekly = CostAmounts {
        gross_subsidy,
        withheld_amount,
        paid_subsidy,
        full_cost,
        out_of_pocket,
    };
    let annual = weekly
        .checked_scaled(Decimal::from(schedule.weeks_per_year))
        .ok_or_else(|| EngineError::overflow("annual cost"))?;

    let unit_name = match terms.unit {
        CareUnit::Hour => "hour",
        CareUnit::Day => "day",
    };

    let mut warnings = Vec::new();
    if terms.provider_fee > terms.rate_cap {
        warnings.push(AuditWarning {
            code: "FEE_ABOVE_CAP".to_string(),
            message: format!(
                "Child {} fee ${}/{} exceeds the ${}/{} cap; subsidy is calculated on the cap",
                child_index + 1,
                terms.provider_fee.normalize(),
                unit_name,
                terms.rate_cap.normalize(),
                unit_name
            ),
            severity: "low".to_string(),
        });
    }
    if terms.units_needed > terms.allowance {
        warnings.push(AuditWarning {
            code: "BOOKING_EXCEEDS_ALLOWANCE".to_string(),
            message: format!(
                "Child {} is booked for {} {}(s) a week but only {} attract subsidy",
                child_index + 1,
                terms.units_needed.normalize(),
                unit_name,
                subsidised_units.normalize()
            ),
            severity: "low".to_string(),
        });
    }
    if out_of_pocket < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: "NEGATIVE_OUT_OF_POCKET".to_string(),
            message: format!(
                "Child {} paid subsidy ${} exceeds the full cost ${}",
                child_index + 1,
                paid_subsidy,
                full_cost
            ),
            severity: "medium".to_string(),
        });
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "child_cost".to_string(),
        rule_name: "Child Cost".to_string(),
        policy_ref: "rate_caps".to_string(),
        input: serde_json::json!({
            "child_index": child_index,
            "care_type": child.care_type,
            "age_category": age_category,
            "unit": terms.unit,
            "provider_fee": terms.provider_fee.to_string(),
            "rate_cap": terms.rate_cap.normalize().to_string(),
            "subsidy_percentage": subsidy_percentage.to_string(),
            "units_needed": terms.units_needed.normalize().to_string(),
            "allowance": terms.allowance.normalize().to_string(),
            "withholding_percentage": withholding_percentage.to_string()
        }),
        output: serde_json::json!({
            "effective_rate": effective_rate.normalize().to_string(),
            "subsidised_units": subsidised_units.normalize().to_string(),
            "weekly_gross_subsidy": gross_subsidy.to_string(),
            "weekly_withheld_amount": withheld_amount.to_string(),
            "weekly_paid_subsidy": paid_subsidy.to_string(),
            "weekly_full_cost": full_cost.to_string(),
            "weekly_out_of_pocket": out_of_pocket.to_string()
        }),
        reasoning: format!(
            "{}% x ${} x {} {}(s) = ${} gross; {}% withheld = ${}; paid ${}; out of pocket ${} - ${} = ${}",
            subsidy_percentage.normalize(),
            effective_rate.normalize(),
            subsidised_units.normalize(),
            unit_name,
            gross_subsidy,
            withholding_percentage.normalize(),
            withheld_amount,
            paid_subsidy,
            full_cost,
            paid_subsidy,
            out_of_pocket
        ),
    };

    Ok(ChildCostResult {
        breakdown: CostBreakdown {
            child_index,
            position,
            care_type: child.care_type,
            age_category,
            unit: terms.unit,
            provider_fee: terms.provider_fee,
            rate_cap: terms.rate_cap,
            effective_rate,
            subsidy_percentage,
            units_needed: terms.units_needed,
            subsidised_units,
            subsidy_per_unit,
            withholding_percentage,
            weekly,
            annual,
        },
        audit_step,
        warnings,
    })
}

/// Sums the weekly and annual amounts of every child.
///
/// # Errors
///
/// Returns [`EngineError::CalculationError`] if a total overflows.
pub fn aggregate_totals(costs: &[CostBreakdown]) -> EngineResult<HouseholdTotals> {
    costs.iter().try_fold(HouseholdTotals::default(), |totals, cost| {
        Ok(HouseholdTotals {
            weekly: totals
                .weekly
                .checked_add(&cost.weekly)
                .ok_or_else(|| EngineError::overflow("household weekly total"))?,
            annual: totals
                .annual
                .checked_add(&cost.annual)
                .ok_or_else(|| EngineError::overflow("household annual total"))?,
        })
    })
}
