//! Session cost calculation
//!
//! `total = price_per_kwh * power_kw * hours`, where `hours` is the booked
//! duration divided by 3600 and rounded half-up to `hours_scale` digits. The
//! product is then rounded half-up to the currency's minor-unit scale so that
//! recomputing from the same stored inputs always yields the same value.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

const SECONDS_PER_HOUR: i64 = 3600;

/// Rounding applied by [`session_cost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostRounding {
    /// Fractional digits kept for the duration in hours
    pub hours_scale: u32,
    /// Fractional digits of the billed amount (2 for cents)
    pub cost_scale: u32,
}

impl Default for CostRounding {
    fn default() -> Self {
        Self {
            hours_scale: 10,
            cost_scale: 2,
        }
    }
}

pub fn duration_in_hours(duration_secs: i64, rounding: CostRounding) -> Decimal {
    (Decimal::from(duration_secs) / Decimal::from(SECONDS_PER_HOUR))
        .round_dp_with_strategy(rounding.hours_scale, RoundingStrategy::MidpointAwayFromZero)
}

pub fn session_cost(
    price_per_kwh: Decimal,
    power_kw: Decimal,
    duration_secs: i64,
    rounding: CostRounding,
) -> DomainResult<Decimal> {
    let hours = duration_in_hours(duration_secs, rounding);

    let total = price_per_kwh
        .checked_mul(power_kw)
        .and_then(|rate| rate.checked_mul(hours))
        .ok_or_else(|| {
            DomainError::Validation(format!(
                "cost overflow for price={} power={} duration={}s",
                price_per_kwh, power_kw, duration_secs
            ))
        })?;

    Ok(total.round_dp_with_strategy(rounding.cost_scale, RoundingStrategy::MidpointAwayFromZero))
}
