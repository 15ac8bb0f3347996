//! Charging session domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::schedule::Interval;

/// One booked occupancy interval of a spot by a vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: i32,
    pub uuid: String,
    pub vehicle_id: i32,
    pub charging_spot_id: i32,
    pub start_time: DateTime<Utc>,
    /// Booked length in seconds
    pub duration: i64,
    /// Billed amount, fixed at booking time
    pub total_cost: Decimal,
}

impl Session {
    /// Occupied window. An end beyond the representable range is clamped.
    pub fn interval(&self) -> Interval {
        Interval::saturating(self.start_time, self.duration)
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.interval().end
    }

    pub fn is_active_at(&self, instant: DateTime<Utc>) -> bool {
        self.interval().contains(instant)
    }
}

/// Booking request as submitted by a driver.
///
/// Every field may be missing or malformed; the booking service validates
/// them before anything is persisted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSession {
    pub vehicle_id: Option<i32>,
    pub charging_spot_id: Option<i32>,
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: i64,
}

impl NewSession {
    pub fn new(vehicle_id: i32, charging_spot_id: i32, start_time: DateTime<Utc>, duration: i64) -> Self {
        Self {
            vehicle_id: Some(vehicle_id),
            charging_spot_id: Some(charging_spot_id),
            start_time: Some(start_time),
            duration,
        }
    }

    /// The requested window, if it forms a valid, representable interval.
    pub fn interval(&self) -> Option<Interval> {
        match self.start_time {
            Some(start) if self.duration > 0 => Interval::new(start, self.duration),
            _ => None,
        }
    }
}

/// Validated session fields handed to storage. Storage assigns id and uuid.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub vehicle_id: i32,
    pub charging_spot_id: i32,
    pub start_time: DateTime<Utc>,
    pub duration: i64,
    pub total_cost: Decimal,
}
