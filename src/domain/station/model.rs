//! Charging station domain entity

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingStation {
    pub id: i32,
    pub name: String,
    pub lat: Decimal,
    pub lon: Decimal,
    /// User (role Operator) managing the station and its spots
    pub operator_id: i32,
    pub photo_url: Option<String>,
}
