//! Charging spot domain entity

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Operational state of a charging spot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpotState {
    /// Available for charging
    #[default]
    Free,
    /// A vehicle is plugged in
    Occupied,
    /// Flagged unsafe or under maintenance
    OutOfService,
}

impl SpotState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "FREE",
            Self::Occupied => "OCCUPIED",
            Self::OutOfService => "OUT_OF_SERVICE",
        }
    }
}

impl std::fmt::Display for SpotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Plug standard of a spot (or of a vehicle inlet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectorType {
    #[default]
    #[serde(rename = "SAEJ1772")]
    SaeJ1772,
    Mennekes,
    Ccs,
    Chademo,
}

/// Charging speed class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargingVelocity {
    #[default]
    Normal,
    Fast,
    #[serde(rename = "FASTPP")]
    FastPlus,
}

/// A single physical charging bay at a station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingSpot {
    /// Storage-assigned identifier (0 until persisted)
    pub id: i32,
    pub station_id: i32,
    pub power_kw: Decimal,
    pub price_per_kwh: Decimal,
    pub connector_type: ConnectorType,
    pub charging_velocity: ChargingVelocity,
    pub state: SpotState,
}

impl ChargingSpot {
    pub fn new(station_id: i32, power_kw: Decimal, price_per_kwh: Decimal) -> Self {
        Self {
            id: 0,
            station_id,
            power_kw,
            price_per_kwh,
            connector_type: ConnectorType::default(),
            charging_velocity: ChargingVelocity::default(),
            state: SpotState::default(),
        }
    }
}

/// Operator input for a new spot. Power and price are mandatory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewChargingSpot {
    pub station_id: i32,
    pub power_kw: Option<Decimal>,
    pub price_per_kwh: Option<Decimal>,
    pub connector_type: Option<ConnectorType>,
    pub charging_velocity: Option<ChargingVelocity>,
    pub state: Option<SpotState>,
}

/// Partial update of a spot's commercial fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChargingSpotUpdate {
    pub power_kw: Option<Decimal>,
    pub price_per_kwh: Option<Decimal>,
    pub connector_type: Option<ConnectorType>,
}

// ── Tests ──────────────────────────────────────────────────────
