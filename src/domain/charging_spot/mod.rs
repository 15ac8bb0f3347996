//! Charging spot aggregate
//!
//! Contains the ChargingSpot entity, the state transition policy, and the
//! repository interface.

pub mod model;
pub mod policy;
pub mod repository;

pub use model::{
    ChargingSpot, ChargingSpotUpdate, ChargingVelocity, ConnectorType, NewChargingSpot, SpotState,
};
pub use policy::{authorize_transition, SessionOccupancy, TransitionContext};
pub use repository::ChargingSpotRepository;
