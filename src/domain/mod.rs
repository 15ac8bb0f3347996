pub mod charging_spot;
pub mod pricing;
pub mod repositories;
pub mod schedule;
pub mod session;
pub mod station;
pub mod user;
pub mod vehicle;

// Re-export commonly used types
pub use charging_spot::{
    ChargingSpot, ChargingSpotRepository, ChargingSpotUpdate, ChargingVelocity, ConnectorType,
    NewChargingSpot, SpotState,
};
pub use pricing::{session_cost, CostRounding};
pub use repositories::{DomainResult, RepositoryProvider};
pub use schedule::{first_conflict, has_conflict, overlaps, Interval};
pub use session::{NewSession, Session, SessionRecord, SessionRepository};
pub use station::{ChargingStation, StationRepository};
pub use user::{User, UserRepository, UserRole};
pub use vehicle::{Vehicle, VehicleRepository};

pub use crate::shared::errors::DomainError;
