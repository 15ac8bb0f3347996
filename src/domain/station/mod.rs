//! Charging station aggregate (read-only here)

pub mod model;
pub mod repository;

pub use model::ChargingStation;
pub use repository::StationRepository;
