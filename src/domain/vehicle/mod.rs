//! Vehicle aggregate (read-only here)

pub mod model;
pub mod repository;

pub use model::Vehicle;
pub use repository::VehicleRepository;
