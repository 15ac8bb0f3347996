//! # ChargeHub booking core
//!
//! Session booking and charging-spot lifecycle control for a charging-station
//! management backend.
//!
//! ## Architecture
//!
//! - **domain**: entities, the overlap checker, cost calculation, the spot
//!   transition policy and repository traits
//! - **application**: booking, spot status and spot management services
//! - **infrastructure**: in-memory storage adapter
//! - **shared**: errors and the injected clock
//!
//! Persistence, authentication and HTTP live in the host application, which
//! supplies a [`domain::RepositoryProvider`] and calls the services with an
//! already-authenticated user id.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod shared;

pub use application::{ChargingSpotService, Services, SessionBookingService, SpotStatusService};
pub use config::{default_config_path, AppConfig, BookingConfig, LoggingConfig};
pub use domain::{DomainError, DomainResult, RepositoryProvider};
pub use infrastructure::InMemoryStorage;
pub use logging::init_tracing;
pub use shared::{Clock, FixedClock, SharedClock, SystemClock};
