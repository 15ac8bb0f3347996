pub mod services;

// Re-export key types for convenience
pub use services::{
    ChargingSpotService, Services, SessionBookingService, SharedSpotLocks, SpotLocks,
    SpotStatusService,
};
