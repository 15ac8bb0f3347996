//! Application services

mod booking;
mod charging_spot;
mod spot_locks;
mod spot_status;

use std::sync::Arc;

pub use booking::SessionBookingService;
pub use charging_spot::ChargingSpotService;
pub use spot_locks::{SharedSpotLocks, SpotLocks};
pub use spot_status::SpotStatusService;

use crate::config::BookingConfig;
use crate::domain::RepositoryProvider;
use crate::shared::clock::SharedClock;

/// The services a request handler needs, sharing one set of spot locks.
pub struct Services {
    pub booking: Arc<SessionBookingService>,
    pub spot_status: Arc<SpotStatusService>,
    pub charging_spots: Arc<ChargingSpotService>,
}

impl Services {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        clock: SharedClock,
        config: &BookingConfig,
    ) -> Self {
        let locks = SpotLocks::shared();
        Self {
            booking: Arc::new(
                SessionBookingService::new(repos.clone(), locks.clone())
                    .with_cost_rounding(config.cost_rounding()),
            ),
            spot_status: Arc::new(SpotStatusService::new(repos.clone(), locks.clone(), clock)),
            charging_spots: Arc::new(ChargingSpotService::new(repos, locks)),
        }
    }
}
