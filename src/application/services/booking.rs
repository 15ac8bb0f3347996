//! Session booking: validation, conflict detection, pricing, persistence

use std::sync::Arc;

use tracing::{debug, info};

use super::spot_locks::SharedSpotLocks;
use crate::domain::schedule::first_conflict;
use crate::domain::{
    session_cost, CostRounding, DomainResult, NewSession, RepositoryProvider, Session,
    SessionRecord,
};
use crate::shared::errors::{DomainError, ScheduleViolation};

/// Books charging sessions on spots and answers session queries.
pub struct SessionBookingService {
    repos: Arc<dyn RepositoryProvider>,
    locks: SharedSpotLocks,
    rounding: CostRounding,
}

impl SessionBookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, locks: SharedSpotLocks) -> Self {
        Self {
            repos,
            locks,
            rounding: CostRounding::default(),
        }
    }

    pub fn with_cost_rounding(mut self, rounding: CostRounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Book `candidate` on behalf of `requester_user_id`.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// vehicle exists, requester owns it, spot exists, no overlap with the
    /// spot's sessions, schedule is well-formed.
    pub async fn create_session(
        &self,
        requester_user_id: i32,
        candidate: NewSession,
    ) -> DomainResult<Session> {
        let result = self.book(requester_user_id, candidate).await;

        match &result {
            Ok(session) => {
                metrics::counter!("bookings_total", "outcome" => "accepted").increment(1);
                info!(
                    session_id = session.id,
                    spot_id = session.charging_spot_id,
                    vehicle_id = session.vehicle_id,
                    start = %session.start_time,
                    duration = session.duration,
                    total_cost = %session.total_cost,
                    "Session booked"
                );
            }
            Err(e) => {
                metrics::counter!("bookings_total", "outcome" => e.kind()).increment(1);
                debug!(user_id = requester_user_id, reason = e.kind(), "Booking rejected: {}", e);
            }
        }

        result
    }

    async fn book(&self, requester_user_id: i32, candidate: NewSession) -> DomainResult<Session> {
        let vehicle_id = candidate
            .vehicle_id
            .ok_or(DomainError::VehicleNotFound(None))?;
        let vehicle = self
            .repos
            .vehicles()
            .find_by_id(vehicle_id)
            .await?
            .ok_or(DomainError::VehicleNotFound(Some(vehicle_id)))?;

        if vehicle.user_id != requester_user_id {
            return Err(DomainError::NotOwner {
                user_id: requester_user_id,
                vehicle_id,
            });
        }

        let spot_id = candidate
            .charging_spot_id
            .ok_or(DomainError::SpotNotFound(None))?;
        self.repos
            .charging_spots()
            .find_by_id(spot_id)
            .await?
            .ok_or(DomainError::SpotNotFound(Some(spot_id)))?;

        // Held until the new session is stored.
        let _guard = self.locks.acquire(spot_id).await;

        // The spot may have been deleted while we waited for the lock.
        let spot = self
            .repos
            .charging_spots()
            .find_by_id(spot_id)
            .await?
            .ok_or(DomainError::SpotNotFound(Some(spot_id)))?;

        // A malformed window cannot overlap anything; it is rejected below.
        let window = candidate.interval();
        if let Some(window) = &window {
            let existing = self.repos.sessions().find_by_spot_id(spot.id).await?;
            if let Some(clash) = first_conflict(&existing, window, Session::interval) {
                return Err(DomainError::SlotConflict {
                    spot_id: spot.id,
                    session_id: clash.id,
                });
            }
        }

        let mut violations = Vec::new();
        if candidate.start_time.is_none() {
            violations.push(ScheduleViolation::MissingStartTime);
        }
        if candidate.duration <= 0 {
            violations.push(ScheduleViolation::NonPositiveDuration);
        }
        let start_time = match window {
            Some(window) => window.start,
            None => {
                if violations.is_empty() {
                    violations.push(ScheduleViolation::DurationOutOfRange);
                }
                return Err(DomainError::InvalidSchedule(violations));
            }
        };

        let total_cost = session_cost(
            spot.price_per_kwh,
            spot.power_kw,
            candidate.duration,
            self.rounding,
        )?;

        self.repos
            .sessions()
            .save(SessionRecord {
                vehicle_id: vehicle.id,
                charging_spot_id: spot.id,
                start_time,
                duration: candidate.duration,
                total_cost,
            })
            .await
    }

    /// Sessions of all vehicles owned by `user_id`.
    pub async fn sessions_for_user(&self, user_id: i32) -> DomainResult<Vec<Session>> {
        let sessions = self.repos.sessions().find_by_user_id(user_id).await?;
        debug!(user_id, count = sessions.len(), "Fetched sessions for user");
        Ok(sessions)
    }

    /// Sessions booked on any spot of `station_id`.
    pub async fn sessions_for_station(&self, station_id: i32) -> DomainResult<Vec<Session>> {
        if self.repos.stations().find_by_id(station_id).await?.is_none() {
            return Err(DomainError::StationNotFound(station_id));
        }
        let sessions = self.repos.sessions().find_by_station_id(station_id).await?;
        debug!(station_id, count = sessions.len(), "Fetched sessions for station");
        Ok(sessions)
    }

    /// Cancel a booking. Only the owner of the booked vehicle may do so.
    pub async fn cancel_session(&self, user_id: i32, session_id: i32) -> DomainResult<()> {
        let session = self
            .repos
            .sessions()
            .find_by_id(session_id)
            .await?
            .ok_or(DomainError::SessionNotFound(session_id))?;

        let owner = self
            .repos
            .vehicles()
            .find_by_id(session.vehicle_id)
            .await?
            .map(|v| v.user_id);
        if owner != Some(user_id) {
            debug!(user_id, session_id, "Cancellation rejected: not the session owner");
            return Err(DomainError::NotOwner {
                user_id,
                vehicle_id: session.vehicle_id,
            });
        }

        let _guard = self.locks.acquire(session.charging_spot_id).await;
        self.repos.sessions().delete(session_id).await?;
        info!(user_id, session_id, "Session cancelled");
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
