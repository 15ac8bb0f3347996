//! Charging spot state control
//!
//! Resolves who is using the spot right now and hands the decision to
//! [`authorize_transition`]; persists the new state when it is allowed.

use std::sync::Arc;

use tracing::{debug, error, info};

use super::spot_locks::SharedSpotLocks;
use crate::domain::charging_spot::{authorize_transition, SessionOccupancy, TransitionContext};
use crate::domain::{ChargingSpot, DomainResult, RepositoryProvider, Session, SpotState};
use crate::shared::clock::SharedClock;
use crate::shared::errors::DomainError;

pub struct SpotStatusService {
    repos: Arc<dyn RepositoryProvider>,
    locks: SharedSpotLocks,
    clock: SharedClock,
}

impl SpotStatusService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, locks: SharedSpotLocks, clock: SharedClock) -> Self {
        Self { repos, locks, clock }
    }

    /// Move spot `spot_id` to `requested` on behalf of `requester_user_id`.
    pub async fn update_spot_status(
        &self,
        spot_id: i32,
        requested: Option<SpotState>,
        requester_user_id: i32,
    ) -> DomainResult<bool> {
        let result = self.transition(spot_id, requested, requester_user_id).await;

        match &result {
            Ok(_) => {
                metrics::counter!("spot_status_changes_total", "outcome" => "accepted").increment(1);
            }
            Err(e) => {
                metrics::counter!("spot_status_changes_total", "outcome" => e.kind()).increment(1);
                debug!(
                    spot_id,
                    user_id = requester_user_id,
                    reason = e.kind(),
                    "Spot status change rejected: {}",
                    e
                );
            }
        }

        result
    }

    async fn transition(
        &self,
        spot_id: i32,
        requested: Option<SpotState>,
        requester_user_id: i32,
    ) -> DomainResult<bool> {
        self.find_spot(spot_id).await?;
        let user = self
            .repos
            .users()
            .find_by_id(requester_user_id)
            .await?
            .ok_or(DomainError::UserNotFound(requester_user_id))?;
        let requested = requested.ok_or(DomainError::InvalidState)?;

        let _guard = self.locks.acquire(spot_id).await;

        // Re-read under the lock so the decision sees the latest state.
        let mut spot = self.find_spot(spot_id).await?;

        let now = self.clock.now();
        let sessions = self.repos.sessions().find_by_spot_id(spot_id).await?;
        let active: Vec<&Session> = sessions.iter().filter(|s| s.is_active_at(now)).collect();

        let occupancy = match active.as_slice() {
            [] => SessionOccupancy::Idle,
            [session] => {
                let owner = self
                    .repos
                    .vehicles()
                    .find_by_id(session.vehicle_id)
                    .await?
                    .map(|v| v.user_id);
                if owner == Some(requester_user_id) {
                    SessionOccupancy::HeldByRequester {
                        session_id: session.id,
                    }
                } else {
                    SessionOccupancy::HeldByOther {
                        session_id: session.id,
                    }
                }
            }
            many => {
                error!(
                    spot_id,
                    count = many.len(),
                    %now,
                    "Overlapping active sessions on one spot"
                );
                return Err(DomainError::MultipleActiveSessions {
                    spot_id,
                    count: many.len(),
                });
            }
        };

        authorize_transition(&TransitionContext {
            spot_id,
            requester_id: user.id,
            requester_role: user.role,
            current: spot.state,
            requested,
            occupancy,
        })?;

        let previous = spot.state;
        spot.state = requested;
        self.repos.charging_spots().save(spot).await?;

        info!(
            spot_id,
            user_id = user.id,
            role = %user.role,
            from = %previous,
            to = %requested,
            "Charging spot state updated"
        );

        Ok(true)
    }

    async fn find_spot(&self, spot_id: i32) -> DomainResult<ChargingSpot> {
        self.repos
            .charging_spots()
            .find_by_id(spot_id)
            .await?
            .ok_or(DomainError::SpotNotFound(Some(spot_id)))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::spot_locks::SpotLocks;
    use crate::domain::{ConnectorType, SessionRecord, User, UserRole, Vehicle};
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::shared::clock::FixedClock;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    const DRIVER: i32 = 1;
    const OTHER_DRIVER: i32 = 2;
    const OPERATOR: i32 = 3;
    const DRIVER_VEHICLE: i32 = 10;
    const OPERATOR_VEHICLE: i32 = 30;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, h, m, 0).unwrap()
    }

    struct Fixture {
        storage: Arc<InMemoryStorage>,
        clock: Arc<FixedClock>,
        service: SpotStatusService,
        spot: i32,
    }

    impl Fixture {
        async fn new(initial: SpotState) -> Self {
            let storage = Arc::new(InMemoryStorage::new());
            for (id, role) in [
                (DRIVER, UserRole::User),
                (OTHER_DRIVER, UserRole::User),
                (OPERATOR, UserRole::Operator),
            ] {
                storage.insert_user(User {
                    id,
                    name: format!("user-{id}"),
                    email: format!("user{id}@example.com"),
                    role,
                });
            }
            for (id, owner) in [(DRIVER_VEHICLE, DRIVER), (OPERATOR_VEHICLE, OPERATOR)] {
                storage.insert_vehicle(Vehicle {
                    id,
                    user_id: owner,
                    brand: "Nissan".into(),
                    model: "Leaf".into(),
                    license_plate: format!("EV-{id}"),
                    connector_type: ConnectorType::Chademo,
                });
            }

            let mut spot = ChargingSpot::new(1, Decimal::from(50), Decimal::new(30, 2));
            spot.state = initial;
            let spot = storage.charging_spots().save(spot).await.unwrap();

            let clock = Arc::new(FixedClock::new(at(12, 0)));
            let service = SpotStatusService::new(storage.clone(), SpotLocks::shared(), clock.clone());

            Self {
                storage,
                clock,
                service,
                spot: spot.id,
            }
        }

        async fn book(&self, vehicle_id: i32, start: DateTime<Utc>, duration: i64) -> Session {
            self.storage
                .sessions()
                .save(SessionRecord {
                    vehicle_id,
                    charging_spot_id: self.spot,
                    start_time: start,
                    duration,
                    total_cost: Decimal::ZERO,
                })
                .await
                .unwrap()
        }

        async fn state(&self) -> SpotState {
            self.storage
                .charging_spots()
                .find_by_id(self.spot)
                .await
                .unwrap()
                .unwrap()
                .state
        }
    }

    #[tokio::test]
    async fn idle_spot_can_be_changed_by_anyone() {
        let f = Fixture::new(SpotState::Free).await;
        assert!(f
            .service
            .update_spot_status(f.spot, Some(SpotState::Occupied), DRIVER)
            .await
            .unwrap());
        assert_eq!(f.state().await, SpotState::Occupied);

        f.service
            .update_spot_status(f.spot, Some(SpotState::OutOfService), OTHER_DRIVER)
            .await
            .unwrap();
        assert_eq!(f.state().await, SpotState::OutOfService);
    }

    #[tokio::test]
    async fn missing_inputs_are_reported_in_order() {
        let f = Fixture::new(SpotState::Free).await;

        assert!(matches!(
            f.service.update_spot_status(404, None, 999).await,
            Err(DomainError::SpotNotFound(Some(404)))
        ));
        assert!(matches!(
            f.service.update_spot_status(f.spot, None, 999).await,
            Err(DomainError::UserNotFound(999))
        ));
        assert!(matches!(
            f.service.update_spot_status(f.spot, None, DRIVER).await,
            Err(DomainError::InvalidState)
        ));
        assert_eq!(f.state().await, SpotState::Free);
    }

    #[tokio::test]
    async fn non_owner_cannot_touch_spot_during_session() {
        let f = Fixture::new(SpotState::Occupied).await;
        let session = f.book(DRIVER_VEHICLE, at(11, 45), 1800).await;

        for (requester, state) in [
            (OTHER_DRIVER, SpotState::Free),
            (OTHER_DRIVER, SpotState::Occupied),
            (OPERATOR, SpotState::OutOfService),
            (OPERATOR, SpotState::Free),
        ] {
            let err = f
                .service
                .update_spot_status(f.spot, Some(state), requester)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                DomainError::NotSessionOwner { user_id, session_id }
                    if user_id == requester && session_id == session.id
            ));
        }
        assert_eq!(f.state().await, SpotState::Occupied);
    }

    #[tokio::test]
    async fn user_owner_cannot_take_spot_out_of_service() {
        let f = Fixture::new(SpotState::Free).await;
        f.book(DRIVER_VEHICLE, at(11, 50), 1800).await;

        let err = f
            .service
            .update_spot_status(f.spot, Some(SpotState::OutOfService), DRIVER)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::UserCannotTakeOutOfService));
        assert_eq!(f.state().await, SpotState::Free);

        assert!(f
            .service
            .update_spot_status(f.spot, Some(SpotState::Occupied), DRIVER)
            .await
            .unwrap());
        assert_eq!(f.state().await, SpotState::Occupied);
    }

    #[tokio::test]
    async fn operator_owner_can_take_spot_out_of_service() {
        let f = Fixture::new(SpotState::Occupied).await;
        f.book(OPERATOR_VEHICLE, at(11, 30), 3600).await;

        f.service
            .update_spot_status(f.spot, Some(SpotState::OutOfService), OPERATOR)
            .await
            .unwrap();
        assert_eq!(f.state().await, SpotState::OutOfService);

        f.service
            .update_spot_status(f.spot, Some(SpotState::Free), OPERATOR)
            .await
            .unwrap();
        assert_eq!(f.state().await, SpotState::Free);
    }

    #[tokio::test]
    async fn out_of_service_spot_needs_operator() {
        let f = Fixture::new(SpotState::OutOfService).await;

        for state in [SpotState::Free, SpotState::Occupied, SpotState::OutOfService] {
            let err = f
                .service
                .update_spot_status(f.spot, Some(state), DRIVER)
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::OperatorRequired(id) if id == f.spot));
        }
        assert_eq!(f.state().await, SpotState::OutOfService);

        f.service
            .update_spot_status(f.spot, Some(SpotState::Free), OPERATOR)
            .await
            .unwrap();
        assert_eq!(f.state().await, SpotState::Free);
    }

    #[tokio::test]
    async fn user_owner_still_needs_operator_to_leave_out_of_service() {
        let f = Fixture::new(SpotState::OutOfService).await;
        f.book(DRIVER_VEHICLE, at(11, 55), 600).await;

        let err = f
            .service
            .update_spot_status(f.spot, Some(SpotState::Occupied), DRIVER)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::OperatorRequired(_)));
    }

    #[tokio::test]
    async fn finished_and_future_sessions_do_not_count() {
        let f = Fixture::new(SpotState::Free).await;
        // Ends exactly at 12:00, which is "now".
        f.book(DRIVER_VEHICLE, at(11, 30), 1800).await;
        // Starts later.
        f.book(DRIVER_VEHICLE, at(13, 0), 1800).await;

        f.service
            .update_spot_status(f.spot, Some(SpotState::Occupied), OTHER_DRIVER)
            .await
            .unwrap();
        assert_eq!(f.state().await, SpotState::Occupied);

        // Once the later session starts, it blocks other users.
        f.clock.set(at(13, 0));
        assert!(matches!(
            f.service
                .update_spot_status(f.spot, Some(SpotState::Free), OTHER_DRIVER)
                .await,
            Err(DomainError::NotSessionOwner { .. })
        ));

        f.clock.advance(Duration::minutes(30));
        f.service
            .update_spot_status(f.spot, Some(SpotState::Free), OTHER_DRIVER)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn spot_removed_while_waiting_for_the_lock_is_not_found() {
        let f = Fixture::new(SpotState::Free).await;
        let locks = SpotLocks::shared();
        let service = Arc::new(SpotStatusService::new(
            f.storage.clone(),
            locks.clone(),
            f.clock.clone(),
        ));

        let held = locks.acquire(f.spot).await;
        let change = {
            let service = service.clone();
            let spot = f.spot;
            tokio::spawn(async move {
                service
                    .update_spot_status(spot, Some(SpotState::Occupied), DRIVER)
                    .await
            })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        f.storage.charging_spots().delete(f.spot).await.unwrap();
        drop(held);

        assert!(matches!(
            change.await.expect("task panicked"),
            Err(DomainError::SpotNotFound(Some(id))) if id == f.spot
        ));
        assert!(f.storage.charging_spots().find_by_id(f.spot).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn overlapping_active_sessions_are_an_invariant_violation() {
        let f = Fixture::new(SpotState::Occupied).await;
        f.book(DRIVER_VEHICLE, at(11, 40), 1800).await;
        f.book(OPERATOR_VEHICLE, at(11, 50), 1800).await;

        let err = f
            .service
            .update_spot_status(f.spot, Some(SpotState::Free), OPERATOR)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::MultipleActiveSessions { count: 2, .. }
        ));
        assert_eq!(f.state().await, SpotState::Occupied);
    }
}
