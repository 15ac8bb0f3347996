//! In-memory storage implementation

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{
    ChargingSpot, ChargingSpotRepository, ChargingStation, DomainError, DomainResult,
    RepositoryProvider, Session, SessionRecord, SessionRepository, StationRepository, User,
    UserRepository, Vehicle, VehicleRepository,
};

/// In-memory storage for development and testing.
///
/// Stations, vehicles and users are managed elsewhere; the `insert_*`
/// helpers stand in for that CRUD when seeding.
pub struct InMemoryStorage {
    stations: DashMap<i32, ChargingStation>,
    charging_spots: DashMap<i32, ChargingSpot>,
    sessions: DashMap<i32, Session>,
    vehicles: DashMap<i32, Vehicle>,
    users: DashMap<i32, User>,
    spot_counter: AtomicI32,
    session_counter: AtomicI32,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            stations: DashMap::new(),
            charging_spots: DashMap::new(),
            sessions: DashMap::new(),
            vehicles: DashMap::new(),
            users: DashMap::new(),
            spot_counter: AtomicI32::new(1),
            session_counter: AtomicI32::new(1),
        }
    }

    pub fn insert_station(&self, station: ChargingStation) {
        self.stations.insert(station.id, station);
    }

    pub fn insert_vehicle(&self, vehicle: Vehicle) {
        self.vehicles.insert(vehicle.id, vehicle);
    }

    pub fn insert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn sorted<T: Clone>(mut items: Vec<(i32, T)>) -> Vec<T> {
        items.sort_by_key(|(id, _)| *id);
        items.into_iter().map(|(_, v)| v).collect()
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChargingSpotRepository for InMemoryStorage {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ChargingSpot>> {
        Ok(self.charging_spots.get(&id).map(|s| s.clone()))
    }

    async fn find_by_station_id(&self, station_id: i32) -> DomainResult<Vec<ChargingSpot>> {
        Ok(Self::sorted(
            self.charging_spots
                .iter()
                .filter(|s| s.station_id == station_id)
                .map(|s| (s.id, s.clone()))
                .collect(),
        ))
    }

    async fn save(&self, mut spot: ChargingSpot) -> DomainResult<ChargingSpot> {
        if spot.id == 0 {
            spot.id = self.spot_counter.fetch_add(1, Ordering::SeqCst);
        } else if !self.charging_spots.contains_key(&spot.id) {
            return Err(DomainError::SpotNotFound(Some(spot.id)));
        }
        self.charging_spots.insert(spot.id, spot.clone());
        Ok(spot)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.charging_spots
            .remove(&id)
            .ok_or(DomainError::SpotNotFound(Some(id)))?;
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for InMemoryStorage {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Session>> {
        Ok(self.sessions.get(&id).map(|s| s.clone()))
    }

    async fn find_by_spot_id(&self, spot_id: i32) -> DomainResult<Vec<Session>> {
        Ok(Self::sorted(
            self.sessions
                .iter()
                .filter(|s| s.charging_spot_id == spot_id)
                .map(|s| (s.id, s.clone()))
                .collect(),
        ))
    }

    async fn find_by_station_id(&self, station_id: i32) -> DomainResult<Vec<Session>> {
        Ok(Self::sorted(
            self.sessions
                .iter()
                .filter(|s| {
                    self.charging_spots
                        .get(&s.charging_spot_id)
                        .is_some_and(|spot| spot.station_id == station_id)
                })
                .map(|s| (s.id, s.clone()))
                .collect(),
        ))
    }

    async fn find_by_user_id(&self, user_id: i32) -> DomainResult<Vec<Session>> {
        Ok(Self::sorted(
            self.sessions
                .iter()
                .filter(|s| {
                    self.vehicles
                        .get(&s.vehicle_id)
                        .is_some_and(|v| v.user_id == user_id)
                })
                .map(|s| (s.id, s.clone()))
                .collect(),
        ))
    }

    async fn save(&self, record: SessionRecord) -> DomainResult<Session> {
        let session = Session {
            id: self.session_counter.fetch_add(1, Ordering::SeqCst),
            uuid: Uuid::new_v4().to_string(),
            vehicle_id: record.vehicle_id,
            charging_spot_id: record.charging_spot_id,
            start_time: record.start_time,
            duration: record.duration,
            total_cost: record.total_cost,
        };
        self.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.sessions
            .remove(&id)
            .ok_or(DomainError::SessionNotFound(id))?;
        Ok(())
    }
}

#[async_trait]
impl VehicleRepository for InMemoryStorage {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Vehicle>> {
        Ok(self.vehicles.get(&id).map(|v| v.clone()))
    }
}

#[async_trait]
impl UserRepository for InMemoryStorage {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }
}

#[async_trait]
impl StationRepository for InMemoryStorage {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ChargingStation>> {
        Ok(self.stations.get(&id).map(|s| s.clone()))
    }
}

impl RepositoryProvider for InMemoryStorage {
    fn charging_spots(&self) -> &dyn ChargingSpotRepository {
        self
    }

    fn sessions(&self) -> &dyn SessionRepository {
        self
    }

    fn vehicles(&self) -> &dyn VehicleRepository {
        self
    }

    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn stations(&self) -> &dyn StationRepository {
        self
    }
}
