//! Charging spot repository interface

use async_trait::async_trait;

use super::model::ChargingSpot;
use crate::domain::DomainResult;

#[async_trait]
pub trait ChargingSpotRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ChargingSpot>>;
    async fn find_by_station_id(&self, station_id: i32) -> DomainResult<Vec<ChargingSpot>>;
    /// Insert when `spot.id == 0`, otherwise overwrite. Returns the stored spot.
    async fn save(&self, spot: ChargingSpot) -> DomainResult<ChargingSpot>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
