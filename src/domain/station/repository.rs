use async_trait::async_trait;

use super::model::ChargingStation;
use crate::domain::DomainResult;

#[async_trait]
pub trait StationRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<ChargingStation>>;
}
