use async_trait::async_trait;

use super::model::Vehicle;
use crate::domain::DomainResult;

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Vehicle>>;
}
