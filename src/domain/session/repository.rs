//! Session repository interface

use async_trait::async_trait;

use super::model::{Session, SessionRecord};
use crate::domain::DomainResult;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Session>>;
    async fn find_by_spot_id(&self, spot_id: i32) -> DomainResult<Vec<Session>>;
    async fn find_by_station_id(&self, station_id: i32) -> DomainResult<Vec<Session>>;
    /// Sessions of every vehicle owned by the user
    async fn find_by_user_id(&self, user_id: i32) -> DomainResult<Vec<Session>>;
    /// Persist a new session, assigning its id and uuid
    async fn save(&self, record: SessionRecord) -> DomainResult<Session>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
