//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider` — unified access to all per-aggregate repositories
//! - `DomainResult` — standard result type for domain operations

use super::charging_spot::ChargingSpotRepository;
use super::session::SessionRepository;
use super::station::StationRepository;
use super::user::UserRepository;
use super::vehicle::VehicleRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let spot = repos.charging_spots().find_by_id(4).await?;
///     let sessions = repos.sessions().find_by_spot_id(4).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn charging_spots(&self) -> &dyn ChargingSpotRepository;
    fn sessions(&self) -> &dyn SessionRepository;
    fn vehicles(&self) -> &dyn VehicleRepository;
    fn users(&self) -> &dyn UserRepository;
    fn stations(&self) -> &dyn StationRepository;
}
