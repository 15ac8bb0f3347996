//! Charging spot management for station operators

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::spot_locks::SharedSpotLocks;
use crate::domain::{
    ChargingSpot, ChargingSpotUpdate, ChargingStation, DomainResult, NewChargingSpot,
    RepositoryProvider,
};
use crate::shared::errors::DomainError;

pub struct ChargingSpotService {
    repos: Arc<dyn RepositoryProvider>,
    locks: SharedSpotLocks,
}

impl ChargingSpotService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, locks: SharedSpotLocks) -> Self {
        Self { repos, locks }
    }

    pub async fn spots_for_station(&self, station_id: i32) -> DomainResult<Vec<ChargingSpot>> {
        let spots = self.repos.charging_spots().find_by_station_id(station_id).await?;
        debug!(station_id, count = spots.len(), "Fetched charging spots");
        Ok(spots)
    }

    pub async fn create_spot(
        &self,
        operator_id: i32,
        input: NewChargingSpot,
    ) -> DomainResult<ChargingSpot> {
        let station = self.operated_station(operator_id, input.station_id).await?;

        let mut missing = Vec::new();
        if input.power_kw.is_none() {
            missing.push("power_kw");
        }
        if input.price_per_kwh.is_none() {
            missing.push("price_per_kwh");
        }
        let (Some(power_kw), Some(price_per_kwh)) = (input.power_kw, input.price_per_kwh) else {
            return Err(DomainError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        };
        ensure_positive("power_kw", power_kw)?;
        ensure_positive("price_per_kwh", price_per_kwh)?;

        let mut spot = ChargingSpot::new(station.id, power_kw, price_per_kwh);
        if let Some(connector_type) = input.connector_type {
            spot.connector_type = connector_type;
        }
        if let Some(velocity) = input.charging_velocity {
            spot.charging_velocity = velocity;
        }
        if let Some(state) = input.state {
            spot.state = state;
        }

        let spot = self.repos.charging_spots().save(spot).await?;
        info!(spot_id = spot.id, station_id = station.id, operator_id, "Charging spot created");
        Ok(spot)
    }

    /// Partial update of power, price and connector type. State changes go
    /// through the status service.
    pub async fn update_spot(
        &self,
        operator_id: i32,
        spot_id: i32,
        update: ChargingSpotUpdate,
    ) -> DomainResult<ChargingSpot> {
        let mut spot = self.find_spot(spot_id).await?;
        self.operated_station(operator_id, spot.station_id).await?;

        if let Some(power_kw) = update.power_kw {
            ensure_positive("power_kw", power_kw)?;
            spot.power_kw = power_kw;
        }
        if let Some(price_per_kwh) = update.price_per_kwh {
            ensure_positive("price_per_kwh", price_per_kwh)?;
            spot.price_per_kwh = price_per_kwh;
        }
        if let Some(connector_type) = update.connector_type {
            spot.connector_type = connector_type;
        }

        let _guard = self.locks.acquire(spot_id).await;
        // Keep whatever state the status service may have written meanwhile.
        spot.state = self.find_spot(spot_id).await?.state;
        let spot = self.repos.charging_spots().save(spot).await?;
        info!(spot_id, operator_id, "Charging spot updated");
        Ok(spot)
    }

    pub async fn delete_spot(&self, operator_id: i32, spot_id: i32) -> DomainResult<()> {
        let spot = self.find_spot(spot_id).await?;
        self.operated_station(operator_id, spot.station_id).await?;

        {
            let _guard = self.locks.acquire(spot_id).await;
            self.find_spot(spot_id).await?;
            if !self.repos.sessions().find_by_spot_id(spot_id).await?.is_empty() {
                return Err(DomainError::SpotInUse(spot_id));
            }
            self.repos.charging_spots().delete(spot_id).await?;
        }
        self.locks.forget(spot_id);

        info!(spot_id, operator_id, "Charging spot deleted");
        Ok(())
    }

    async fn find_spot(&self, spot_id: i32) -> DomainResult<ChargingSpot> {
        self.repos
            .charging_spots()
            .find_by_id(spot_id)
            .await?
            .ok_or(DomainError::SpotNotFound(Some(spot_id)))
    }

    async fn operated_station(
        &self,
        operator_id: i32,
        station_id: i32,
    ) -> DomainResult<ChargingStation> {
        let station = self
            .repos
            .stations()
            .find_by_id(station_id)
            .await?
            .ok_or(DomainError::StationNotFound(station_id))?;

        if station.operator_id != operator_id {
            debug!(operator_id, station_id, "Station belongs to another operator");
            return Err(DomainError::NotStationOperator {
                operator_id,
                station_id,
            });
        }
        Ok(station)
    }
}

fn ensure_positive(field: &str, value: Decimal) -> DomainResult<()> {
    if value <= Decimal::ZERO {
        return Err(DomainError::Validation(format!(
            "{} must be positive, got {}",
            field, value
        )));
    }
    Ok(())
}
