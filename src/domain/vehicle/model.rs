//! Vehicle domain entity

use serde::{Deserialize, Serialize};

use crate::domain::charging_spot::ConnectorType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i32,
    /// Owning user
    pub user_id: i32,
    pub brand: String,
    pub model: String,
    pub license_plate: String,
    pub connector_type: ConnectorType,
}
