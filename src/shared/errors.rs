use thiserror::Error;

/// Reason a candidate session's schedule was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleViolation {
    MissingStartTime,
    NonPositiveDuration,
    /// The session would end past the last representable instant.
    DurationOutOfRange,
}

impl std::fmt::Display for ScheduleViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingStartTime => write!(f, "start time is missing"),
            Self::NonPositiveDuration => write!(f, "duration must be greater than zero"),
            Self::DurationOutOfRange => write!(f, "duration is too large"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Vehicle not found: {0:?}")]
    VehicleNotFound(Option<i32>),

    #[error("User {user_id} does not own vehicle {vehicle_id}")]
    NotOwner { user_id: i32, vehicle_id: i32 },

    #[error("Charging spot not found: {0:?}")]
    SpotNotFound(Option<i32>),

    #[error("Charging spot {spot_id} is already booked by session {session_id}")]
    SlotConflict { spot_id: i32, session_id: i32 },

    #[error("Invalid schedule: {}", join_violations(.0))]
    InvalidSchedule(Vec<ScheduleViolation>),

    #[error("User not found: {0}")]
    UserNotFound(i32),

    #[error("Requested spot state is missing")]
    InvalidState,

    #[error("User {user_id} is not the owner of the active session {session_id}")]
    NotSessionOwner { user_id: i32, session_id: i32 },

    #[error("Only operators can take a spot out of service during an active session")]
    UserCannotTakeOutOfService,

    #[error("Charging spot {0} is out of service; only operators can change its state")]
    OperatorRequired(i32),

    #[error("Charging spot {spot_id} has {count} overlapping active sessions")]
    MultipleActiveSessions { spot_id: i32, count: usize },

    #[error("Charging station not found: {0}")]
    StationNotFound(i32),

    #[error("Session not found: {0}")]
    SessionNotFound(i32),

    #[error("Operator {operator_id} does not manage station {station_id}")]
    NotStationOperator { operator_id: i32, station_id: i32 },

    #[error("Charging spot {0} is referenced by sessions")]
    SpotInUse(i32),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Whether the error is a rejection of the caller's request, as opposed
    /// to a fault in a storage collaborator.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, DomainError::Storage(_))
    }

    /// Short label used in metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::VehicleNotFound(_) => "vehicle_not_found",
            DomainError::NotOwner { .. } => "not_owner",
            DomainError::SpotNotFound(_) => "spot_not_found",
            DomainError::SlotConflict { .. } => "slot_conflict",
            DomainError::InvalidSchedule(_) => "invalid_schedule",
            DomainError::UserNotFound(_) => "user_not_found",
            DomainError::InvalidState => "invalid_state",
            DomainError::NotSessionOwner { .. } => "not_session_owner",
            DomainError::UserCannotTakeOutOfService => "user_cannot_take_out_of_service",
            DomainError::OperatorRequired(_) => "operator_required",
            DomainError::MultipleActiveSessions { .. } => "multiple_active_sessions",
            DomainError::StationNotFound(_) => "station_not_found",
            DomainError::SessionNotFound(_) => "session_not_found",
            DomainError::NotStationOperator { .. } => "not_station_operator",
            DomainError::SpotInUse(_) => "spot_in_use",
            DomainError::Validation(_) => "validation",
            DomainError::Storage(_) => "storage",
        }
    }
}

fn join_violations(violations: &[ScheduleViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
