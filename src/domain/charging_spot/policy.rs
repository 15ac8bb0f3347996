//! Authorization matrix for spot state transitions.
//!
//! Whoever holds the spot's active session has priority over state changes,
//! but a regular user cannot use that to force the spot offline. Once a spot
//! is out of service only an operator can bring it back.

use super::model::SpotState;
use crate::domain::user::UserRole;
use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

/// Who, if anyone, holds the spot right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOccupancy {
    /// No session contains the current instant
    Idle,
    /// The active session belongs to the requester
    HeldByRequester { session_id: i32 },
    /// The active session belongs to someone else
    HeldByOther { session_id: i32 },
}

/// Everything the decision depends on, detached from storage.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext {
    pub spot_id: i32,
    pub requester_id: i32,
    pub requester_role: UserRole,
    pub current: SpotState,
    pub requested: SpotState,
    pub occupancy: SessionOccupancy,
}

/// Decide whether the transition may proceed.
///
/// When the requester holds the active session, the session owner's role and
/// the requester's role are the same user's role.
pub fn authorize_transition(ctx: &TransitionContext) -> DomainResult<()> {
    match ctx.occupancy {
        SessionOccupancy::HeldByOther { session_id } => {
            return Err(DomainError::NotSessionOwner {
                user_id: ctx.requester_id,
                session_id,
            });
        }
        SessionOccupancy::HeldByRequester { .. }
            if ctx.requester_role == UserRole::User
                && ctx.requested == SpotState::OutOfService =>
        {
            return Err(DomainError::UserCannotTakeOutOfService);
        }
        _ => {}
    }

    if ctx.current == SpotState::OutOfService && ctx.requester_role != UserRole::Operator {
        return Err(DomainError::OperatorRequired(ctx.spot_id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [SpotState; 3] = [SpotState::Free, SpotState::Occupied, SpotState::OutOfService];

    fn ctx(
        role: UserRole,
        current: SpotState,
        requested: SpotState,
        occupancy: SessionOccupancy,
    ) -> TransitionContext {
        TransitionContext {
            spot_id: 7,
            requester_id: 1,
            requester_role: role,
            current,
            requested,
            occupancy,
        }
    }

    #[test]
    fn non_owner_is_always_rejected_during_a_session() {
        for role in [UserRole::User, UserRole::Operator] {
            for current in ALL_STATES {
                for requested in ALL_STATES {
                    let err = authorize_transition(&ctx(
                        role,
                        current,
                        requested,
                        SessionOccupancy::HeldByOther { session_id: 9 },
                    ))
                    .unwrap_err();
                    assert!(matches!(
                        err,
                        DomainError::NotSessionOwner { user_id: 1, session_id: 9 }
                    ));
                }
            }
        }
    }

    #[test]
    fn user_owner_can_set_anything_but_out_of_service() {
        let held = SessionOccupancy::HeldByRequester { session_id: 3 };
        for current in [SpotState::Free, SpotState::Occupied] {
            assert!(authorize_transition(&ctx(UserRole::User, current, SpotState::Free, held)).is_ok());
            assert!(
                authorize_transition(&ctx(UserRole::User, current, SpotState::Occupied, held)).is_ok()
            );
            assert!(matches!(
                authorize_transition(&ctx(UserRole::User, current, SpotState::OutOfService, held)),
                Err(DomainError::UserCannotTakeOutOfService)
            ));
        }
    }

    #[test]
    fn operator_owner_can_set_any_state() {
        let held = SessionOccupancy::HeldByRequester { session_id: 3 };
        for current in ALL_STATES {
            for requested in ALL_STATES {
                assert!(
                    authorize_transition(&ctx(UserRole::Operator, current, requested, held)).is_ok()
                );
            }
        }
    }

    #[test]
    fn out_of_service_needs_an_operator() {
        for requested in ALL_STATES {
            assert!(matches!(
                authorize_transition(&ctx(
                    UserRole::User,
                    SpotState::OutOfService,
                    requested,
                    SessionOccupancy::Idle
                )),
                Err(DomainError::OperatorRequired(7))
            ));
            assert!(authorize_transition(&ctx(
                UserRole::Operator,
                SpotState::OutOfService,
                requested,
                SessionOccupancy::Idle
            ))
            .is_ok());
        }
    }

    #[test]
    fn idle_spot_in_service_is_open_to_everyone() {
        for current in [SpotState::Free, SpotState::Occupied] {
            for requested in ALL_STATES {
                for role in [UserRole::User, UserRole::Operator] {
                    assert!(authorize_transition(&ctx(role, current, requested, SessionOccupancy::Idle))
                        .is_ok());
                }
            }
        }
    }
}
