//! Caller-visible error taxonomy of the service layer.

use thiserror::Error;

use holdem_shared::ErrorKind;

use crate::game::ActionError;
use crate::store::StoreError;

/// Every failure a caller can observe, classified per the error taxonomy.
/// Rule, precondition and validation failures carry the message verbatim to
/// the caller; transient failures may be retried; fatal failures poison the
/// hand and are never silently recovered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    InputValidation(String),
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    Precondition(String),
    #[error("{0}")]
    RuleViolation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Transient(String),
    #[error("request timed out before it was applied")]
    Timeout,
    #[error("{0}")]
    Fatal(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InputValidation(_) => ErrorKind::InputValidation,
            ServiceError::Authorization(_) => ErrorKind::Authorization,
            ServiceError::Precondition(_) => ErrorKind::Precondition,
            ServiceError::RuleViolation(_) => ErrorKind::RuleViolation,
            ServiceError::Conflict(_) => ErrorKind::Conflict,
            ServiceError::Transient(_) => ErrorKind::Transient,
            ServiceError::Timeout => ErrorKind::Timeout,
            ServiceError::Fatal(_) => ErrorKind::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, ServiceError::Fatal(_))
    }
}

impl From<ActionError> for ServiceError {
    fn from(e: ActionError) -> Self {
        match &e {
            ActionError::NotYourTurn
            | ActionError::HandNotActive
            | ActionError::HandComplete
            | ActionError::NotAutoAdvanceable
            | ActionError::NotAllInRunout
            | ActionError::NotEnoughPlayers => ServiceError::Precondition(e.to_string()),
            ActionError::IllegalAction(_)
            | ActionError::AmountBelowMinimum { .. }
            | ActionError::AmountExceedsStack { .. }
            | ActionError::InsufficientChips => ServiceError::RuleViolation(e.to_string()),
            ActionError::Invariant(_) => ServiceError::Fatal(e.to_string()),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Transient(e.to_string())
    }
}
