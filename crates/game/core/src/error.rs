//! Common error infrastructure for platformer-core.
//!
//! Domain errors live next to the code that produces them where that reads
//! better (`PersistError` in [`crate::persistence`]); the action-table errors
//! are shared by the table builder and the state machine, so they live here.

use crate::action::ActionCode;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The caller can keep going; the offending request was simply ignored.
    Recoverable,

    /// Invalid input (a malformed save blob, a bad table definition).
    Validation,

    /// Unexpected state inconsistency; indicates a bug in a species definition.
    Internal,

    /// Unrecoverable; the simulation state must not be trusted any more.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all platformer-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for the variant, usable in logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Rejected `set_action` requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("action code {0} is not part of any declared state")]
    UnknownCode(ActionCode),

    /// The code is an animation member of another state, not a bound entry point.
    #[error("action code {code} is a frame of state {owner} and has no handler of its own")]
    Unbound { code: ActionCode, owner: ActionCode },
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCode(_) => "ACTION_UNKNOWN_CODE",
            Self::Unbound { .. } => "ACTION_UNBOUND",
        }
    }
}

/// Problems found while validating a species action table.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionTableError {
    #[error("action table declares no states")]
    Empty,

    #[error("state {0} declares zero frames")]
    ZeroFrames(ActionCode),

    #[error("state {0} declares zero ticks per frame")]
    ZeroTicks(ActionCode),

    #[error("state {0} is bound twice")]
    Duplicate(ActionCode),

    #[error("state {second} overlaps the frame range of state {first}")]
    Overlap {
        first: ActionCode,
        second: ActionCode,
    },

    #[error("state {from} chains into code {to}, which no state declares")]
    DanglingChain { from: ActionCode, to: ActionCode },

    #[error("initial action {0} is not a bound state")]
    BadInitial(ActionCode),
}

impl GameError for ActionTableError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "TABLE_EMPTY",
            Self::ZeroFrames(_) => "TABLE_ZERO_FRAMES",
            Self::ZeroTicks(_) => "TABLE_ZERO_TICKS",
            Self::Duplicate(_) => "TABLE_DUPLICATE",
            Self::Overlap { .. } => "TABLE_OVERLAP",
            Self::DanglingChain { .. } => "TABLE_DANGLING_CHAIN",
            Self::BadInitial(_) => "TABLE_BAD_INITIAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_errors_are_recoverable() {
        let err = ActionError::Unbound { code: 3, owner: 1 };
        assert!(err.severity().is_recoverable());
        assert_eq!(err.error_code(), "ACTION_UNBOUND");
        assert_eq!(
            err.to_string(),
            "action code 3 is a frame of state 1 and has no handler of its own"
        );
    }

    #[test]
    fn table_errors_are_internal() {
        let err = ActionTableError::Overlap {
            first: 0,
            second: 2,
        };
        assert!(err.severity().is_internal());
    }
}
