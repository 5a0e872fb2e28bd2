//! Error codes for the Ronda backend.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings an
//! upstream API layer puts on the wire. Add new codes here; never pass
//! ad-hoc strings as error codes.

use core::fmt;

/// Centralized error codes for the Ronda backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request validation
    /// Malformed or incomplete request parameters
    ValidationError,
    /// Action type outside the declared vocabulary
    UnknownActionType,
    /// Action payload failed its type-specific construction rule
    InvalidAction,
    /// Player may not act in this round right now
    IneligibleAction,

    // Resource not found
    /// Round not found
    RoundNotFound,
    /// Player not found
    PlayerNotFound,

    // Conflicts and downstream failures
    /// Concurrent modification detected at persist time
    OptimisticLock,
    /// Durability write did not succeed
    PersistenceFailure,
    /// Round finishing computation reported failure
    FinishingFailure,

    // Operational
    /// Configuration problem
    ConfigError,
    /// Unexpected internal error
    Internal,
}

impl ErrorCode {
    /// Canonical SCREAMING_SNAKE_CASE string for this code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::UnknownActionType => "UNKNOWN_ACTION_TYPE",
            ErrorCode::InvalidAction => "INVALID_ACTION",
            ErrorCode::IneligibleAction => "INELIGIBLE_ACTION",
            ErrorCode::RoundNotFound => "ROUND_NOT_FOUND",
            ErrorCode::PlayerNotFound => "PLAYER_NOT_FOUND",
            ErrorCode::OptimisticLock => "OPTIMISTIC_LOCK",
            ErrorCode::PersistenceFailure => "PERSISTENCE_FAILURE",
            ErrorCode::FinishingFailure => "FINISHING_FAILURE",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::ErrorCode;

    const ALL: &[ErrorCode] = &[
        ErrorCode::ValidationError,
        ErrorCode::UnknownActionType,
        ErrorCode::InvalidAction,
        ErrorCode::IneligibleAction,
        ErrorCode::RoundNotFound,
        ErrorCode::PlayerNotFound,
        ErrorCode::OptimisticLock,
        ErrorCode::PersistenceFailure,
        ErrorCode::FinishingFailure,
        ErrorCode::ConfigError,
        ErrorCode::Internal,
    ];

    #[test]
    fn codes_are_unique_and_screaming_snake() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.as_str()), "duplicate code {code}");
            assert!(
                code.as_str()
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c == '_'),
                "bad code format: {code}"
            );
        }
    }
}
