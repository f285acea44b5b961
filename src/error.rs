//! Unified error handling for tmi-bot.
//!
//! Dispatch failures never reach the chat surface unless the configured
//! reply policy asks for it; they are labelled for logging here.

use thiserror::Error;

// ============================================================================
// Dispatch Errors (command processing)
// ============================================================================

/// Reasons a command invocation was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("command {0} requires broadcaster or moderator")]
    PermissionDenied(String),

    #[error("too many arguments for {command}: expected at most {expected}, got {got}")]
    TooManyArguments {
        command: String,
        expected: usize,
        got: usize,
    },

    #[error("missing required parameter '{parameter}' for {command}")]
    MissingRequiredParameter { command: String, parameter: String },

    #[error("invalid value for parameter '{parameter}' of {command}: {value:?}")]
    InvalidParameterValue {
        command: String,
        parameter: String,
        value: String,
    },

    #[error("no command name after marker")]
    EmptyCommandInput,

    /// The handler returned an error or panicked.
    #[error("handler for {command} failed: {reason}")]
    HandlerFailed { command: String, reason: String },
}

impl DispatchError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCommand(_) => "unknown_command",
            Self::PermissionDenied(_) => "permission_denied",
            Self::TooManyArguments { .. } => "too_many_arguments",
            Self::MissingRequiredParameter { .. } => "missing_required_parameter",
            Self::InvalidParameterValue { .. } => "invalid_parameter_value",
            Self::EmptyCommandInput => "empty_command_input",
            Self::HandlerFailed { .. } => "handler_failed",
        }
    }

    /// Whether the failure was caused by what the user typed.
    ///
    /// Only these are ever eligible for a chat reply.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::HandlerFailed { .. })
    }
}

// ============================================================================
// Handler Errors
// ============================================================================

/// Failure returned by a command or module handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HandlerError {
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal(reason.into())
    }
}

// ============================================================================
// Transport Errors
// ============================================================================

/// Errors raised by a message sink while transmitting.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection closed")]
    Closed,
}

/// Render a caught panic payload for logging.
pub(crate) fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_error_codes() {
        assert_eq!(
            DispatchError::UnknownCommand("x".into()).error_code(),
            "unknown_command"
        );
        assert_eq!(
            DispatchError::EmptyCommandInput.error_code(),
            "empty_command_input"
        );
        assert_eq!(
            DispatchError::HandlerFailed {
                command: "x".into(),
                reason: "boom".into()
            }
            .error_code(),
            "handler_failed"
        );
    }

    #[test]
    fn test_only_handler_failures_are_not_user_errors() {
        assert!(DispatchError::PermissionDenied("x".into()).is_user_error());
        assert!(
            DispatchError::TooManyArguments {
                command: "x".into(),
                expected: 1,
                got: 2
            }
            .is_user_error()
        );
        assert!(
            !DispatchError::HandlerFailed {
                command: "x".into(),
                reason: "boom".into()
            }
            .is_user_error()
        );
    }

    #[test]
    fn test_handler_error_wraps_anyhow() {
        let err: HandlerError = anyhow::anyhow!("lookup failed").into();
        assert_eq!(err.to_string(), "lookup failed");
        assert_eq!(
            HandlerError::internal("bad state").to_string(),
            "internal error: bad state"
        );
    }

    #[test]
    fn test_panic_reason_formats_payloads() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("oops");
        assert_eq!(panic_reason(payload.as_ref()), "panicked: oops");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bad"));
        assert_eq!(panic_reason(payload.as_ref()), "panicked: bad");
        let payload: Box<dyn std::any::Any + Send> = Box::new(7u8);
        assert_eq!(panic_reason(payload.as_ref()), "panicked");
    }
}
