use thiserror::Error;

use crate::core::errors::StateError;
use crate::protocols::teleportation::ProtocolPhase;

/// Failures reported by the teleportation driver to its caller.
///
/// None of these are fatal: the session is left exactly as it was before the
/// failing call, so the caller can report the message and carry on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Invalid amplitude {input:?}: {reason}")]
    InvalidAmplitude { input: String, reason: String },

    #[error("Cannot run {operation}: initialize the protocol first")]
    UninitializedState { operation: &'static str },

    #[error("Cannot run {operation} while the protocol is {current}; it requires {required}")]
    PhaseOrder {
        operation: &'static str,
        required: ProtocolPhase,
        current: ProtocolPhase,
    },

    #[error("State error: {0}")]
    State(#[from] StateError),
}

impl ProtocolError {
    pub(crate) fn invalid_amplitude(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAmplitude {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
