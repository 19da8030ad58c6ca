//! Error types for stagehand.

use thiserror::Error;

/// The main error type for stagehand operations.
#[derive(Error, Debug)]
pub enum StagehandError {
    /// An operation was called with the wrong number of arguments.
    #[error("{operation}: expected {expected} argument(s), got {got}")]
    Arity {
        operation: String,
        expected: usize,
        got: usize,
    },

    /// An argument had the wrong kind of value.
    #[error("{operation}: argument {position} should be {expected}, got {found}")]
    ArgumentType {
        operation: String,
        position: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// An argument had the right kind but an out-of-range value.
    #[error("{operation}: {reason}")]
    InvalidArgument {
        operation: &'static str,
        reason: String,
    },

    /// A symbol token is not part of the closed vocabulary for its kind.
    #[error("unknown {kind} '{token}'")]
    UnknownEnumValue { kind: &'static str, token: String },

    /// A required resource (e.g. a stereo-capable output) is not available.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// A primitive id did not resolve to an existing primitive.
    #[error("primitive {0} does not exist")]
    UnresolvedReference(u32),

    /// No operation is registered under the given name.
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// Script source could not be read.
    #[error("parse error at byte {offset}: {reason}")]
    Parse { offset: usize, reason: String },

    /// Loading or saving an asset failed.
    #[error("I/O error on '{path}': {reason}")]
    Io { path: String, reason: String },

    /// An image does not have 3 or 4 channels.
    #[error("unsupported channel layout in '{path}': {channels} channel(s)")]
    UnsupportedLayout { path: String, channels: u8 },

    /// No primitive format is registered for a file extension.
    #[error("unsupported primitive format: '{0}'")]
    UnsupportedFormat(String),

    /// A primitive was handed to a format that cannot serialize it.
    #[error("incompatible primitive: expected {expected}, got {found}")]
    IncompatiblePrimitive {
        expected: &'static str,
        found: &'static str,
    },

    /// One or more steps of a composite reset failed.
    #[error("engine reset incomplete, failed steps: {}", .0.join(", "))]
    ResetIncomplete(Vec<String>),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl StagehandError {
    /// Builds an [`StagehandError::InvalidArgument`].
    pub fn invalid(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation,
            reason: reason.into(),
        }
    }

    /// Returns true for the argument-shape and argument-range errors.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Self::Arity { .. } | Self::ArgumentType { .. } | Self::InvalidArgument { .. }
        )
    }
}

/// A specialized Result type for stagehand operations.
pub type Result<T> = std::result::Result<T, StagehandError>;
