//! Error type for request execution.
//!
//! # Design
//! Each variant is one failure path of the executor. The `Display` output of
//! every variant is the plain message callers log or show: status failures
//! and shape mismatches use fixed sentences, while transport and decode
//! failures surface the underlying message unchanged.

use thiserror::Error;

/// Message rendered for a body that parsed but is not an object or array.
pub const SHAPE_MISMATCH_MESSAGE: &str = "Failed to parse response to the expected type";

/// Why a request did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request never produced a response: bad URL, DNS, connection
    /// refused, disallowed redirect, or the body could not be read.
    #[error("{0}")]
    Transport(String),

    /// The server answered with a status outside 200..=299.
    #[error("Failed to fetch with status {status} and message {status_text}")]
    Status { status: u16, status_text: String },

    /// The body is not valid JSON, or does not convert to the requested type.
    #[error("{0}")]
    Decode(String),

    /// The body is valid JSON but `null` or a primitive.
    #[error("{}", SHAPE_MISMATCH_MESSAGE)]
    ShapeMismatch,
}

pub type FetchResult<T> = Result<T, FetchError>;

impl FetchError {
    /// HTTP status of a `Status` failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, FetchError::Decode(_))
    }

    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, FetchError::ShapeMismatch)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}
