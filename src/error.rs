//! The error and result types of this crate.
//!
//! Two classes of failure exist at the map seam:
//!
//! -   `InvalidArgument`: a key or value equal to the reserved `NO_VALUE`, or an
//!     invalid construction parameter. Always detected before any mutation.
//! -   `Io`: reserved for disk-backed implementations of the durable contract.
//!     The in-memory types of this crate never produce it.

use std::{error, fmt, io, result};

/// Universal error type of this crate.
#[derive(Debug)]
pub enum MultimapError {
    /// A parameter carried a value the map cannot accept.
    InvalidArgument {
        /// Name of the offending parameter.
        param: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// An underlying storage failed.
    Io(io::Error),
}

impl MultimapError {
    pub(crate) fn invalid(param: &'static str, reason: impl Into<String>) -> Self {
        MultimapError::InvalidArgument {
            param,
            reason: reason.into(),
        }
    }

    pub(crate) fn no_value(param: &'static str) -> Self {
        Self::invalid(param, "can't be 0 -- it is the reserved NO_VALUE")
    }

    /// Whether this is an `InvalidArgument` failure.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, MultimapError::InvalidArgument { .. })
    }
}

impl fmt::Display for MultimapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MultimapError::InvalidArgument { param, reason } => {
                write!(f, "invalid argument `{}`: {}", param, reason)
            }
            MultimapError::Io(e) => write!(f, "i/o failure: {}", e),
        }
    }
}

impl error::Error for MultimapError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            MultimapError::InvalidArgument { .. } => None,
            MultimapError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for MultimapError {
    fn from(e: io::Error) -> Self {
        MultimapError::Io(e)
    }
}

/// Universal result type of this crate.
pub type Result<T> = result::Result<T, MultimapError>;
