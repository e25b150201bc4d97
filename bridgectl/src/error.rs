//! Error types for the bridgectl library.
//!
//! Every fallible operation in the crate returns [`Result`]. Errors that can
//! surface while serving a request also know which HTTP status they map to,
//! so the front end can answer with a 500 instead of tearing the process
//! down.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::port::{InvalidPortError, InvalidPortRangeError, Port, PortRange};

/// Result type alias for bridgectl operations.
///
/// # Examples
///
/// ```
/// use bridgectl::{Port, Result};
///
/// fn base() -> Result<Port> {
///     Ok(Port::try_from(10000)?)
/// }
/// # assert_eq!(base().unwrap().value(), 10000);
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the bridgectl library.
#[derive(Debug, Error)]
pub enum Error {
    /// A number could not be used as a port.
    #[error("invalid port {value}: {reason}")]
    InvalidPort {
        /// The rejected value.
        value: u16,
        /// Why it was rejected.
        reason: String,
    },

    /// Two ports did not form a valid range.
    #[error("invalid port range {min}-{max}: {reason}")]
    InvalidPortRange {
        /// Requested lower bound.
        min: u16,
        /// Requested upper bound.
        max: u16,
        /// Why the range was rejected.
        reason: String,
    },

    /// A configuration value failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Every candidate in the search window was occupied.
    #[error("port range {range} exhausted")]
    PortExhausted {
        /// The window that was searched.
        range: PortRange,
    },

    /// The availability check itself could not be carried out.
    #[error("occupancy check failed for port {port}: {source}")]
    OccupancyCheckFailed {
        /// The candidate being checked.
        port: Port,
        /// The underlying failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The blocking worker running a probe did not finish.
    #[error("probe worker failed: {0}")]
    Worker(String),
}

impl Error {
    /// Builds an [`Error::OccupancyCheckFailed`] from any error type.
    pub fn occupancy(
        port: Port,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::OccupancyCheckFailed {
            port,
            source: source.into(),
        }
    }

    /// HTTP status used when this error ends a request.
    ///
    /// # Examples
    ///
    /// ```
    /// use axum::http::StatusCode;
    /// use bridgectl::{Error, Port, PortRange};
    ///
    /// let range = PortRange::starting_at(Port::try_from(10000).unwrap(), 10).unwrap();
    /// let err = Error::PortExhausted { range };
    /// assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    /// ```
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPort { .. } | Self::InvalidPortRange { .. } | Self::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Io(_)
            | Self::PortExhausted { .. }
            | Self::OccupancyCheckFailed { .. }
            | Self::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` for errors that mean "no port could be found" as
    /// opposed to "the check could not run".
    #[must_use]
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, Self::PortExhausted { .. })
    }
}

impl From<InvalidPortError> for Error {
    fn from(err: InvalidPortError) -> Self {
        Self::InvalidPort {
            value: err.value,
            reason: err.reason,
        }
    }
}

impl From<InvalidPortRangeError> for Error {
    fn from(err: InvalidPortRangeError) -> Self {
        Self::InvalidPortRange {
            min: err.min.value(),
            max: err.max.value(),
            reason: err.reason,
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Worker(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(value: u16) -> Port {
        Port::try_from(value).unwrap()
    }

    #[test]
    fn test_exhausted_message_names_range() {
        let range = PortRange::starting_at(port(10000), 1000).unwrap();
        let err = Error::PortExhausted { range };
        assert_eq!(err.to_string(), "port range 10000-10999 exhausted");
        assert!(err.is_exhaustion());
    }

    #[test]
    fn test_occupancy_failure_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "socket table full");
        let err = Error::occupancy(port(10001), io);

        let message = err.to_string();
        assert!(message.contains("10001"));
        assert!(message.contains("socket table full"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_exhaustion());
    }

    #[test]
    fn test_status_codes() {
        let range = PortRange::starting_at(port(10000), 1).unwrap();
        assert_eq!(
            Error::PortExhausted { range }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::occupancy(port(10000), "boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::Worker("panicked".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::Validation {
                field: "search_limit".into(),
                message: "must be positive".into(),
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_invalid_port_conversion() {
        let err: Error = Port::try_from(0).unwrap_err().into();
        assert!(matches!(err, Error::InvalidPort { value: 0, .. }));
    }

    #[test]
    fn test_invalid_range_conversion() {
        let err: Error = PortRange::new(port(20), port(10)).unwrap_err().into();
        assert!(matches!(
            err,
            Error::InvalidPortRange {
                min: 20,
                max: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_into_response_status() {
        let range = PortRange::starting_at(port(10000), 1).unwrap();
        let response = Error::PortExhausted { range }.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
