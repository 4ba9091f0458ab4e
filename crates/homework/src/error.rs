use std::fmt;

use reqwest::StatusCode;

/// Boxed error used for causes coming from pluggable collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a single polling cycle.
///
/// Every variant is recoverable at cycle granularity; the poll loop decides whether to keep
/// going.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// Network or body decoding failure while talking to the endpoint.
    #[error("request to {endpoint} failed")]
    Transport {
        /// Endpoint URL
        endpoint: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },
    /// The endpoint answered with a non-success status code.
    #[error("endpoint {endpoint} is unavailable, status code: {}", .status.as_u16())]
    EndpointUnavailable {
        /// Endpoint URL
        endpoint: String,
        /// HTTP status returned
        status: StatusCode,
    },
    /// The response body does not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// The response carried no homeworks and the empty policy forbids that.
    #[error("response contains no homeworks")]
    NoPendingEntities,
    /// Status outside the verdict table.
    #[error("unrecognized homework status: {0:?}")]
    UnrecognizedStatus(String),
    /// A homework record lacks a required key.
    #[error("homework record is missing the {0:?} key")]
    MissingField(&'static str),
    /// The messenger failed to deliver a notification.
    #[error("failed to deliver message")]
    Delivery {
        /// Underlying messenger error
        #[source]
        source: BoxError,
    },
}

/// Coarse classification of a [`PollError`], used as a log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network or decoding failure
    TransportFailure,
    /// Non-success HTTP status
    EndpointUnavailable,
    /// Response shape violation
    MalformedResponse,
    /// Empty homeworks list under the strict policy
    NoPendingEntities,
    /// Status outside the fixed table
    UnrecognizedStatus,
    /// Required record key absent
    MissingField,
    /// Messaging send failed
    DeliveryFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl PollError {
    /// The classification of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::TransportFailure,
            Self::EndpointUnavailable { .. } => ErrorKind::EndpointUnavailable,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::NoPendingEntities => ErrorKind::NoPendingEntities,
            Self::UnrecognizedStatus(_) => ErrorKind::UnrecognizedStatus,
            Self::MissingField(_) => ErrorKind::MissingField,
            Self::Delivery { .. } => ErrorKind::DeliveryFailure,
        }
    }

    /// This error followed by every underlying cause, joined with `": "`.
    pub fn report(&self) -> String {
        std::iter::successors(Some(self as &(dyn std::error::Error + 'static)), |e| e.source())
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(": ")
    }

    /// Wrap a messenger failure.
    pub fn delivery(source: impl Into<BoxError>) -> Self {
        Self::Delivery { source: source.into() }
    }
}
