use crate::notify::Notification;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Recommend,
    MarketTrends,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Recommend => "/recommend",
            Endpoint::MarketTrends => "/market-trends",
        }
    }

    fn service_failure_message(self) -> &'static str {
        match self {
            Endpoint::Recommend => "Something went wrong with the request.",
            Endpoint::MarketTrends => "Failed to fetch market trends. Please try again.",
        }
    }
}

/// Failure of a single call to the recommendation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// No response reached us (connect refused, DNS, timeout, dropped body).
    Transport { endpoint: Endpoint, detail: String },
    /// A response arrived but signals failure: non-2xx status, or a body that
    /// does not decode into the expected shape.
    Service {
        endpoint: Endpoint,
        status: u16,
        detail: String,
    },
}

impl ClientError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            ClientError::Transport { endpoint, .. } | ClientError::Service { endpoint, .. } => {
                *endpoint
            }
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }

    pub fn notification(&self) -> Notification {
        match self {
            ClientError::Transport { detail, .. } => Notification::destructive(
                "Network Error",
                format!("Could not connect to the server: {detail}"),
            ),
            ClientError::Service { endpoint, .. } => {
                Notification::destructive("API Error", endpoint.service_failure_message())
            }
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport { endpoint, detail } => {
                write!(f, "transport error (endpoint={}): {detail}", endpoint.path())
            }
            ClientError::Service {
                endpoint,
                status,
                detail,
            } => write!(
                f,
                "service error (endpoint={}, status={status}): {detail}",
                endpoint.path()
            ),
        }
    }
}

impl std::error::Error for ClientError {}

/// Flattens an error and its sources into one line.
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause = cause.to_string();
        if !out.contains(&cause) {
            out.push_str(": ");
            out.push_str(&cause);
        }
        source = source.and_then(|s| s.source());
    }
    out
}
