use std::time::Duration;

use thiserror::Error;

/// Failure to obtain a route from the provider.
///
/// Every variant is recovered by the straight-line fallback in
/// [`crate::RouteAdvisor`].
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("routing provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("routing provider HTTP {0}")]
    Status(u16),
    #[error("routing provider returned code '{code}': {message}")]
    Provider { code: String, message: String },
    #[error("malformed routing response: {0}")]
    Malformed(String),
    #[error("routing provider did not answer within {0:?}")]
    Timeout(Duration),
}
