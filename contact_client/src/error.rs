//! Internal client failures, mapped to a status before they reach the caller

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("undecodable response (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: reqwest::Error,
    },
}
