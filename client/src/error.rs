//! Error types for the Prana client.
//!
//! # Design
//! Each caller-distinguishable failure gets its own variant: validation
//! errors mean the call never reached the network, `Status` means the
//! sidecar answered but with something other than 200 OK, and `Transport`
//! carries whatever the HTTP stack reported, verbatim. The proxy operations
//! (`get`, `post`, `run`) never produce `Status`; they hand back non-2xx
//! responses as values and leave status interpretation to the caller.

use thiserror::Error;
use ureq::http::uri::InvalidUri;
use ureq::http::StatusCode;

/// Errors returned by `Client` operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was empty. Raised before any network activity.
    #[error("invalid {0} value")]
    InvalidArgument(&'static str),

    /// The sidecar answered `dynamic_properties` or `hosts` with a status
    /// other than 200 OK. The response body is discarded.
    #[error("status code is not 200 OK (got {0})")]
    Status(StatusCode),

    /// The rewritten proxy target could not be parsed as a URI.
    #[error("invalid proxy uri: {0}")]
    Uri(#[from] InvalidUri),

    /// Transport-level failure from the underlying HTTP stack (connection
    /// refused, DNS, an interrupted body read).
    #[error(transparent)]
    Transport(#[from] ureq::Error),

    /// A 200 response body was not valid JSON of the expected shape.
    #[error("decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}
