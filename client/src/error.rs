//! Error types for the SIS client.
//!
//! # Design
//! Three kinds, none retried internally: the transport failed, the body did
//! not decode, or the decoded body carried the service's own error message.
//! "No match" on an email lookup is not an error; `get_person_by_email`
//! returns `Ok(None)` for that case.

use thiserror::Error;

use crate::fetch::FetchError;

/// Errors returned by `SisClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The fetch failed before a response body was produced.
    #[error(transparent)]
    Transport(#[from] FetchError),

    /// The response body was not valid JSON for the expected shape.
    #[error("server returned unexpected response: {detail}")]
    Decode { detail: String },

    /// The service answered with an error message of its own.
    #[error("{0}")]
    Service(String),
}
