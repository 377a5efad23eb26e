//! Synchronous client for the student-information service HTTP API.
//!
//! # Overview
//! `SisClient` authenticates against the service, looks up and searches
//! person records, and mutates group membership. Every operation is one
//! blocking GET round trip: format a query-string URL, fetch it, decode the
//! JSON body into a typed result.
//!
//! # Design
//! - Network I/O sits behind the `UrlFetcher` capability; the shipped
//!   `UreqFetcher` does real HTTP and tests substitute scripted stand-ins.
//! - Diagnostics go through the `SisLogger` capability, a no-op unless the
//!   caller installs a logger.
//! - Response shapes are small named DTOs in `types`; absent string fields
//!   decode as `None`.
//!
//! ```no_run
//! use sis_client::SisClient;
//!
//! # fn main() -> Result<(), sis_client::ApiError> {
//! let mut client = SisClient::new(
//!     "https://sis.example.edu/",
//!     "registrar@example.edu",
//!     "a0092ba9a9f5b45cdd2f01d049595bfe91",
//! );
//! client.authenticate()?;
//!
//! for student in client.search_people("kim smith")? {
//!     println!("{}", student.display_name());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod fetch;
pub mod logger;
pub mod types;

pub use client::SisClient;
pub use error::ApiError;
pub use fetch::{FetchError, FetchResponse, UreqFetcher, UrlFetcher};
pub use logger::{NopLogger, SisLogger, TracingLogger};
pub use types::{AckResponse, AuthResponse, Person};
