//! The SIS client and its five operations.
//!
//! # Design
//! `SisClient` owns its configuration and the two injected capabilities.
//! Every operation follows the same shape: build a query-string URL, log
//! it, fetch it, decode the JSON body, surface any service error. The
//! session token is the only mutable state: `authenticate` takes
//! `&mut self`, so the borrow checker rules out re-authentication racing a
//! concurrent lookup on the same instance.

use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::fetch::{UreqFetcher, UrlFetcher};
use crate::logger::{NopLogger, SisLogger};
use crate::types::{AckResponse, AuthResponse, Person};

/// Synchronous, blocking client for the student-information service.
///
/// Construct with [`SisClient::new`], call [`authenticate`](Self::authenticate)
/// once, then issue lookups and group mutations. The token set by a
/// successful authentication is included in every subsequent request; the
/// client never checks it for presence or expiry, so on an auth failure the
/// caller re-authenticates and retries.
pub struct SisClient {
    base_url: String,
    email: String,
    password: String,
    token: String,
    logger: Box<dyn SisLogger>,
    fetcher: Box<dyn UrlFetcher>,
}

impl SisClient {
    /// Create a client for the service at `base_url` (including a trailing
    /// slash, e.g. `https://sis.example.edu/`). Values are stored verbatim;
    /// no request is made until an operation is called.
    pub fn new(
        base_url: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            email: email.into(),
            password: password.into(),
            token: String::new(),
            logger: Box::new(NopLogger),
            fetcher: Box::new(UreqFetcher::new()),
        }
    }

    /// Install a logger for request diagnostics.
    ///
    /// Logged request URLs contain the session token and the URL-escaped
    /// credentials in plaintext. The default logger discards everything;
    /// installing one is the opt-in to that exposure, so route the output
    /// somewhere appropriately protected.
    pub fn set_logger(&mut self, logger: Box<dyn SisLogger>) {
        self.logger = logger;
    }

    /// Replace the transport. Exists so tests can substitute a
    /// deterministic stand-in for real HTTP.
    pub fn set_fetcher(&mut self, fetcher: Box<dyn UrlFetcher>) {
        self.fetcher = fetcher;
    }

    /// The current session token; empty until `authenticate` succeeds.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Exchange the configured credentials for a session token.
    ///
    /// On success the token is stored and included in every subsequent
    /// request. On any failure the stored token is left untouched.
    pub fn authenticate(&mut self) -> Result<(), ApiError> {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("email", &self.email)
            .append_pair("password", &self.password)
            .finish();
        let url = format!("{}api/authenticate?{}", self.base_url, query);

        let body = self.fetch(&url)?;
        let result: AuthResponse = decode(&body)?;
        if !result.error.is_empty() {
            return Err(ApiError::Service(result.error));
        }
        self.token = result.token;
        Ok(())
    }

    /// Look up a person by uuid.
    pub fn get_person(&self, uuid: &str) -> Result<Person, ApiError> {
        let body = self.fetch(&self.person_url("uuid", uuid))?;
        let person: Person = decode(&body)?;
        if let Some(message) = person.service_error() {
            return Err(ApiError::Service(message.to_string()));
        }
        Ok(person)
    }

    /// Look up a person by email address.
    ///
    /// Returns `Ok(None)` when the service has no matching record (the
    /// response decodes cleanly but carries no uuid), distinguishing "no
    /// match" from an actual failure.
    pub fn get_person_by_email(&self, email: &str) -> Result<Option<Person>, ApiError> {
        let body = self.fetch(&self.person_url("email", email))?;
        let person: Person = decode(&body)?;
        if let Some(message) = person.service_error() {
            return Err(ApiError::Service(message.to_string()));
        }
        if person.uuid.as_deref().unwrap_or_default().is_empty() {
            return Ok(None);
        }
        Ok(Some(person))
    }

    /// Free-text student search. Returns matches in server order; no
    /// matches is an empty vec, not an error.
    pub fn search_people(&self, query: &str) -> Result<Vec<Person>, ApiError> {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("token", &self.token)
            .append_pair("q", query)
            .finish();
        let url = format!("{}api/student.search?{}", self.base_url, query);

        let body = self.fetch(&url)?;
        decode(&body)
    }

    /// Add a person to a group for the given intake.
    pub fn add_person_to_group(
        &self,
        person_uuid: &str,
        group: &str,
        intake_year: i32,
        intake_semester: &str,
    ) -> Result<(), ApiError> {
        self.group_call("api/group.add", person_uuid, group, intake_year, intake_semester)
    }

    /// Remove a person from a group for the given intake.
    pub fn remove_person_from_group(
        &self,
        person_uuid: &str,
        group: &str,
        intake_year: i32,
        intake_semester: &str,
    ) -> Result<(), ApiError> {
        self.group_call("api/group.remove", person_uuid, group, intake_year, intake_semester)
    }

    fn person_url(&self, key: &str, value: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("token", &self.token)
            .append_pair(key, value)
            .finish();
        format!("{}api/person?{}", self.base_url, query)
    }

    fn group_call(
        &self,
        endpoint: &str,
        person_uuid: &str,
        group: &str,
        intake_year: i32,
        intake_semester: &str,
    ) -> Result<(), ApiError> {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("token", &self.token)
            .append_pair("person", person_uuid)
            .append_pair("group", group)
            .append_pair("year", &intake_year.to_string())
            .append_pair("semester", intake_semester)
            .finish();
        let url = format!("{}{}?{}", self.base_url, endpoint, query);

        let body = self.fetch(&url)?;
        let ack: AckResponse = decode(&body)?;
        if !ack.success.is_empty() {
            return Ok(());
        }
        if ack.error.is_empty() {
            return Err(ApiError::Service(
                "service reported failure without a message".to_string(),
            ));
        }
        Err(ApiError::Service(ack.error))
    }

    fn fetch(&self, url: &str) -> Result<String, ApiError> {
        self.logger.debug(&format!("fetch: {url}"));
        let response = self.fetcher.fetch_url(url)?;
        Ok(response.body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode {
        detail: e.to_string(),
    })
}
