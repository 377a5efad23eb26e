//! Response DTOs for the student-information service.
//!
//! # Design
//! The service speaks PascalCase JSON and leaves empty fields out of the
//! body, so every string field on `Person` is an `Option` that is skipped
//! on serialization and defaults to `None` on decode. The auth and ack
//! endpoints get their own named shapes instead of being decoded ad hoc.

use serde::{Deserialize, Serialize};

/// A student/staff record returned by the service.
///
/// A single-record lookup that fails server-side comes back as a `Person`
/// whose `error`/`error_details` fields carry the failure instead of data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Person {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl Person {
    /// Name suitable for display: the preferred first name when present,
    /// otherwise the first name, followed by the last name. Absent parts
    /// are skipped.
    pub fn display_name(&self) -> String {
        let first = non_empty(&self.preferred_first_name).or_else(|| non_empty(&self.first_name));
        match (first, non_empty(&self.last_name)) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => String::new(),
        }
    }

    /// Non-empty service error carried by this record, if any.
    pub fn service_error(&self) -> Option<&str> {
        non_empty(&self.error)
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Body of `api/authenticate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AuthResponse {
    pub token: String,
    pub error: String,
}

/// Body of the `api/group.add` / `api/group.remove` mutation endpoints.
/// Success is signaled by a non-empty `success` string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AckResponse {
    pub success: String,
    pub error: String,
}
