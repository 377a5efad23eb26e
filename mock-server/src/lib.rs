//! In-memory stand-in for the student-information service.
//!
//! Implements the five query-string GET endpoints over a seedable roster
//! and a single-session token, close enough to the real service for the
//! client's integration tests and for manual poking via the binary.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Credentials accepted by [`SisState::seeded`].
pub const DEMO_EMAIL: &str = "registrar@example.edu";
pub const DEMO_PASSWORD: &str = "letmein";

/// Wire shape of a person record: PascalCase keys, absent fields omitted.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
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

/// A roster entry: the login email the service knows a person by, plus the
/// record it serves for them. The email is lookup state, not part of the
/// wire shape.
#[derive(Clone, Debug)]
pub struct DirectoryEntry {
    pub email: String,
    pub person: Person,
}

/// (person uuid, group, year, semester)
type MembershipKey = (String, String, String, String);

pub struct SisState {
    email: String,
    password: String,
    roster: Vec<DirectoryEntry>,
    token: RwLock<Option<String>>,
    memberships: RwLock<HashSet<MembershipKey>>,
}

pub type SharedState = Arc<SisState>;

impl SisState {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        roster: Vec<DirectoryEntry>,
    ) -> SharedState {
        Arc::new(Self {
            email: email.into(),
            password: password.into(),
            roster,
            token: RwLock::new(None),
            memberships: RwLock::new(HashSet::new()),
        })
    }

    /// Demo credentials and a small roster, used by the binary and the
    /// client's integration tests.
    pub fn seeded() -> SharedState {
        let roster = vec![
            entry("kim.smith@example.edu", "s1001", "Kimberly", Some("Kim"), "Smith", "F"),
            entry("dana.jones@example.edu", "s1002", "Dana", None, "Jones", "F"),
            entry("alex.chen@example.edu", "s1003", "Alexander", Some("Alex"), "Chen", "M"),
        ];
        Self::new(DEMO_EMAIL, DEMO_PASSWORD, roster)
    }

    async fn token_valid(&self, token: &str) -> bool {
        !token.is_empty() && self.token.read().await.as_deref() == Some(token)
    }

    fn by_uuid(&self, uuid: &str) -> Option<Person> {
        self.roster
            .iter()
            .find(|e| e.person.uuid.as_deref() == Some(uuid))
            .map(|e| e.person.clone())
    }

    fn by_email(&self, email: &str) -> Option<Person> {
        self.roster
            .iter()
            .find(|e| e.email.eq_ignore_ascii_case(email))
            .map(|e| e.person.clone())
    }

    fn search(&self, query: &str) -> Vec<Person> {
        self.roster
            .iter()
            .filter(|e| matches_query(&e.person, query))
            .map(|e| e.person.clone())
            .collect()
    }
}

fn entry(
    email: &str,
    student_number: &str,
    first: &str,
    preferred: Option<&str>,
    last: &str,
    sex: &str,
) -> DirectoryEntry {
    DirectoryEntry {
        email: email.to_string(),
        person: Person {
            uuid: Some(Uuid::new_v4().to_string()),
            student_number: Some(student_number.to_string()),
            first_name: Some(first.to_string()),
            preferred_first_name: preferred.map(str::to_string),
            last_name: Some(last.to_string()),
            sex: Some(sex.to_string()),
            ..Person::default()
        },
    }
}

/// Every whitespace-separated term of the query must appear, case
/// insensitively, somewhere in the person's name fields.
fn matches_query(person: &Person, query: &str) -> bool {
    let haystack = [
        &person.first_name,
        &person.preferred_first_name,
        &person.middle_name,
        &person.last_name,
    ]
    .iter()
    .filter_map(|f| f.as_deref())
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase();

    let query = query.to_lowercase();
    let mut terms = query.split_whitespace().peekable();
    terms.peek().is_some() && terms.all(|term| haystack.contains(term))
}

fn error_person(message: &str, details: &str) -> Person {
    Person {
        error: Some(message.to_string()),
        error_details: Some(details.to_string()),
        ..Person::default()
    }
}

pub fn app(state: SharedState) -> Router {
    Router::new()
        .route("/api/authenticate", get(authenticate))
        .route("/api/person", get(person))
        .route("/api/student.search", get(search))
        .route("/api/group.add", get(group_add))
        .route("/api/group.remove", get(group_remove))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: SharedState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

#[derive(Serialize, Default)]
#[serde(rename_all = "PascalCase")]
struct AuthReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "PascalCase")]
struct AckReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl AckReply {
    fn ok() -> Self {
        Self {
            success: Some("1".to_string()),
            ..Self::default()
        }
    }

    fn failed(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
struct AuthQuery {
    email: String,
    password: String,
}

async fn authenticate(
    State(state): State<SharedState>,
    Query(q): Query<AuthQuery>,
) -> Json<AuthReply> {
    if q.email != state.email || q.password != state.password {
        return Json(AuthReply {
            error: Some("invalid credentials".to_string()),
            ..AuthReply::default()
        });
    }
    let token = Uuid::new_v4().simple().to_string();
    *state.token.write().await = Some(token.clone());
    Json(AuthReply {
        token: Some(token),
        ..AuthReply::default()
    })
}

#[derive(Deserialize)]
struct PersonQuery {
    #[serde(default)]
    token: String,
    uuid: Option<String>,
    email: Option<String>,
}

async fn person(State(state): State<SharedState>, Query(q): Query<PersonQuery>) -> Json<Person> {
    if !state.token_valid(&q.token).await {
        return Json(error_person("invalid token", "authenticate first"));
    }
    if let Some(uuid) = q.uuid.as_deref() {
        return match state.by_uuid(uuid) {
            Some(person) => Json(person),
            None => Json(error_person("person not found", uuid)),
        };
    }
    if let Some(email) = q.email.as_deref() {
        // No match by email is not a failure: the service answers with an
        // empty record, which clients treat as a not-found sentinel.
        return Json(state.by_email(email).unwrap_or_default());
    }
    Json(error_person("missing parameter", "uuid or email required"))
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    token: String,
    #[serde(default)]
    q: String,
}

async fn search(
    State(state): State<SharedState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Person>> {
    // The search endpoint has no error channel; an unknown token simply
    // finds nothing.
    if !state.token_valid(&query.token).await {
        return Json(Vec::new());
    }
    Json(state.search(&query.q))
}

#[derive(Deserialize)]
struct GroupQuery {
    #[serde(default)]
    token: String,
    person: String,
    group: String,
    year: String,
    semester: String,
}

impl GroupQuery {
    fn key(&self) -> MembershipKey {
        (
            self.person.clone(),
            self.group.clone(),
            self.year.clone(),
            self.semester.clone(),
        )
    }
}

async fn group_add(State(state): State<SharedState>, Query(q): Query<GroupQuery>) -> Json<AckReply> {
    if !state.token_valid(&q.token).await {
        return Json(AckReply::failed("invalid token"));
    }
    if state.by_uuid(&q.person).is_none() {
        return Json(AckReply::failed("person not found"));
    }
    if !state.memberships.write().await.insert(q.key()) {
        return Json(AckReply::failed("already in group"));
    }
    Json(AckReply::ok())
}

async fn group_remove(
    State(state): State<SharedState>,
    Query(q): Query<GroupQuery>,
) -> Json<AckReply> {
    if !state.token_valid(&q.token).await {
        return Json(AckReply::failed("invalid token"));
    }
    if !state.memberships.write().await.remove(&q.key()) {
        return Json(AckReply::failed("not in group"));
    }
    Json(AckReply::ok())
}
