//! Full session lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP through the default ureq transport. Validates
//! that URL construction, escaping, and response decoding work end-to-end
//! with an actual server.

use sis_client::{ApiError, SisClient};

/// Start the seeded mock server on a random port and return its address.
fn spawn_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, mock_server::SisState::seeded()).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn authenticated_session_lifecycle() {
    let addr = spawn_server();
    let mut client = SisClient::new(
        format!("http://{addr}/"),
        mock_server::DEMO_EMAIL,
        mock_server::DEMO_PASSWORD,
    );

    // Step 1: authenticate and obtain a session token.
    client.authenticate().unwrap();
    assert!(!client.token().is_empty());

    // Step 2: search finds the one seeded Smith.
    let students = client.search_people("kim smith").unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0].display_name(), "Kim Smith");
    let uuid = students[0].uuid.clone().unwrap();

    // Step 3: direct lookup by uuid.
    let person = client.get_person(&uuid).unwrap();
    assert_eq!(person.student_number.as_deref(), Some("s1001"));

    // Step 4: unknown uuid is a service error.
    let err = client.get_person("no-such-uuid").unwrap_err();
    assert!(matches!(err, ApiError::Service(_)));
    assert_eq!(err.to_string(), "person not found");

    // Step 5: email lookup, hit and miss.
    let by_email = client
        .get_person_by_email("kim.smith@example.edu")
        .unwrap()
        .expect("seeded record");
    assert_eq!(by_email.uuid.as_deref(), Some(uuid.as_str()));
    assert!(client
        .get_person_by_email("nobody@example.edu")
        .unwrap()
        .is_none());

    // Step 6: search with no matches is an empty vec, not an error.
    assert!(client.search_people("zzzz").unwrap().is_empty());

    // Step 7: group membership round trip.
    client
        .add_person_to_group(&uuid, "BIO 101", 2024, "S1")
        .unwrap();
    client
        .remove_person_from_group(&uuid, "BIO 101", 2024, "S1")
        .unwrap();

    // Step 8: removing again fails with the service's message.
    let err = client
        .remove_person_from_group(&uuid, "BIO 101", 2024, "S1")
        .unwrap_err();
    assert_eq!(err.to_string(), "not in group");
}

#[test]
fn bad_credentials_leave_client_unauthenticated() {
    let addr = spawn_server();
    let mut client = SisClient::new(
        format!("http://{addr}/"),
        mock_server::DEMO_EMAIL,
        "not the password",
    );

    let err = client.authenticate().unwrap_err();
    assert!(matches!(err, ApiError::Service(_)));
    assert_eq!(err.to_string(), "invalid credentials");
    assert_eq!(client.token(), "");

    // Calls without a token still round-trip; the service answers with its
    // own error body.
    let err = client.get_person("anything").unwrap_err();
    assert_eq!(err.to_string(), "invalid token");
}

#[test]
fn unreachable_server_is_a_transport_error() {
    // Bind then drop a listener so the port is very likely closed.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let mut client = SisClient::new(format!("http://{addr}/"), "a@example.edu", "pw");
    let err = client.authenticate().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
