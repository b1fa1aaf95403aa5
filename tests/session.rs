//! Retry behaviour and session handling.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use whd::{Credentials, WhdError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{api, client, client_with, API_KEY};

#[tokio::test]
async fn transient_failure_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("Ticket/1")))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("Ticket/1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = assert_ok!(client(&server).get_ticket(1).await);
    assert_eq!(ticket.id, Some(1));
}

#[tokio::test]
async fn rate_limit_with_retry_after_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("Ticket/1")))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("Ticket/1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(client(&server).get_ticket(1).await);
}

#[tokio::test]
async fn retries_stop_after_retry_max() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("Ticket/1")))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_with(&server, Credentials::api_key(API_KEY), 2);
    let err = assert_err!(client.get_ticket(1).await);
    assert!(matches!(err, WhdError::ServiceUnavailable { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn not_implemented_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("Ticket/1")))
        .respond_with(ResponseTemplate::new(501).set_body_string("nope"))
        .expect(1)
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).get_ticket(1).await);
    match err {
        WhdError::HttpStatus { status, body } => {
            assert_eq!(status.as_u16(), 501);
            assert_eq!(body, "nope");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("Ticket/1")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).get_ticket(1).await);
    match err {
        WhdError::Decode { body, .. } => assert_eq!(body, "<html>login</html>"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn get_session_key_reads_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("Session")))
        .and(query_param("apiKey", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "Session",
            "sessionKey": "SK-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let key = assert_ok!(client(&server).get_session_key().await);
    assert_eq!(key, "SK-1");
}

#[tokio::test]
async fn session_without_key_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("Session")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"type": "Session"})))
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).get_session_key().await);
    assert!(matches!(err, WhdError::Session(_)));
}

#[tokio::test]
async fn terminate_session_expects_ok() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(api("Session")))
        .and(query_param("sessionKey", "SK-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api("Session")))
        .and(query_param("sessionKey", "SK-2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Session not found"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    assert_ok!(client.terminate_session("SK-1").await);

    let err = assert_err!(client.terminate_session("SK-2").await);
    match err {
        WhdError::Session(message) => assert!(message.contains("Session not found")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn terminate_session_error_status_is_session_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(api("Session")))
        .and(query_param("sessionKey", "SK-3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Session expired"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(api("Session")))
        .and(query_param("sessionKey", "SK-4"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, Credentials::api_key(API_KEY), 0);

    let err = assert_err!(client.terminate_session("SK-3").await);
    match err {
        WhdError::Session(message) => assert!(message.contains("Session expired")),
        other => panic!("unexpected error: {other:?}"),
    }

    let err = assert_err!(client.terminate_session("SK-4").await);
    assert!(matches!(err, WhdError::Session(_)));
}

#[tokio::test]
async fn start_session_switches_to_session_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("Session")))
        .and(query_param("username", "tech"))
        .and(query_param("password", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sessionKey": "SK-9"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api("Ticket/3")))
        .and(query_param("username", "tech"))
        .and(query_param("sessionKey", "SK-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, Credentials::password("tech", "s3cret"), 0);
    let session = assert_ok!(client.start_session().await);
    assert_eq!(
        session.credentials(),
        &Credentials::session_key(Some("tech".to_string()), "SK-9")
    );
    assert_ok!(session.get_ticket(3).await);
}

#[tokio::test]
async fn test_connection_reports_bad_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("PriorityTypes")))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).test_connection().await);
    assert!(err.to_string().contains("authentication failed"));
}
