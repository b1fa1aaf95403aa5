//! Ticket and note operations against a mock Web Help Desk.

mod common;

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};
use whd::models::CustomField;
use whd::{Credentials, ListQuery, Ticket, WhdError};
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{api, client, client_with, API_KEY};

#[tokio::test]
async fn get_ticket_sends_api_key_and_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("Ticket/1234")))
        .and(query_param("apiKey", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1234,
            "type": "JobTicket",
            "subject": "Printer jammed",
            "detail": "Tray 2",
            "location": {"id": 2, "type": "Location", "locationName": "ATL"},
            "ticketCustomFields": [{"definitionId": 7, "restValue": "East"}],
            "emailClient": true,
            "somethingNew": {"ignored": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = assert_ok!(client(&server).get_ticket(1234).await);
    assert_eq!(ticket.id, Some(1234));
    assert_eq!(ticket.display_subject(), "Printer jammed");
    assert_eq!(ticket.location.as_ref().map(|l| l.display_name()), Some("ATL"));
    assert_eq!(ticket.custom_fields, vec![CustomField::new(7, "East")]);
    assert!(ticket.email_client);
}

#[tokio::test]
async fn password_credentials_go_in_the_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("Ticket/5")))
        .and(query_param("username", "tech"))
        .and(query_param("password", "s3cret"))
        .and(query_param_is_missing("apiKey"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_with(&server, Credentials::password("tech", "s3cret"), 0);
    let ticket = assert_ok!(client.get_ticket(5).await);
    assert_eq!(ticket.id, Some(5));
}

#[tokio::test]
async fn missing_ticket_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("Ticket/9")))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).get_ticket(9).await);
    match err {
        WhdError::NotFound { resource } => assert_eq!(resource, "ticket 9"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn bad_credentials_are_an_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("Ticket/9")))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).get_ticket(9).await);
    assert!(matches!(err, WhdError::Authentication));
}

#[tokio::test]
async fn get_tickets_normalises_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("Tickets")))
        .and(query_param("qualifier", "(statustype.statusTypeName = 'Open')"))
        .and(query_param("limit", "100"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "subject": "one"},
            {"id": 2, "subject": "two"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let query = ListQuery::new("(statustype.statusTypeName = 'Open')")
        .with_limit(500)
        .with_page(0);
    let tickets = assert_ok!(client(&server).get_tickets(&query).await);
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[1].display_subject(), "two");
}

#[tokio::test]
async fn create_ticket_posts_cleaned_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("Ticket")))
        .and(query_param("apiKey", API_KEY))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 77, "type": "JobTicket"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut ticket = Ticket::new("Printer jammed", "Tray 2");
    ticket.location_id = Some(3);
    ticket.status_type_id = Some(1);
    ticket.report_date_utc = Some("2021-05-30T08:00:00Z".to_string());
    ticket.custom_fields = vec![CustomField::new(1, "East"), CustomField::new(2, "")];

    let id = assert_ok!(client(&server).create_update_ticket(&ticket).await);
    assert_eq!(id, 77);

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body["location"], json!({"id": 3, "type": "Location"}));
    assert_eq!(body["statustype"], json!({"id": 1, "type": "StatusType"}));
    assert_eq!(body["customFields"], json!([{"definitionId": 1, "restValue": "East"}]));
    assert_eq!(body["emailClient"], json!(false));
    assert!(body.get("ticketCustomFields").is_none());
    assert!(body.get("reportDateUtc").is_none());
    assert!(body.get("prioritytype").is_none());
}

#[tokio::test]
async fn update_ticket_puts_to_its_id() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(api("Ticket/55")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 55})))
        .expect(1)
        .mount(&server)
        .await;

    let ticket = Ticket {
        id: Some(55),
        subject: Some("Updated".to_string()),
        ..Default::default()
    };
    let id = assert_ok!(client(&server).create_update_ticket(&ticket).await);
    assert_eq!(id, 55);
}

#[tokio::test]
async fn rejected_ticket_reports_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("Ticket")))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"reason": "Request type is required"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = assert_err!(
        client(&server)
            .create_update_ticket(&Ticket::new("x", "y"))
            .await
    );
    match err {
        WhdError::Rejected { reason } => assert_eq!(reason, "Request type is required"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn create_note_posts_visible_note() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("TechNotes")))
        .and(body_json(json!({
            "noteText": "Replaced the toner",
            "isHidden": false,
            "isTechNote": false,
            "jobticket": {"id": 42, "type": "JobTicket"}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": 901, "type": "TechNote"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let id = assert_ok!(client(&server).create_note(42, "Replaced the toner").await);
    assert_eq!(id, 901);
}

#[tokio::test]
async fn create_hidden_note_sets_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("TechNotes")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 902})))
        .expect(1)
        .mount(&server)
        .await;

    assert_ok!(client(&server).create_hidden_note(42, "internal only").await);

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body["isHidden"], json!(true));
    assert_eq!(body["noteText"], json!("internal only"));
}

#[tokio::test]
async fn note_with_reason_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("TechNotes")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"reason": "Ticket is closed"})),
        )
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).create_note(42, "late").await);
    assert_eq!(err.to_string(), "rejected by WHD: Ticket is closed");
}

#[tokio::test]
async fn get_notes_asks_for_ticket_notes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api("TicketNotes")))
        .and(query_param("jobTicketId", "42"))
        .and(query_param("limit", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "mobileNoteText": "first", "isHidden": false},
            {"id": 2, "mobileNoteText": "second", "isHidden": true}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let notes = assert_ok!(client(&server).get_notes(42).await);
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].display_text(), "first");
    assert!(notes[1].is_hidden);
}

#[tokio::test]
async fn empty_note_is_refused_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api("TechNotes")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(0)
        .mount(&server)
        .await;

    let err = assert_err!(client(&server).create_note(42, "   ").await);
    assert!(matches!(err, WhdError::Validation(_)));
}
