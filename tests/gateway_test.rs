mod common;

use chrono::{TimeZone, Utc};
use common::{FakeTransport, config, posted_lines};
use endomondo_sync::gateway::{DETAIL_FIELDS, Workouts};
use endomondo_sync::transport::Method;
use endomondo_sync::types::WorkoutId;
use endomondo_sync::{Error, Session, TransportError};
use serde_json::{Value as JsonValue, json};

const DETAIL: &str = include_str!("fixtures/workout_detail.json");
const LIST: &str = include_str!("fixtures/workout_list.json");

fn gateway(transport: &FakeTransport) -> Workouts<&FakeTransport> {
    Workouts::new(Session::with_token("token"), transport, config())
}

#[test]
fn get_workout_auth_failure_is_bad_response() {
    let transport = FakeTransport::new().reply(r#"{"error":{"type":"AUTH_FAILED"}}"#);
    let err = gateway(&transport)
        .get_workout(&WorkoutId::new("123456"))
        .unwrap_err();

    match err {
        Error::BadResponse(payload) => assert_eq!(payload, json!({"type": "AUTH_FAILED"})),
        other => panic!("expected BadResponse, got {other:?}"),
    }
}

#[test]
fn get_workout_returns_payload_verbatim() {
    let transport = FakeTransport::new().reply(DETAIL);
    let json = gateway(&transport)
        .get_workout(&WorkoutId::new("123456"))
        .unwrap();

    let expected: JsonValue = serde_json::from_str(DETAIL).unwrap();
    assert_eq!(json, expected);

    let req = &transport.requests()[0];
    assert_eq!(req.method, Method::Get);
    assert_eq!(req.url, "http://endomondo.test/mobile/api/workout/get");
    assert_eq!(req.query_value("authToken"), Some("token"));
    assert_eq!(req.query_value("workoutId"), Some("123456"));
    assert_eq!(req.query_value("fields"), Some(DETAIL_FIELDS));
    assert!(DETAIL_FIELDS.contains("hr_zones"));
    assert!(DETAIL_FIELDS.contains("points"));
}

#[test]
fn get_workout_with_garbage_body_is_payload_error() {
    let transport = FakeTransport::new().reply("<html>maintenance</html>");
    let err = gateway(&transport)
        .get_workout(&WorkoutId::new("1"))
        .unwrap_err();
    assert!(matches!(err, Error::Payload(_)));
}

#[test]
fn list_workouts_returns_data_array() {
    let transport = FakeTransport::new().reply(LIST);
    let start = Utc.with_ymd_and_hms(2014, 7, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2014, 7, 31, 23, 59, 59).unwrap();
    let data = gateway(&transport).list_workouts(start, end).unwrap();

    let expected: JsonValue = serde_json::from_str(LIST).unwrap();
    assert_eq!(JsonValue::Array(data), expected["data"]);

    let req = &transport.requests()[0];
    assert_eq!(req.url, "http://endomondo.test/mobile/api/workouts");
    assert_eq!(req.query_value("fields"), Some("simple"));
    assert_eq!(req.query_value("maxResults"), Some("100000"));
    assert_eq!(req.query_value("after"), Some("2014-07-01 00:00:00 UTC"));
    assert_eq!(req.query_value("before"), Some("2014-07-31 23:59:59 UTC"));
}

#[test]
fn list_bounds_are_normalized_to_utc() {
    let transport = FakeTransport::new().reply(r#"{"data":[]}"#);
    let start = chrono::DateTime::parse_from_rfc3339("2016-01-01T02:00:00+02:00")
        .unwrap()
        .with_timezone(&Utc);
    let data = gateway(&transport).list_workouts(start, start).unwrap();
    assert!(data.is_empty());
    assert_eq!(
        transport.requests()[0].query_value("after"),
        Some("2016-01-01 00:00:00 UTC")
    );
}

#[test]
fn list_workouts_auth_failure_is_bad_response() {
    let transport = FakeTransport::new().reply(r#"{"error":{"type":"AUTH_FAILED"}}"#);
    let start = Utc.with_ymd_and_hms(2014, 7, 1, 0, 0, 0).unwrap();
    let err = gateway(&transport).list_workouts(start, start).unwrap_err();

    match err {
        Error::BadResponse(payload) => assert_eq!(payload, json!({"type": "AUTH_FAILED"})),
        other => panic!("expected BadResponse, got {other:?}"),
    }
}

#[test]
fn list_workouts_without_data_is_payload_error() {
    let transport = FakeTransport::new().reply(r#"{"more":false}"#);
    let start = Utc.with_ymd_and_hms(2014, 7, 1, 0, 0, 0).unwrap();
    let err = gateway(&transport).list_workouts(start, start).unwrap_err();
    assert!(matches!(err, Error::Payload(_)));
}

#[test]
fn null_error_field_is_not_a_failure() {
    let body = r#"{"error":null,"id":7,"sport":0,"data":[{"id":1}]}"#;
    let transport = FakeTransport::new().reply(body).reply(body);
    let gateway = gateway(&transport);

    let detail = gateway.get_workout(&WorkoutId::new("7")).unwrap();
    assert_eq!(detail["id"], 7);

    let start = Utc.with_ymd_and_hms(2014, 7, 1, 0, 0, 0).unwrap();
    let data = gateway.list_workouts(start, start).unwrap();
    assert_eq!(data, vec![json!({"id": 1})]);
}

#[test]
fn post_track_batch_sends_gzip_lines() {
    let transport = FakeTransport::new().reply("OK\nworkout.id=987\n");
    let lines = vec!["a;1;".to_string(), "b;2;".to_string()];
    let id = gateway(&transport)
        .post_track_batch("-0123456789012345678", 0, 3600, &lines)
        .unwrap();
    assert_eq!(id, WorkoutId::new("987"));

    let req = &transport.requests()[0];
    assert_eq!(req.method, Method::Post);
    assert_eq!(req.url, "http://endomondo.test/mobile/track");
    assert_eq!(posted_lines(req), lines);
    for (key, value) in [
        ("authToken", "token"),
        ("gzip", "true"),
        ("workoutId", "-0123456789012345678"),
        ("sport", "0"),
        ("duration", "3600"),
        ("audioMessage", "false"),
        ("goalType", "BASIC"),
        ("extendedResponse", "true"),
    ] {
        assert_eq!(req.query_value(key), Some(value), "{key}");
    }
    assert!(
        req.headers
            .iter()
            .any(|(k, v)| k == "Content-Type" && v == "application/octet-stream")
    );
}

#[test]
fn post_track_batch_without_workout_id_is_unexpected() {
    let transport = FakeTransport::new().reply("ERROR\nreason=bad data\n");
    let err = gateway(&transport)
        .post_track_batch("-1", 0, 0, &[])
        .unwrap_err();
    match err {
        Error::UnexpectedResponse(body) => assert!(body.contains("bad data")),
        other => panic!("expected UnexpectedResponse, got {other:?}"),
    }
    assert!(
        Error::UnexpectedResponse(String::new())
            .to_string()
            .contains("partially uploaded")
    );
}

#[test]
fn transport_errors_are_not_wrapped() {
    let transport = FakeTransport::new().fail_status(500);
    let err = gateway(&transport)
        .post_track_batch("-1", 0, 0, &[])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::Status { status: 500, .. })
    ));
}
