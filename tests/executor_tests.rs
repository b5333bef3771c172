// tests/executor_tests.rs

use rstest::rstest;
use serde_json::json;
use sprig_query::store::{JsonStore, Record, Store, StoreError};
use sprig_query::{ExecError, Executor, Value};

fn people() -> JsonStore {
    JsonStore::from_json(json!({
        "123": {"id": 123, "name": "Frank", "age": 23, "haircolor": "Green"},
        "666": {"id": -1, "name": "Devil", "age": 2015, "haircolor": "Red"},
    }))
    .unwrap()
}

fn executor() -> Executor {
    let mut exe = Executor::new();
    exe.register("people", people()).unwrap();
    exe
}

#[rstest]
#[case("unknown(1){id,name}", 404, "store not registered: unknown\n")]
#[case("people(1){id,name}", 404, "not found\n")]
#[case("people(123){id,name}", 200, "{\"id\":123,\"name\":\"Frank\"}\n")]
#[case("people(123){age,haircolor}", 200, "{\"age\":23,\"haircolor\":\"Green\"}\n")]
#[case("people(666){name,age}", 200, "{\"age\":2015,\"name\":\"Devil\"}\n")]
#[case("people(123){shoesize}", 500, "required field not found: shoesize\n")]
fn test_respond(#[case] query: &str, #[case] status: u16, #[case] body: &str) {
    let response = executor().respond(query.as_bytes());
    assert_eq!(response.status, status, "{:?}", response);
    assert_eq!(response.body, body);
}

#[test]
fn test_parse_error_is_client_error() {
    let response = executor().respond("people(".as_bytes());
    assert_eq!(response.status, 400);
    assert!(response.body.contains("illegal function argument"));
}

#[test]
fn test_missing_id_is_client_error() {
    let err = executor().execute("people(){name}").unwrap_err();
    assert!(matches!(err, ExecError::Argument(_)));
    assert_eq!(err.status(), 400);
    assert_eq!(err.to_string(), "argument missing");
}

#[test]
fn test_only_plain_fields_are_requested() {
    // `friends` is composite, so the store is never asked for it
    let record = executor()
        .execute("people(123){name,friends{name}}")
        .unwrap();
    assert_eq!(record.keys().collect::<Vec<_>>(), vec!["name"]);
    assert_eq!(record["name"], Value::from("Frank"));
}

#[test]
fn test_register_twice() {
    let mut exe = executor();
    let err = exe.register("people", JsonStore::new()).unwrap_err();
    assert!(matches!(err, ExecError::AlreadyRegistered(name) if name == "people"));
    assert!(exe.is_registered("people"));
}

#[test]
fn test_query_is_truncated_to_limit() {
    let exe = executor().with_max_query_bytes(10);
    let err = exe.execute_reader("people(123){id,name}".as_bytes()).unwrap_err();
    // only "people(123" is read
    assert!(matches!(err, ExecError::Parse(_)));
}

#[test]
fn test_invalid_utf8_body() {
    let err = executor().execute_reader(&[0xff, 0xfe][..]).unwrap_err();
    assert_eq!(err.status(), 400);
}

struct Counter;

impl Store for Counter {
    fn get(&self, id: i64, fields: &[&str]) -> Result<Record, StoreError> {
        Ok(fields
            .iter()
            .map(|f| (f.to_string(), Value::Integer(id * f.len() as i64)))
            .collect())
    }
}

#[test]
fn test_custom_store() {
    let mut exe = Executor::new();
    exe.register("counter", Counter).unwrap();

    let response = exe.respond("counter(-2){ab,abc}".as_bytes());
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "{\"ab\":-4,\"abc\":-6}\n");
}
