// tests/cli_tests.rs

use std::io::Write;

use serde_json::json;
use sprig_query::cli::{
    execute_check, execute_run, load_executor, CheckOptions, CheckResult, CliError, RunOptions,
};
use sprig_query::{ExecError, Value};
use tempfile::NamedTempFile;

fn data_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const DATA: &str = r#"{
    "people": {
        "123": {"id": 123, "name": "Frank", "age": 23},
        "7": {"id": 7, "name": "Ada", "age": 36}
    },
    "cities": {
        "1": {"name": "Lisbon", "population": 545000.5}
    }
}"#;

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_tree() {
    let options = CheckOptions {
        query: "node(123){id,obj{a}}".to_string(),
        ..Default::default()
    };

    match execute_check(&options).unwrap() {
        CheckResult::Tree(tree) => assert_eq!(
            tree,
            json!({
                "name": "node",
                "argument": "123",
                "fields": {
                    "id": null,
                    "obj": {"name": "obj", "fields": {"a": null}}
                }
            })
        ),
        other => panic!("expected tree, got {:?}", other),
    }
}

#[test]
fn test_check_tree_with_calls() {
    let options = CheckOptions {
        query: "friends.first(2){name}".to_string(),
        ..Default::default()
    };

    let CheckResult::Tree(tree) = execute_check(&options).unwrap() else {
        panic!("expected tree");
    };
    assert_eq!(tree["calls"], json!([{"name": "first", "argument": "2"}]));
    assert!(tree.get("argument").is_none());
}

#[test]
fn test_check_tokens() {
    let options = CheckOptions {
        query: "node(1){id}".to_string(),
        tokens: true,
        ..Default::default()
    };

    let CheckResult::Tokens(tokens) = execute_check(&options).unwrap() else {
        panic!("expected tokens");
    };
    assert_eq!(tokens.len(), 8);
    assert_eq!(tokens[0], "<object name> \"node\"");
    assert_eq!(tokens[5], "<field name> \"id\"");
    assert_eq!(tokens[7], "EOF");
}

#[test]
fn test_check_tokens_shows_lexer_error() {
    let options = CheckOptions {
        query: "node(".to_string(),
        tokens: true,
        ..Default::default()
    };

    let CheckResult::Tokens(tokens) = execute_check(&options).unwrap() else {
        panic!("expected tokens");
    };
    assert_eq!(tokens.last().unwrap(), "illegal function argument");
}

#[test]
fn test_check_rejects_invalid_query() {
    let options = CheckOptions {
        query: "node(1){a{b}".to_string(),
        ..Default::default()
    };
    let err = execute_check(&options).unwrap_err();
    assert!(matches!(err, CliError::Parse(_)));
    assert!(err.to_string().starts_with("Parse error: unexpected end of input"));
}

#[test]
fn test_check_max_depth() {
    let options = CheckOptions {
        query: "node(1){a{b{c}}}".to_string(),
        max_depth: Some(2),
        ..Default::default()
    };
    assert!(execute_check(&options).is_err());
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_run() {
    let file = data_file(DATA);
    let options = RunOptions {
        query: "people(7){name,age}\n".to_string(),
        data: file.path().to_path_buf(),
        max_depth: None,
    };

    let record = execute_run(&options).unwrap();
    assert_eq!(record["name"], Value::from("Ada"));
    assert_eq!(record["age"], Value::Integer(36));
}

#[test]
fn test_run_float_values() {
    let file = data_file(DATA);
    let options = RunOptions {
        query: "cities(1){population}".to_string(),
        data: file.path().to_path_buf(),
        max_depth: None,
    };

    let record = execute_run(&options).unwrap();
    assert_eq!(record["population"], Value::Float(545000.5));
}

#[test]
fn test_run_unknown_store() {
    let file = data_file(DATA);
    let options = RunOptions {
        query: "planets(1){name}".to_string(),
        data: file.path().to_path_buf(),
        max_depth: None,
    };

    let err = execute_run(&options).unwrap_err();
    assert!(matches!(err, CliError::Exec(ExecError::UnknownStore(name)) if name == "planets"));
}

#[test]
fn test_load_executor_registers_every_store() {
    let file = data_file(DATA);
    let executor = load_executor(file.path()).unwrap();
    assert!(executor.is_registered("people"));
    assert!(executor.is_registered("cities"));
    assert!(!executor.is_registered("planets"));
}

#[test]
fn test_load_executor_bad_json() {
    let file = data_file("{ not json");
    assert!(matches!(load_executor(file.path()), Err(CliError::Json(_))));
}

#[test]
fn test_load_executor_nested_values() {
    let file = data_file(r#"{"people": {"1": {"tags": ["a", "b"]}}}"#);
    assert!(matches!(load_executor(file.path()), Err(CliError::Store(_))));
}
