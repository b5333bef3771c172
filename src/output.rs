//! JSON rendering of resolved records and selection trees.
//!
//! Object keys always come out sorted, so output is deterministic.
//!
//! # Examples
//!
//! ```
//! use sprig_query::{Value, store::Record};
//! use sprig_query::output::to_json;
//!
//! let mut record = Record::new();
//! record.insert("name".to_string(), Value::from("Frank"));
//! record.insert("id".to_string(), Value::Integer(123));
//!
//! assert_eq!(to_json(&record), r#"{"id":123,"name":"Frank"}"#);
//! ```

use crate::{
    ast::{QueryNode, Selection},
    store::Record,
};

pub fn record_to_json(record: &Record) -> serde_json::Value {
    serde_json::Value::Object(
        record
            .iter()
            .map(|(field, value)| (field.clone(), value.to_json()))
            .collect(),
    )
}

/// Compact single-line JSON.
pub fn to_json(record: &Record) -> String {
    record_to_json(record).to_string()
}

/// Human-readable JSON with 2-space indentation.
pub fn to_json_pretty(record: &Record) -> String {
    // Serialising a `serde_json::Value` cannot fail
    serde_json::to_string_pretty(&record_to_json(record)).unwrap_or_default()
}

/// Describes a selection tree.
///
/// ```text
/// node(123){id,obj{a}}
/// ```
/// becomes
/// ```text
/// {"argument":"123","fields":{"id":null,"obj":{"fields":{"a":null},"name":"obj"}},"name":"node"}
/// ```
/// Leaves are `null`; `argument` and `calls` are omitted when absent.
pub fn tree_to_json(node: &QueryNode) -> serde_json::Value {
    let mut object = serde_json::Map::new();
    object.insert("name".to_string(), node.name().into());
    if let Some(argument) = node.argument() {
        object.insert("argument".to_string(), argument.into());
    }
    if !node.calls().is_empty() {
        let calls = node
            .calls()
            .iter()
            .map(|call| {
                let mut entry = serde_json::Map::new();
                entry.insert("name".to_string(), call.name.as_str().into());
                if let Some(argument) = &call.argument {
                    entry.insert("argument".to_string(), argument.as_str().into());
                }
                serde_json::Value::Object(entry)
            })
            .collect();
        object.insert("calls".to_string(), serde_json::Value::Array(calls));
    }
    if let Selection::Composite(children) = node.selection() {
        let fields = children
            .iter()
            .map(|(name, child)| {
                let value = if child.is_leaf() && child.argument().is_none() && child.calls().is_empty() {
                    serde_json::Value::Null
                } else {
                    tree_to_json(child)
                };
                (name.clone(), value)
            })
            .collect();
        object.insert("fields".to_string(), serde_json::Value::Object(fields));
    }
    serde_json::Value::Object(object)
}
