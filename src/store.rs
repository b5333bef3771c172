//! Record backends the [`Executor`](crate::executor::Executor) dispatches to.

use std::collections::{BTreeMap, HashMap};

use crate::value::Value;

/// Field name to value. Keys are kept sorted so output is deterministic.
pub type Record = BTreeMap<String, Value>;

/// Errors a store reports for a lookup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound { id: i64 },

    #[error("required field not found: {field}")]
    MissingField { field: String },

    /// The backing data could not be read as records
    #[error("malformed store data: {0}")]
    Malformed(String),
}

/// Resolves the plain fields of one identified record.
pub trait Store {
    /// Returns exactly the requested `fields` of record `id`.
    ///
    /// Fails with [`StoreError::NotFound`] if there is no such record and
    /// with [`StoreError::MissingField`] if the record lacks a field.
    fn get(&self, id: i64, fields: &[&str]) -> Result<Record, StoreError>;
}

/// In-memory store of flat records keyed by id.
///
/// # Examples
///
/// ```
/// use sprig_query::store::{JsonStore, Store};
/// use sprig_query::Value;
///
/// let store = JsonStore::from_json(serde_json::json!({
///     "123": {"id": 123, "name": "Frank", "age": 23},
/// })).unwrap();
///
/// let record = store.get(123, &["name"]).unwrap();
/// assert_eq!(record["name"], Value::from("Frank"));
/// assert_eq!(record.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonStore {
    records: HashMap<i64, Record>,
}

impl JsonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: i64, record: Record) {
        self.records.insert(id, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Loads `{"<id>": {"<field>": <scalar>, ..}, ..}`.
    pub fn from_json(document: serde_json::Value) -> Result<Self, StoreError> {
        let serde_json::Value::Object(entries) = document else {
            return Err(StoreError::Malformed(
                "expected an object of records keyed by id".to_string(),
            ));
        };

        let mut store = JsonStore::new();
        for (key, entry) in entries {
            let id = key
                .trim()
                .parse::<i64>()
                .map_err(|_| StoreError::Malformed(format!("record key {key:?} is not an integer id")))?;
            let serde_json::Value::Object(fields) = entry else {
                return Err(StoreError::Malformed(format!("record {id} is not an object")));
            };

            let mut record = Record::new();
            for (field, value) in fields {
                let value = Value::from_json(value).ok_or_else(|| {
                    StoreError::Malformed(format!("field {field:?} of record {id} is not a scalar"))
                })?;
                record.insert(field, value);
            }
            store.insert(id, record);
        }
        Ok(store)
    }
}

impl Store for JsonStore {
    fn get(&self, id: i64, fields: &[&str]) -> Result<Record, StoreError> {
        let record = self.records.get(&id).ok_or(StoreError::NotFound { id })?;
        fields
            .iter()
            .map(|&field| {
                record
                    .get(field)
                    .map(|value| (field.to_string(), value.clone()))
                    .ok_or_else(|| StoreError::MissingField {
                        field: field.to_string(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_nested_values() {
        let err = JsonStore::from_json(json!({"1": {"tags": ["a"]}})).unwrap_err();
        assert!(matches!(err, StoreError::Malformed(msg) if msg.contains("tags")));
    }

    #[test]
    fn test_rejects_non_numeric_keys() {
        let err = JsonStore::from_json(json!({"frank": {}})).unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    #[test]
    fn test_missing_field() {
        let store = JsonStore::from_json(json!({"1": {"name": "Frank"}})).unwrap();
        assert_eq!(
            store.get(1, &["name", "age"]),
            Err(StoreError::MissingField {
                field: "age".to_string()
            })
        );
        assert_eq!(store.get(2, &[]), Err(StoreError::NotFound { id: 2 }));
    }
}
