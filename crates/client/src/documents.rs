//! Batch document envelopes.
//!
//! Add and delete operations are submitted to the document service as a JSON
//! array of operations. Every batch built here holds exactly one operation.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dialect::QueryDialect;
use crate::error::DocumentError;
use crate::search::compiler::format_timestamp;

/// Content type of a document batch.
pub const CONTENT_TYPE: &str = "application/json";

/// Document fields in insertion order.
pub type Fields = IndexMap<String, FieldValue>;

/// A document field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Submitted as an empty string.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// Floating-point value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Submitted as `YYYY-MM-DDTHH:MM:SSZ`.
    DateTime(DateTime<Utc>),
    /// Multi-valued field.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Converts dates to UTC timestamp strings and nulls to empty strings.
    pub fn normalized(self) -> Self {
        match self {
            FieldValue::Null => FieldValue::Text(String::new()),
            FieldValue::DateTime(dt) => FieldValue::Text(format_timestamp(&dt)),
            FieldValue::List(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::normalized).collect())
            }
            other => other,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Integer(n.into())
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Float(n)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(dt: DateTime<Utc>) -> Self {
        FieldValue::DateTime(dt)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => FieldValue::Text(s),
            Value::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from).collect())
            }
            object @ Value::Object(_) => FieldValue::Text(object.to_string()),
        }
    }
}

/// Builds [`Fields`] from a JSON object. Non-object values yield `None`.
pub fn fields_from_json(value: Value) -> Option<Fields> {
    match value {
        Value::Object(map) => Some(
            map.into_iter()
                .map(|(k, v)| (k, FieldValue::from(v)))
                .collect(),
        ),
        _ => None,
    }
}

/// A single batch operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DocumentOperation {
    /// Add or replace a document.
    Add {
        /// Document id.
        id: String,
        /// Document version (`2011-02-01` only).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<i64>,
        /// Language tag (`2011-02-01` only).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        /// Normalized field values.
        fields: Fields,
    },
    /// Delete a document.
    Delete {
        /// Document id.
        id: String,
        /// Document version (`2011-02-01` only).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version: Option<i64>,
    },
}

impl DocumentOperation {
    /// Builds a normalized add operation.
    pub fn add(
        id: impl Into<String>,
        fields: Fields,
        dialect: &dyn QueryDialect,
        now: DateTime<Utc>,
    ) -> Self {
        DocumentOperation::Add {
            id: id.into(),
            version: dialect.document_version(now),
            lang: dialect.document_lang().map(str::to_string),
            fields: fields
                .into_iter()
                .map(|(name, value)| (name, value.normalized()))
                .collect(),
        }
    }

    /// Builds a delete operation.
    pub fn delete(id: impl Into<String>, dialect: &dyn QueryDialect, now: DateTime<Utc>) -> Self {
        DocumentOperation::Delete {
            id: id.into(),
            version: dialect.document_version(now),
        }
    }

    /// The document id.
    pub fn id(&self) -> &str {
        match self {
            DocumentOperation::Add { id, .. } | DocumentOperation::Delete { id, .. } => id,
        }
    }
}

/// A batch of document operations, serialized as a JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentBatch(Vec<DocumentOperation>);

impl DocumentBatch {
    /// A single-element batch adding `id` with `fields`.
    pub fn add(id: impl Into<String>, fields: Fields, dialect: &dyn QueryDialect) -> Self {
        Self(vec![DocumentOperation::add(id, fields, dialect, Utc::now())])
    }

    /// A single-element batch deleting `id`.
    pub fn delete(id: impl Into<String>, dialect: &dyn QueryDialect) -> Self {
        Self(vec![DocumentOperation::delete(id, dialect, Utc::now())])
    }

    /// The operations in this batch.
    pub fn operations(&self) -> &[DocumentOperation] {
        &self.0
    }

    /// Serializes the batch body.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string(&self.0).map_err(|e| DocumentError::Serialization {
            message: e.to_string(),
        })
    }

    /// Content type to send the body with.
    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }
}

impl From<DocumentOperation> for DocumentBatch {
    fn from(operation: DocumentOperation) -> Self {
        Self(vec![operation])
    }
}

/// A message attached to a batch response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchMessage {
    /// Message text.
    #[serde(default)]
    pub message: String,
}

/// The document service's answer to a batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchResponse {
    /// `"success"` or `"error"`.
    #[serde(default)]
    pub status: String,
    /// Number of documents added.
    #[serde(default)]
    pub adds: u64,
    /// Number of documents deleted.
    #[serde(default)]
    pub deletes: u64,
    /// Errors reported for the batch.
    #[serde(default)]
    pub errors: Vec<BatchMessage>,
    /// Warnings reported for the batch.
    #[serde(default)]
    pub warnings: Vec<BatchMessage>,
}

impl BatchResponse {
    /// Returns `true` if the service reported success.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiVersion;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_structured_add_envelope() {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), "Bob".into());
        fields.insert("nickname".to_string(), FieldValue::Null);
        fields.insert(
            "joined".to_string(),
            Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap().into(),
        );

        let op = DocumentOperation::add("4", fields, ApiVersion::Structured.dialect(), now());
        let body = serde_json::to_value(DocumentBatch::from(op)).unwrap();
        assert_eq!(
            body,
            json!([{
                "type": "add",
                "id": "4",
                "fields": {"name": "Bob", "nickname": "", "joined": "2020-01-02T03:04:05Z"}
            }])
        );
    }

    #[test]
    fn test_add_envelope_deserializes_to_same_batch() {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), "X".into());
        fields.insert("gone".to_string(), FieldValue::Null);
        fields.insert(
            "at".to_string(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().into(),
        );
        fields.insert("n".to_string(), 2.0_f64.into());
        fields.insert("tags".to_string(), vec!["a", "b"].into());

        for version in [ApiVersion::Legacy, ApiVersion::Structured] {
            let operation = DocumentOperation::add("4", fields.clone(), version.dialect(), now());
            let batch = DocumentBatch::from(operation);
            let back: DocumentBatch = serde_json::from_str(&batch.to_json().unwrap()).unwrap();
            assert_eq!(back, batch);
            assert_eq!(back.operations().len(), 1);

            let DocumentOperation::Add { id, fields, .. } = &back.operations()[0] else {
                panic!("expected add operation");
            };
            assert_eq!(id, "4");
            assert_eq!(fields["gone"], FieldValue::Text(String::new()));
            assert_eq!(fields["at"], FieldValue::Text("2024-01-01T00:00:00Z".to_string()));
            assert_eq!(fields["n"], FieldValue::Float(2.0));
            assert_eq!(fields.get_index(0).map(|(k, _)| k.as_str()), Some("name"));
        }

        let delete = DocumentBatch::from(DocumentOperation::delete(
            "4",
            ApiVersion::Legacy.dialect(),
            now(),
        ));
        let back: DocumentBatch = serde_json::from_str(&delete.to_json().unwrap()).unwrap();
        assert_eq!(back, delete);
    }

    #[test]
    fn test_legacy_add_is_versioned() {
        let op = DocumentOperation::add("4", Fields::new(), ApiVersion::Legacy.dialect(), now());
        let body = serde_json::to_value(&op).unwrap();
        assert_eq!(body["version"], json!(now().timestamp()));
        assert_eq!(body["lang"], json!("en"));
    }

    #[test]
    fn test_delete_envelope() {
        let op = DocumentOperation::delete("9", ApiVersion::Structured.dialect(), now());
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"type": "delete", "id": "9"})
        );

        let op = DocumentOperation::delete("9", ApiVersion::Legacy.dialect(), now());
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"type": "delete", "id": "9", "version": now().timestamp()})
        );
    }

    #[test]
    fn test_nulls_inside_lists_are_normalized() {
        let value = FieldValue::List(vec!["a".into(), FieldValue::Null]).normalized();
        assert_eq!(
            value,
            FieldValue::List(vec!["a".into(), FieldValue::Text(String::new())])
        );
    }

    #[test]
    fn test_fields_from_json() {
        let fields = fields_from_json(json!({"name": "X", "n": 2, "tags": ["a"], "gone": null}))
            .unwrap();
        assert_eq!(fields["name"], FieldValue::Text("X".to_string()));
        assert_eq!(fields["n"], FieldValue::Integer(2));
        assert_eq!(fields["tags"], FieldValue::List(vec!["a".into()]));
        assert_eq!(fields["gone"], FieldValue::Null);
        assert!(fields_from_json(json!([1])).is_none());
    }

    #[test]
    fn test_batch_response() {
        let response: BatchResponse =
            serde_json::from_value(json!({"status": "success", "adds": 1, "deletes": 0})).unwrap();
        assert!(response.is_success());
        assert_eq!(response.adds, 1);
    }
}
