//! Canned CloudSearch responses and sample models.

use serde_json::{Value, json};

use cloudsearch_client::{Fields, Indexable};

/// Search domain used throughout the tests.
pub const DOMAIN: &str = "testdomain";

/// A `2011-02-01` search response with ids only.
pub fn legacy_ids_response(found: u64, start: u64, ids: &[&str]) -> Value {
    let hits: Vec<Value> = ids.iter().map(|id| json!({"id": id})).collect();
    json!({
        "rank": "-text_relevance",
        "match-expr": "(label 'donut')",
        "hits": {"found": found, "start": start, "hit": hits},
        "info": {"rid": "rid-1", "time-ms": 3, "cpu-time-ms": 0}
    })
}

/// A `2011-02-01` search response carrying `data` field maps.
pub fn legacy_data_response() -> Value {
    json!({
        "hits": {
            "found": 2,
            "start": 0,
            "hit": [
                {"id": "123", "data": {"name": ["Beavis"], "address": ["Highland"]}},
                {"id": "456", "data": {"name": ["Butthead"], "address": ["Highland"]}}
            ]
        }
    })
}

/// A `2013-01-01` search response carrying `fields` maps and a cursor.
pub fn structured_fields_response() -> Value {
    json!({
        "status": {"rid": "rid-2", "time-ms": 4},
        "hits": {
            "found": 250,
            "start": 0,
            "cursor": "Pl-next-page",
            "hit": [
                {"id": "9", "fields": {"name": "Stewart"}}
            ]
        }
    })
}

/// A successful batch response.
pub fn batch_success(adds: u64, deletes: u64) -> Value {
    json!({"status": "success", "adds": adds, "deletes": deletes})
}

/// A model used to exercise [`Indexable`].
#[derive(Debug, Clone)]
pub struct Donut {
    pub id: u32,
    pub name: String,
    pub glazed: bool,
    pub discontinued: bool,
}

impl Donut {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            glazed: true,
            discontinued: false,
        }
    }
}

impl Indexable for Donut {
    fn document_id(&self) -> String {
        self.id.to_string()
    }

    fn document_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), self.name.clone().into());
        fields.insert("glazed".to_string(), self.glazed.into());
        fields
    }

    fn should_index(&self) -> bool {
        !self.discontinued
    }
}
