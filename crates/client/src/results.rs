//! Paginated search results.
//!
//! A [`SearchResults`] is built once per response and never mutated. It
//! exposes either a plain ordered list of document ids or, when return
//! fields were requested, an ordered map from id to field data.

use std::ops::Index;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// The hits of one result page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Hits {
    /// Document ids in result order.
    Ids(Vec<String>),
    /// Document id to returned fields, in result order.
    ///
    /// Keyed by id: a response that repeats an id yields one entry, at the
    /// position of the first occurrence, holding the fields of the last one.
    Documents(IndexMap<String, Map<String, Value>>),
}

impl Hits {
    fn len(&self) -> usize {
        match self {
            Hits::Ids(ids) => ids.len(),
            Hits::Documents(docs) => docs.len(),
        }
    }

    fn id_at(&self, index: usize) -> Option<&str> {
        match self {
            Hits::Ids(ids) => ids.get(index).map(String::as_str),
            Hits::Documents(docs) => docs.get_index(index).map(|(id, _)| id.as_str()),
        }
    }
}

/// One page of search results with pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    hits: Hits,
    total_entries: u64,
    page_size: u32,
    current_page: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<String>,
}

impl SearchResults {
    /// Parses a search response body.
    ///
    /// `fields_key` selects the per-hit field map (`"data"` or `"fields"`);
    /// pass `None` to collect ids only. Returns `None` if the body has no
    /// `hits` object.
    pub fn from_response(body: &Value, page_size: u32, fields_key: Option<&str>) -> Option<Self> {
        let hits = body.get("hits")?.as_object()?;
        let page_size = page_size.max(1);

        let total_entries = hits.get("found").and_then(Value::as_u64).unwrap_or(0);
        let start = hits.get("start").and_then(Value::as_u64).unwrap_or(0);
        let cursor = hits
            .get("cursor")
            .and_then(Value::as_str)
            .map(str::to_string);

        let entries = hits
            .get("hit")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let hits = match fields_key {
            Some(key) => Hits::Documents(
                entries
                    .iter()
                    .filter_map(|hit| {
                        let id = hit_id(hit)?;
                        let fields = hit
                            .get(key)
                            .or_else(|| hit.get("fields"))
                            .or_else(|| hit.get("data"))
                            .and_then(Value::as_object)
                            .cloned()
                            .unwrap_or_default();
                        Some((id, fields))
                    })
                    .collect(),
            ),
            None => Hits::Ids(entries.iter().filter_map(hit_id).collect()),
        };

        Some(Self {
            hits,
            total_entries,
            page_size,
            current_page: start / u64::from(page_size) + 1,
            cursor,
        })
    }

    /// An empty first page, returned in sandbox mode.
    pub fn sandbox() -> Self {
        Self {
            hits: Hits::Ids(Vec::new()),
            total_entries: 0,
            page_size: 10,
            current_page: 1,
            cursor: None,
        }
    }

    /// The hits on this page.
    pub fn hits(&self) -> &Hits {
        &self.hits
    }

    /// Number of hits on this page.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Returns `true` if this page has no hits.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The id of the hit at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.hits.id_at(index)
    }

    /// Ids on this page in result order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        (0..self.len()).filter_map(|i| self.hits.id_at(i))
    }

    /// Alias of [`ids`](Self::ids).
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids()
    }

    /// Id to field map, when return fields were requested.
    pub fn documents(&self) -> Option<&IndexMap<String, Map<String, Value>>> {
        match &self.hits {
            Hits::Documents(docs) => Some(docs),
            Hits::Ids(_) => None,
        }
    }

    /// Fields returned for `id`.
    pub fn document(&self, id: &str) -> Option<&Map<String, Value>> {
        self.documents()?.get(id)
    }

    /// Total matches across all pages.
    pub fn total_entries(&self) -> u64 {
        self.total_entries
    }

    /// Page size used for the request.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// 1-based number of this page.
    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    /// Total pages; at least 1 even with no matches.
    pub fn total_pages(&self) -> u64 {
        self.total_entries.div_ceil(u64::from(self.page_size)).max(1)
    }

    /// Offset of the first hit on this page.
    pub fn offset(&self) -> u64 {
        (self.current_page - 1) * u64::from(self.page_size)
    }

    /// The previous page number, if any.
    pub fn previous_page(&self) -> Option<u64> {
        (self.current_page > 1).then(|| self.current_page - 1)
    }

    /// The next page number, if any.
    pub fn next_page(&self) -> Option<u64> {
        (self.current_page < self.total_pages()).then(|| self.current_page + 1)
    }

    /// Cursor for the next page (`2013-01-01` only).
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

fn hit_id(hit: &Value) -> Option<String> {
    match hit.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl Index<usize> for SearchResults {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        match self.get(index) {
            Some(id) => id,
            None => panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len(),
                index
            ),
        }
    }
}

impl<'a> IntoIterator for &'a SearchResults {
    type Item = &'a str;
    type IntoIter = Box<dyn Iterator<Item = &'a str> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.ids())
    }
}
