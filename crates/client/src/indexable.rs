//! Models that know how to index themselves.

use crate::documents::Fields;

/// A value that can be added to and removed from a search domain.
///
/// ```
/// use cloudsearch_client::{Fields, Indexable};
///
/// struct Book {
///     id: u64,
///     title: String,
/// }
///
/// impl Indexable for Book {
///     fn document_id(&self) -> String {
///         self.id.to_string()
///     }
///
///     fn document_fields(&self) -> Fields {
///         let mut fields = Fields::new();
///         fields.insert("title".to_string(), self.title.clone().into());
///         fields
///     }
/// }
/// ```
pub trait Indexable {
    /// Id of the search document.
    fn document_id(&self) -> String;

    /// Fields submitted when the model is indexed.
    fn document_fields(&self) -> Fields;

    /// Whether the model should currently be in the index.
    ///
    /// When this returns `false`, [`CloudSearchClient::index`](crate::CloudSearchClient::index)
    /// deletes the document instead of adding it.
    fn should_index(&self) -> bool {
        true
    }
}
