//! Live query specification.

use serde::{Deserialize, Serialize};

use super::document::{Collection, Document};
use super::filter::FilterField;
use super::id::{FolderId, UserId};
use super::sorting::SortField;

/// A filtered, ordered live query against one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenQuery {
    /// Collection to query.
    pub collection: Collection,
    /// Conjunction of equality filters.
    pub filters: Vec<FilterField>,
    /// Result ordering.
    pub order_by: SortField,
}

impl ListenQuery {
    /// The children of `parent` owned by `owner`, oldest first.
    ///
    /// `parent == None` selects the children of the root.
    pub fn children_of(collection: Collection, parent: Option<&FolderId>, owner: &UserId) -> Self {
        Self {
            collection,
            filters: vec![
                FilterField::eq(collection.parent_field(), parent.map(FolderId::as_str)),
                FilterField::eq("userId", Some(owner.as_str())),
            ],
            order_by: SortField::asc("createdAt"),
        }
    }

    /// Check a document against every filter.
    pub fn matches(&self, doc: &Document) -> bool {
        self.filters.iter().all(|f| f.matches(&doc.data))
    }
}
