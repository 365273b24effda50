//! Searchable projections.
//!
//! Groups, tags and links expose a uniform `{type, id, title, url}` record
//! that an indexed-search collaborator can consume. URLs are stable deep
//! links built from the record id, so renaming a record never breaks them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::group::Group;
use super::link::Link;
use super::tag::Tag;

/// Kind of record a search result points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SearchableType {
    /// Group records.
    Groups,
    /// Tag records.
    Tags,
    /// Link records.
    Links,
}

impl SearchableType {
    /// Returns the display name of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Groups => "Groups",
            Self::Tags => "Tags",
            Self::Links => "Links",
        }
    }
}

impl fmt::Display for SearchableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A searchable projection of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Kind of record.
    pub searchable_type: SearchableType,
    /// Raw record id.
    pub id: i64,
    /// Title shown in result lists.
    pub title: String,
    /// Where the result leads.
    pub url: String,
}

/// Records that can be projected into the search index.
pub trait Searchable {
    /// Builds the search projection.
    ///
    /// `base_url` is prefixed to relative deep links; external URLs are kept as-is.
    fn search_result(&self, base_url: &str) -> SearchResult;
}

impl Searchable for Group {
    fn search_result(&self, base_url: &str) -> SearchResult {
        SearchResult {
            searchable_type: SearchableType::Groups,
            id: self.id.get(),
            title: self.title.clone(),
            url: format!("{}{}", base_url.trim_end_matches('/'), self.id.path()),
        }
    }
}

impl Searchable for Tag {
    fn search_result(&self, base_url: &str) -> SearchResult {
        SearchResult {
            searchable_type: SearchableType::Tags,
            id: self.id.get(),
            title: self.name.clone(),
            url: format!("{}{}", base_url.trim_end_matches('/'), self.id.path()),
        }
    }
}

impl Searchable for Link {
    fn search_result(&self, _base_url: &str) -> SearchResult {
        SearchResult {
            searchable_type: SearchableType::Links,
            id: self.id.get(),
            title: self.title.clone(),
            url: self.url.clone(),
        }
    }
}
