//! Search over the owner's groups, tags and links.
//!
//! Matching is a case-insensitive substring match on titles, tag names and
//! URLs. Every hit is returned as a [`SearchResult`] projection carrying a
//! stable deep link, which is what an external search index would consume.

use std::sync::Arc;

use crate::models::{OwnerId, SearchResult, Searchable};
use crate::storage::{GroupBackend, LinkBackend, TagBackend};
use crate::{Error, Result};

/// Service for searching records.
pub struct SearchService {
    groups: Arc<dyn GroupBackend>,
    links: Arc<dyn LinkBackend>,
    tags: Arc<dyn TagBackend>,
    base_url: String,
}

impl SearchService {
    /// Creates a new search service.
    ///
    /// `base_url` prefixes the deep links of groups and tags.
    #[must_use]
    pub fn new(
        groups: Arc<dyn GroupBackend>,
        links: Arc<dyn LinkBackend>,
        tags: Arc<dyn TagBackend>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            groups,
            links,
            tags,
            base_url: base_url.into(),
        }
    }

    /// Searches groups, then tags, then links.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the query is blank.
    pub fn search(&self, owner: OwnerId, query: &str) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(Error::Validation {
                field: "query",
                message: "must not be empty".to_string(),
            });
        }

        let mut results = self.project(&self.groups.search_groups(owner, query)?);
        results.extend(self.project(&self.tags.search_tags(owner, query)?));
        results.extend(self.project(&self.links.search_links(owner, query)?));

        tracing::debug!(owner_id = %owner, hits = results.len(), "Search completed");
        Ok(results)
    }

    /// Returns the searchable projection of every record the owner has.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    pub fn index_records(&self, owner: OwnerId) -> Result<Vec<SearchResult>> {
        let mut records = self.project(&self.groups.list_all(owner)?);
        records.extend(self.project(&self.tags.list_tags(owner)?));
        // An empty pattern matches every link.
        records.extend(self.project(&self.links.search_links(owner, "")?));
        Ok(records)
    }

    fn project<T: Searchable>(&self, records: &[T]) -> Vec<SearchResult> {
        records
            .iter()
            .map(|r| r.search_result(&self.base_url))
            .collect()
    }
}
