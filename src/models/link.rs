//! Link models and pagination.

use serde::{Deserialize, Serialize};

use super::group::OwnerId;
use crate::{Error, Result};

integer_id!(
    /// Unique identifier for a link.
    LinkId
);

/// A stored link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Unique identifier, assigned by storage.
    pub id: LinkId,
    /// Display title.
    pub title: String,
    /// Target URL.
    pub url: String,
    /// Owning user.
    pub owner_id: OwnerId,
    /// Creation time (Unix seconds).
    pub created_at: i64,
}

impl Link {
    /// Validates a link title and URL before it is stored.
    ///
    /// Returns the normalised URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the title is blank or the URL is not absolute.
    pub fn validate(title: &str, url: &str) -> Result<String> {
        if title.trim().is_empty() {
            return Err(Error::Validation {
                field: "title",
                message: "must not be empty".to_string(),
            });
        }
        let parsed = url::Url::parse(url.trim()).map_err(|e| Error::Validation {
            field: "url",
            message: e.to_string(),
        })?;
        Ok(parsed.to_string())
    }
}

/// The fields of a link shown inside a group page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSummary {
    /// Link identifier.
    pub id: LinkId,
    /// Link title.
    pub title: String,
    /// Target URL.
    pub url: String,
}

impl From<Link> for LinkSummary {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            title: link.title,
            url: link.url,
        }
    }
}

/// One page of an ordered result set.
///
/// Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Current page number.
    pub page: u32,
    /// Maximum items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
}

impl<T> Page<T> {
    /// Returns the number of the last page (at least 1).
    #[must_use]
    pub fn last_page(&self) -> u32 {
        if self.per_page == 0 || self.total == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(u64::from(self.per_page));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Returns `true` if pages follow this one.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.page < self.last_page()
    }

    /// Row offset of the given 1-based page.
    #[must_use]
    pub fn offset(page: u32, per_page: u32) -> u64 {
        u64::from(page.max(1) - 1) * u64::from(per_page)
    }
}
