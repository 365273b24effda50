//! Group models.
//!
//! A group is a user-owned folder of links. Groups form a forest: a group
//! with no parent is a root, every other group points at exactly one parent
//! owned by the same user.
//!
//! # Example
//!
//! ```rust
//! use linkshelf::models::{GroupId, validate_title};
//!
//! assert!(validate_title("abc").is_ok());
//! assert!(validate_title("ab").is_err());
//! assert_eq!(GroupId::new(3).path(), "/groups/3");
//! ```

use serde::{Deserialize, Serialize};

use super::link::{LinkSummary, Page};
use crate::{Error, Result};

/// Minimum number of characters in a group title.
pub const TITLE_MIN_LEN: usize = 3;

integer_id!(
    /// Unique identifier for a group.
    GroupId
);

integer_id!(
    /// Identifier of the user that owns a record.
    OwnerId
);

impl GroupId {
    /// Returns the relative deep link to the group's page.
    #[must_use]
    pub fn path(self) -> String {
        format!("/groups/{}", self.0)
    }
}

/// A stored group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Unique identifier, assigned by storage.
    pub id: GroupId,
    /// Display title, at least [`TITLE_MIN_LEN`] characters.
    pub title: String,
    /// Parent group, `None` for root groups.
    pub parent_group_id: Option<GroupId>,
    /// Owning user, immutable after creation.
    pub owner_id: OwnerId,
    /// Creation time (Unix seconds).
    pub created_at: i64,
    /// Last update time (Unix seconds).
    pub updated_at: i64,
}

impl Group {
    /// Returns `true` if the group has no parent.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_group_id.is_none()
    }
}

/// A group annotated with its direct child and link counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    /// Group identifier.
    pub id: GroupId,
    /// Group title.
    pub title: String,
    /// Number of direct child groups.
    pub child_group_count: u64,
    /// Number of links attached to the group.
    pub link_count: u64,
}

/// Flat listing entry used to populate parent pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupListing {
    /// Group identifier.
    pub id: GroupId,
    /// Group title.
    pub title: String,
    /// Parent group, `None` for root groups.
    pub parent_group_id: Option<GroupId>,
    /// Number of direct child groups.
    pub child_group_count: u64,
}

/// One step of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Ancestor title.
    pub title: String,
    /// Relative link to the ancestor's page.
    pub link: String,
}

impl From<&Group> for Breadcrumb {
    fn from(group: &Group) -> Self {
        Self {
            title: group.title.clone(),
            link: group.id.path(),
        }
    }
}

/// Everything needed to render a single group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPage {
    /// The group itself.
    pub group: Group,
    /// Direct children ordered by title.
    pub children: Vec<GroupSummary>,
    /// Ancestors from the root down to the direct parent.
    pub ancestors: Vec<Breadcrumb>,
    /// Links attached to the group, newest first.
    pub links: Page<LinkSummary>,
}

/// Minimal `(id, parent)` pair used by tree algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupNode {
    /// Group identifier.
    pub id: GroupId,
    /// Parent group, `None` for root groups.
    pub parent_group_id: Option<GroupId>,
}

impl From<&Group> for GroupNode {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id,
            parent_group_id: group.parent_group_id,
        }
    }
}

/// A group with its nested children, for whole-tree dumps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Group identifier.
    pub id: GroupId,
    /// Group title.
    pub title: String,
    /// Children ordered by title.
    pub children: Vec<TreeNode>,
}

/// Requested change to a group's parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentUpdate {
    /// Leave the parent unchanged.
    #[default]
    Keep,
    /// Move the group under the given parent, or to the root level for `None`.
    Set(Option<GroupId>),
}

/// Validates a group title.
///
/// Titles are measured in characters after trimming surrounding whitespace.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the title is shorter than [`TITLE_MIN_LEN`].
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().chars().count() < TITLE_MIN_LEN {
        return Err(Error::Validation {
            field: "title",
            message: format!("must be at least {TITLE_MIN_LEN} characters"),
        });
    }
    Ok(())
}

/// Rejects a group being named as its own parent.
///
/// # Errors
///
/// Returns [`Error::SelfReference`] if `parent` equals `group_id`.
pub fn validate_parent(group_id: GroupId, parent: Option<GroupId>) -> Result<()> {
    if parent == Some(group_id) {
        return Err(Error::SelfReference(group_id));
    }
    Ok(())
}
