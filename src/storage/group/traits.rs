//! Group storage trait definitions.
//!
//! Every method takes the acting owner. A group that exists but belongs to a
//! different owner is indistinguishable from one that does not exist.

use crate::Result;
use crate::models::{Group, GroupId, GroupListing, GroupSummary, OwnerId, ParentUpdate};
use crate::tree::cascade::{CascadeOutcome, CascadePolicy};

/// Trait for group storage backends.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait GroupBackend: Send + Sync {
    /// Creates a new group.
    ///
    /// # Arguments
    ///
    /// * `owner` - Owner of the new group
    /// * `title` - Already validated title
    /// * `parent` - Parent group, `None` for a root group
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Reference`] if `parent` does not exist for
    /// `owner`, or an error if storage cannot be accessed.
    fn create_group(&self, owner: OwnerId, title: &str, parent: Option<GroupId>) -> Result<Group>;

    /// Gets a group by ID.
    ///
    /// # Returns
    ///
    /// The group if it exists and belongs to `owner`, `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn get_group(&self, owner: OwnerId, id: GroupId) -> Result<Option<Group>>;

    /// Updates a group's title and, optionally, its parent.
    ///
    /// The parent check and the write happen in one transaction.
    ///
    /// # Returns
    ///
    /// The updated group, `None` if the group does not exist for `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The new parent is the group itself ([`crate::Error::SelfReference`])
    /// - The new parent is missing, foreign, or a descendant of the group
    ///   ([`crate::Error::Reference`])
    /// - Storage cannot be accessed
    fn update_group(
        &self,
        owner: OwnerId,
        id: GroupId,
        title: &str,
        parent: ParentUpdate,
    ) -> Result<Option<Group>>;

    /// Deletes a group, applying `policy` to its children.
    ///
    /// # Returns
    ///
    /// What was deleted, moved and detached, `None` if the group does not
    /// exist for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Conflict`] under [`CascadePolicy::Restrict`]
    /// when children exist, or an error if storage cannot be accessed. On
    /// error nothing is changed.
    fn delete_group(
        &self,
        owner: OwnerId,
        id: GroupId,
        policy: CascadePolicy,
    ) -> Result<Option<CascadeOutcome>>;

    /// Lists the direct children of `parent` (root groups for `None`).
    ///
    /// Results are ordered by title, case-insensitively, then by id.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn list_children(&self, owner: OwnerId, parent: Option<GroupId>)
    -> Result<Vec<GroupSummary>>;

    /// Lists every group of `owner` with its parent and child count.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn list_flat(&self, owner: OwnerId) -> Result<Vec<GroupListing>>;

    /// Returns every group of `owner`, ordered by title.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn list_all(&self, owner: OwnerId) -> Result<Vec<Group>>;

    /// Counts the groups of `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn count_groups(&self, owner: OwnerId) -> Result<u64>;

    /// Finds groups whose title contains `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn search_groups(&self, owner: OwnerId, query: &str) -> Result<Vec<Group>>;
}
