//! Link storage trait definitions.

use crate::Result;
use crate::models::{GroupId, Link, LinkId, LinkSummary, OwnerId, Page};

/// Trait for link storage backends.
///
/// Links are filed under groups through an association table. Removing an
/// association never removes the link.
pub trait LinkBackend: Send + Sync {
    /// Creates a link and files it under `groups`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Reference`] if any group does not exist for
    /// `owner`, or an error if storage cannot be accessed. On error no link
    /// is created.
    fn create_link(
        &self,
        owner: OwnerId,
        title: &str,
        url: &str,
        groups: &[GroupId],
    ) -> Result<Link>;

    /// Gets a link by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn get_link(&self, owner: OwnerId, id: LinkId) -> Result<Option<Link>>;

    /// Deletes a link and all of its group and tag associations.
    ///
    /// # Returns
    ///
    /// `true` if the link existed for `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn delete_link(&self, owner: OwnerId, id: LinkId) -> Result<bool>;

    /// Files `link` under `group`.
    ///
    /// # Returns
    ///
    /// `true` if a new association was created, `false` if it already existed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if either record does not exist for
    /// `owner`.
    fn attach_link(&self, owner: OwnerId, group: GroupId, link: LinkId) -> Result<bool>;

    /// Removes `link` from `group`.
    ///
    /// # Returns
    ///
    /// `true` if an association was removed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the group does not exist for `owner`.
    fn detach_link(&self, owner: OwnerId, group: GroupId, link: LinkId) -> Result<bool>;

    /// Returns one page of the links filed under `group`, newest first.
    ///
    /// `page` is 1-based; values below 1 are treated as 1.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn list_group_links(
        &self,
        owner: OwnerId,
        group: GroupId,
        page: u32,
        per_page: u32,
    ) -> Result<Page<LinkSummary>>;

    /// Returns the groups a link is filed under.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn groups_for_link(&self, owner: OwnerId, link: LinkId) -> Result<Vec<GroupId>>;

    /// Finds links whose title or URL contains `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn search_links(&self, owner: OwnerId, query: &str) -> Result<Vec<Link>>;
}
