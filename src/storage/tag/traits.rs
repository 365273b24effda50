//! Tag storage trait definitions.

use crate::Result;
use crate::models::{OwnerId, Tag, TagId, TaggableRef};

/// Trait for tag storage backends.
///
/// Tag names are unique per owner. Tags attach to groups and links through
/// the `taggables` association table.
pub trait TagBackend: Send + Sync {
    /// Lists the owner's tags ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn list_tags(&self, owner: OwnerId) -> Result<Vec<Tag>>;

    /// Deletes a tag and its associations.
    ///
    /// # Returns
    ///
    /// `true` if the tag existed for `owner`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn delete_tag(&self, owner: OwnerId, id: TagId) -> Result<bool>;

    /// Tags a group or link with `name` in one transaction.
    ///
    /// The tag is created on first use. Nothing is written when the target
    /// does not exist for `owner`.
    ///
    /// # Returns
    ///
    /// The tag, and `true` if a new association was created.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the target does not exist for
    /// `owner`.
    fn tag_target(&self, owner: OwnerId, name: &str, target: TaggableRef) -> Result<(Tag, bool)>;

    /// Detaches a tag from a group or link.
    ///
    /// # Returns
    ///
    /// `true` if an association was removed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if the tag does not exist for `owner`.
    fn detach_tag(&self, owner: OwnerId, tag: TagId, target: TaggableRef) -> Result<bool>;

    /// Lists the tags attached to `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn tags_for(&self, owner: OwnerId, target: TaggableRef) -> Result<Vec<Tag>>;

    /// Finds tags whose name contains `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    fn search_tags(&self, owner: OwnerId, query: &str) -> Result<Vec<Tag>>;
}
