//! Tag service.

use std::sync::Arc;

use crate::models::{OwnerId, Tag, TagId, TaggableRef};
use crate::storage::TagBackend;
use crate::{Error, Result};

/// Service for tag operations.
///
/// Tags are created on first use and shared by every group and link of the
/// same owner.
pub struct TagService {
    tags: Arc<dyn TagBackend>,
}

impl TagService {
    /// Creates a new tag service with the given backend.
    #[must_use]
    pub fn new(tags: Arc<dyn TagBackend>) -> Self {
        Self { tags }
    }

    /// Tags a group or link with `name`.
    ///
    /// The tag is created on first use. A failed call leaves no tag behind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for blank names or [`Error::NotFound`]
    /// if the target does not exist for `owner`.
    pub fn tag(&self, owner: OwnerId, name: &str, target: TaggableRef) -> Result<Tag> {
        let name = Tag::normalize_name(name)?;
        let (tag, attached) = self.tags.tag_target(owner, &name, target)?;
        tracing::info!(
            owner_id = %owner,
            tag_id = %tag.id,
            target = target.type_name(),
            target_id = target.raw_id(),
            attached,
            "Tag attached"
        );
        Ok(tag)
    }

    /// Removes a tag from a group or link.
    ///
    /// # Returns
    ///
    /// `true` if the tag was attached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the tag does not exist for `owner`.
    pub fn untag(&self, owner: OwnerId, tag: TagId, target: TaggableRef) -> Result<bool> {
        let detached = self.tags.detach_tag(owner, tag, target)?;
        tracing::info!(
            owner_id = %owner,
            tag_id = %tag,
            target = target.type_name(),
            target_id = target.raw_id(),
            detached,
            "Tag detached"
        );
        Ok(detached)
    }

    /// Lists the owner's tags.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    pub fn list_tags(&self, owner: OwnerId) -> Result<Vec<Tag>> {
        self.tags.list_tags(owner)
    }

    /// Lists the tags attached to a group or link.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    pub fn tags_for(&self, owner: OwnerId, target: TaggableRef) -> Result<Vec<Tag>> {
        self.tags.tags_for(owner, target)
    }

    /// Deletes a tag and detaches it everywhere.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the tag does not exist for `owner`.
    pub fn delete_tag(&self, owner: OwnerId, id: TagId) -> Result<()> {
        if !self.tags.delete_tag(owner, id)? {
            return Err(Error::not_found("tag", id));
        }
        tracing::info!(owner_id = %owner, tag_id = %id, "Tag deleted");
        Ok(())
    }
}
