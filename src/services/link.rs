//! Link service.
//!
//! Links are created with a title and an absolute URL and filed under any
//! number of the owner's groups.

use std::sync::Arc;

use crate::models::{GroupId, Link, LinkId, OwnerId};
use crate::storage::LinkBackend;
use crate::{Error, Result};

/// Service for link operations.
pub struct LinkService {
    links: Arc<dyn LinkBackend>,
}

impl LinkService {
    /// Creates a new link service with the given backend.
    #[must_use]
    pub fn new(links: Arc<dyn LinkBackend>) -> Self {
        Self { links }
    }

    /// Creates a link and files it under `groups`.
    ///
    /// The URL is stored in normalized form. Duplicate group ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The title is blank or the URL cannot be parsed ([`Error::Validation`])
    /// - A group does not exist for `owner` ([`Error::Reference`])
    pub fn create_link(
        &self,
        owner: OwnerId,
        title: &str,
        url: &str,
        groups: &[GroupId],
    ) -> Result<Link> {
        let url = Link::validate(title, url)?;
        let mut groups = groups.to_vec();
        groups.sort_unstable();
        groups.dedup();

        let link = self.links.create_link(owner, title.trim(), &url, &groups)?;
        tracing::info!(
            owner_id = %owner,
            link_id = %link.id,
            groups = groups.len(),
            "Link created"
        );
        Ok(link)
    }

    /// Loads a link.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the link does not exist for `owner`.
    pub fn get_link(&self, owner: OwnerId, id: LinkId) -> Result<Link> {
        self.links
            .get_link(owner, id)?
            .ok_or_else(|| Error::not_found("link", id))
    }

    /// Returns the groups a link is filed under.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the link does not exist for `owner`.
    pub fn link_groups(&self, owner: OwnerId, id: LinkId) -> Result<Vec<GroupId>> {
        self.get_link(owner, id)?;
        self.links.groups_for_link(owner, id)
    }

    /// Deletes a link and its associations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the link does not exist for `owner`.
    pub fn delete_link(&self, owner: OwnerId, id: LinkId) -> Result<()> {
        if !self.links.delete_link(owner, id)? {
            return Err(Error::not_found("link", id));
        }
        tracing::info!(owner_id = %owner, link_id = %id, "Link deleted");
        Ok(())
    }

    /// Files a link under a group. Filing it twice is a no-op.
    ///
    /// # Returns
    ///
    /// `true` if the link was not filed there before.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the group or link does not exist for `owner`.
    pub fn attach(&self, owner: OwnerId, group: GroupId, link: LinkId) -> Result<bool> {
        let attached = self.links.attach_link(owner, group, link)?;
        tracing::info!(
            owner_id = %owner,
            group_id = %group,
            link_id = %link,
            attached,
            "Link filed under group"
        );
        Ok(attached)
    }

    /// Removes a link from a group. The link itself is kept.
    ///
    /// # Returns
    ///
    /// `true` if the link was filed there.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the group does not exist for `owner`.
    pub fn detach(&self, owner: OwnerId, group: GroupId, link: LinkId) -> Result<bool> {
        let detached = self.links.detach_link(owner, group, link)?;
        tracing::info!(
            owner_id = %owner,
            group_id = %group,
            link_id = %link,
            detached,
            "Link removed from group"
        );
        Ok(detached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{GroupBackend, SqliteBackend};

    const OWNER: OwnerId = OwnerId::new(1);

    #[test]
    fn test_create_link_validates_and_dedups() {
        let backend = Arc::new(SqliteBackend::in_memory().expect("backend"));
        let work = backend.create_group(OWNER, "Work", None).expect("group");
        let service = LinkService::new(backend);

        assert!(matches!(
            service.create_link(OWNER, " ", "https://example.com", &[]),
            Err(Error::Validation { field: "title", .. })
        ));
        assert!(matches!(
            service.create_link(OWNER, "Example", "example.com", &[]),
            Err(Error::Validation { field: "url", .. })
        ));

        let link = service
            .create_link(OWNER, "Example", "https://Example.com", &[work.id, work.id])
            .expect("create");
        assert_eq!(link.url, "https://example.com/");
        assert_eq!(service.link_groups(OWNER, link.id).expect("groups"), vec![work.id]);
    }

    #[test]
    fn test_delete_unknown_link_is_not_found() {
        let backend = Arc::new(SqliteBackend::in_memory().expect("backend"));
        let service = LinkService::new(backend);
        assert!(matches!(
            service.delete_link(OWNER, LinkId::new(3)),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(service.get_link(OWNER, LinkId::new(3)), Err(Error::NotFound(_))));
    }
}
