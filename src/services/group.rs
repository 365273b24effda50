//! Group management service.
//!
//! Provides the operations an external request handler calls for groups.
//! Every call takes the acting owner explicitly.
//!
//! # Operations
//!
//! | Operation | Fails with |
//! |-----------|------------|
//! | [`GroupService::list_root_groups`] | storage errors only |
//! | [`GroupService::get_group`] | `NotFound` |
//! | [`GroupService::create_group`] | `Validation`, `Reference` |
//! | [`GroupService::update_group`] | `Validation`, `Reference`, `NotFound` |
//! | [`GroupService::delete_group`] | `NotFound`, `Conflict` (restrict policy) |
//! | [`GroupService::list_all_groups_flat`] | storage errors only |
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use linkshelf::models::OwnerId;
//! use linkshelf::services::{CascadePolicy, GroupService};
//! use linkshelf::storage::SqliteBackend;
//!
//! let backend = Arc::new(SqliteBackend::in_memory()?);
//! let service = GroupService::new(backend.clone(), backend, CascadePolicy::default());
//!
//! let owner = OwnerId::new(1);
//! let work = service.create_group(owner, "Work", None)?;
//! let projects = service.create_group(owner, "Projects", Some(work.id))?;
//!
//! let page = service.get_group(owner, projects.id, 1)?;
//! assert_eq!(page.ancestors[0].title, "Work");
//! # Ok::<(), linkshelf::Error>(())
//! ```

use std::sync::Arc;

use crate::config::DEFAULT_LINKS_PER_PAGE;
use crate::models::{
    Breadcrumb, Group, GroupId, GroupListing, GroupPage, GroupSummary, OwnerId, ParentUpdate,
    TreeNode, validate_parent, validate_title,
};
use crate::storage::{GroupBackend, LinkBackend};
use crate::tree::cascade::{CascadeOutcome, CascadePolicy};
use crate::{Error, Result};

use super::navigator::TreeNavigator;
use super::scope::OwnerScope;

/// Service for group operations.
///
/// Uses a [`GroupBackend`] for the tree and a [`LinkBackend`] for the links
/// shown on a group's page.
pub struct GroupService {
    groups: Arc<dyn GroupBackend>,
    links: Arc<dyn LinkBackend>,
    navigator: TreeNavigator,
    policy: CascadePolicy,
    links_per_page: u32,
}

impl GroupService {
    /// Creates a new group service.
    #[must_use]
    pub fn new(
        groups: Arc<dyn GroupBackend>,
        links: Arc<dyn LinkBackend>,
        policy: CascadePolicy,
    ) -> Self {
        Self {
            navigator: TreeNavigator::new(Arc::clone(&groups)),
            groups,
            links,
            policy,
            links_per_page: DEFAULT_LINKS_PER_PAGE,
        }
    }

    /// Sets the number of links shown per group page.
    #[must_use]
    pub fn with_links_per_page(mut self, links_per_page: u32) -> Self {
        self.links_per_page = links_per_page.max(1);
        self
    }

    /// The cascade policy applied by [`GroupService::delete_group`].
    #[must_use]
    pub const fn policy(&self) -> CascadePolicy {
        self.policy
    }

    fn scope(&self, owner: OwnerId) -> OwnerScope<'_> {
        OwnerScope::new(owner, self.groups.as_ref())
    }

    /// Lists the owner's root groups with their counts, ordered by title.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    pub fn list_root_groups(&self, owner: OwnerId) -> Result<Vec<GroupSummary>> {
        let roots = self.groups.list_children(owner, None)?;
        tracing::debug!(owner_id = %owner, count = roots.len(), "Listed root groups");
        Ok(roots)
    }

    /// Lists the direct children of a group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the group does not exist for `owner`.
    pub fn list_children(&self, owner: OwnerId, id: GroupId) -> Result<Vec<GroupSummary>> {
        let group = self.scope(owner).group(id)?;
        self.navigator.children(&group)
    }

    /// Loads a group with its children, breadcrumbs and one page of links.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the group does not exist for `owner`,
    /// or [`Error::CycleDetected`] if its parent chain is corrupted.
    pub fn get_group(&self, owner: OwnerId, id: GroupId, page: u32) -> Result<GroupPage> {
        let group = self.scope(owner).group(id)?;
        let children = self.navigator.children(&group)?;
        let ancestors = self.navigator.ancestor_chain(&group)?;
        let links = self
            .links
            .list_group_links(owner, id, page, self.links_per_page)?;

        tracing::debug!(
            owner_id = %owner,
            group_id = %id,
            children = children.len(),
            depth = ancestors.len(),
            "Loaded group page"
        );

        Ok(GroupPage {
            group,
            children,
            ancestors,
            links,
        })
    }

    /// Returns every group below `id`, breadth first.
    ///
    /// These are the groups a cascading delete of `id` would remove.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the group does not exist for `owner`.
    pub fn descendants(&self, owner: OwnerId, id: GroupId) -> Result<Vec<GroupId>> {
        let group = self.scope(owner).group(id)?;
        self.navigator.descendants(&group)
    }

    /// Returns the breadcrumb trail of a group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the group does not exist for `owner`.
    pub fn ancestors(&self, owner: OwnerId, id: GroupId) -> Result<Vec<Breadcrumb>> {
        let group = self.scope(owner).group(id)?;
        self.navigator.ancestor_chain(&group)
    }

    /// Creates a new group.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The title is shorter than three characters ([`Error::Validation`])
    /// - The parent does not exist for `owner` ([`Error::Reference`])
    pub fn create_group(
        &self,
        owner: OwnerId,
        title: &str,
        parent: Option<GroupId>,
    ) -> Result<Group> {
        validate_title(title)?;
        let group = self.groups.create_group(owner, title.trim(), parent)?;

        tracing::info!(
            owner_id = %owner,
            group_id = %group.id,
            parent_group_id = ?group.parent_group_id.map(GroupId::get),
            "Group created"
        );
        Ok(group)
    }

    /// Updates a group's title and parent.
    ///
    /// `parent` is the complete new parent: `None` moves the group to the
    /// root level. Naming the group as its own parent keeps the current
    /// parent and still applies the title.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The title is shorter than three characters ([`Error::Validation`])
    /// - The group does not exist for `owner` ([`Error::NotFound`])
    /// - The parent is missing, foreign, or below the group ([`Error::Reference`])
    pub fn update_group(
        &self,
        owner: OwnerId,
        id: GroupId,
        title: &str,
        parent: Option<GroupId>,
    ) -> Result<Group> {
        validate_title(title)?;

        let parent_update = match validate_parent(id, parent) {
            Ok(()) => ParentUpdate::Set(parent),
            Err(Error::SelfReference(_)) => {
                tracing::warn!(
                    owner_id = %owner,
                    group_id = %id,
                    "Ignoring parent change: group cannot be its own parent"
                );
                ParentUpdate::Keep
            },
            Err(e) => return Err(e),
        };

        self.apply_update(owner, id, title, parent_update)
    }

    /// Renames a group without touching its parent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for short titles or [`Error::NotFound`]
    /// if the group does not exist for `owner`.
    pub fn rename_group(&self, owner: OwnerId, id: GroupId, title: &str) -> Result<Group> {
        validate_title(title)?;
        self.apply_update(owner, id, title, ParentUpdate::Keep)
    }

    fn apply_update(
        &self,
        owner: OwnerId,
        id: GroupId,
        title: &str,
        parent: ParentUpdate,
    ) -> Result<Group> {
        let group = self
            .groups
            .update_group(owner, id, title.trim(), parent)?
            .ok_or_else(|| Error::not_found("group", id))?;

        tracing::info!(
            owner_id = %owner,
            group_id = %id,
            parent_group_id = ?group.parent_group_id.map(GroupId::get),
            "Group updated"
        );
        Ok(group)
    }

    /// Deletes a group using the configured cascade policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the group does not exist for `owner`,
    /// or [`Error::Conflict`] if the policy refuses the deletion.
    pub fn delete_group(&self, owner: OwnerId, id: GroupId) -> Result<CascadeOutcome> {
        self.delete_group_with(owner, id, self.policy)
    }

    /// Deletes a group using an explicit cascade policy.
    ///
    /// # Errors
    ///
    /// Same as [`GroupService::delete_group`].
    pub fn delete_group_with(
        &self,
        owner: OwnerId,
        id: GroupId,
        policy: CascadePolicy,
    ) -> Result<CascadeOutcome> {
        let outcome = self
            .groups
            .delete_group(owner, id, policy)?
            .ok_or_else(|| Error::not_found("group", id))?;

        tracing::info!(
            owner_id = %owner,
            group_id = %id,
            policy = %policy,
            deleted = outcome.deleted_groups.len(),
            reparented = outcome.reparented_groups.len(),
            detached_links = outcome.detached_links,
            "Group deleted"
        );
        Ok(outcome)
    }

    /// Lists every group of the owner for parent pickers.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    pub fn list_all_groups_flat(&self, owner: OwnerId) -> Result<Vec<GroupListing>> {
        self.groups.list_flat(owner)
    }

    /// Returns the owner's groups as a nested forest.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    pub fn tree(&self, owner: OwnerId) -> Result<Vec<TreeNode>> {
        self.navigator.forest(owner)
    }
}
