//! Ownership scoping.
//!
//! Every lookup goes through the backend with the acting owner, so the owner
//! check happens in the same query as the read. A record owned by someone
//! else is reported exactly like a missing one.
//!
//! Parent ids named by a create or update are resolved by the storage
//! backend inside the write transaction, not here.

use crate::models::{Group, GroupId, OwnerId};
use crate::storage::GroupBackend;
use crate::{Error, Result};

/// Resolves records on behalf of one owner.
pub struct OwnerScope<'a> {
    owner: OwnerId,
    groups: &'a dyn GroupBackend,
}

impl<'a> OwnerScope<'a> {
    /// Scopes `groups` to `owner`.
    #[must_use]
    pub fn new(owner: OwnerId, groups: &'a dyn GroupBackend) -> Self {
        Self { owner, groups }
    }

    /// Loads a group the owner is acting on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the group does not exist for the owner.
    pub fn group(&self, id: GroupId) -> Result<Group> {
        self.groups
            .get_group(self.owner, id)?
            .ok_or_else(|| Error::not_found("group", id))
    }
}
