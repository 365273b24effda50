//! Business logic services.
//!
//! Services orchestrate storage backends and provide the operations an
//! external request handler calls:
//!
//! - [`OwnerScope`] resolves records for the acting owner only
//! - [`TreeNavigator`] resolves breadcrumbs, children and descendants
//! - [`GroupService`] creates, updates, deletes and lists groups
//! - [`LinkService`], [`TagService`] and [`SearchService`] cover the records
//!   filed under groups

mod group;
mod link;
mod navigator;
mod scope;
mod search;
mod tag;

pub use group::GroupService;
pub use link::LinkService;
pub use navigator::TreeNavigator;
pub use scope::OwnerScope;
pub use search::SearchService;
pub use tag::TagService;
pub use crate::tree::cascade::{CascadeOutcome, CascadePlan, CascadePolicy, plan_cascade};
pub use crate::tree::walk_ancestors;

use std::sync::Arc;

use crate::Result;
use crate::config::ShelfConfig;
use crate::storage::{SqliteBackend, StorageFactory};

/// All services wired to one backend.
pub struct ServiceContainer {
    /// Group operations.
    pub groups: GroupService,
    /// Link operations.
    pub links: LinkService,
    /// Tag operations.
    pub tags: TagService,
    /// Search.
    pub search: SearchService,
}

impl ServiceContainer {
    /// Wires every service to `backend` using `config`.
    #[must_use]
    pub fn new(backend: &Arc<SqliteBackend>, config: &ShelfConfig) -> Self {
        Self {
            groups: GroupService::new(backend.clone(), backend.clone(), config.cascade_policy)
                .with_links_per_page(config.links_per_page),
            links: LinkService::new(backend.clone()),
            tags: TagService::new(backend.clone()),
            search: SearchService::new(
                backend.clone(),
                backend.clone(),
                backend.clone(),
                config.base_url.clone(),
            ),
        }
    }

    /// Opens the configured database and wires every service to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(config: &ShelfConfig) -> Result<Self> {
        let backend = StorageFactory::open(config)?;
        Ok(Self::new(&backend, config))
    }

    /// Creates services over an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn in_memory(config: &ShelfConfig) -> Result<Self> {
        let backend = StorageFactory::create_in_memory()?;
        Ok(Self::new(&backend, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OwnerId;

    #[test]
    fn test_container_uses_configured_policy() {
        let config = ShelfConfig::new().with_cascade_policy(CascadePolicy::Cascade);
        let container = ServiceContainer::in_memory(&config).expect("container");
        assert_eq!(container.groups.policy(), CascadePolicy::Cascade);

        let owner = OwnerId::new(1);
        let work = container.groups.create_group(owner, "Work", None).expect("create");
        let _ = container
            .groups
            .create_group(owner, "Projects", Some(work.id))
            .expect("create");
        let outcome = container.groups.delete_group(owner, work.id).expect("delete");
        assert_eq!(outcome.deleted_groups.len(), 2);
    }
}
