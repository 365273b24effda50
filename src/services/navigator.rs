//! Tree navigation.
//!
//! Breadcrumbs are resolved by walking parent ids upward, one owner-scoped
//! lookup per step. The walk is bounded by the number of groups the owner
//! has, so corrupted parent data surfaces as [`Error::CycleDetected`].

use std::sync::Arc;

use crate::models::{Breadcrumb, Group, GroupId, GroupNode, GroupSummary, OwnerId, TreeNode};
use crate::storage::GroupBackend;
use crate::tree::{build_forest, collect_descendants, walk_ancestors};
use crate::{Error, Result};

/// Resolves ancestors, children and descendants of groups.
#[derive(Clone)]
pub struct TreeNavigator {
    groups: Arc<dyn GroupBackend>,
}

impl TreeNavigator {
    /// Creates a navigator over `groups`.
    #[must_use]
    pub fn new(groups: Arc<dyn GroupBackend>) -> Self {
        Self { groups }
    }

    /// Returns the ancestors of `group`, root first, excluding `group`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`] if the parent chain loops, or an
    /// error if storage cannot be accessed.
    pub fn ancestors(&self, group: &Group) -> Result<Vec<Group>> {
        let owner = group.owner_id;
        let limit = usize::try_from(self.groups.count_groups(owner)?).unwrap_or(usize::MAX);

        walk_ancestors(group, limit, |id| self.groups.get_group(owner, id)).inspect_err(|e| {
            if let Error::CycleDetected { group_id, limit } = e {
                tracing::error!(
                    owner_id = %owner,
                    group_id = %group_id,
                    limit,
                    "Cycle detected in group parent chain"
                );
            }
        })
    }

    /// Returns the breadcrumb trail of `group`, root first.
    ///
    /// # Errors
    ///
    /// Same as [`TreeNavigator::ancestors`].
    pub fn ancestor_chain(&self, group: &Group) -> Result<Vec<Breadcrumb>> {
        Ok(self.ancestors(group)?.iter().map(Breadcrumb::from).collect())
    }

    /// Returns the direct children of `group` with their counts.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    pub fn children(&self, group: &Group) -> Result<Vec<GroupSummary>> {
        self.groups.list_children(group.owner_id, Some(group.id))
    }

    /// Returns every descendant of `group`, breadth first.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    pub fn descendants(&self, group: &Group) -> Result<Vec<GroupId>> {
        let nodes: Vec<GroupNode> = self
            .groups
            .list_all(group.owner_id)?
            .iter()
            .map(GroupNode::from)
            .collect();
        Ok(collect_descendants(group.id, &nodes))
    }

    /// Returns the owner's whole group forest.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be accessed.
    pub fn forest(&self, owner: OwnerId) -> Result<Vec<TreeNode>> {
        Ok(build_forest(&self.groups.list_all(owner)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteBackend;

    const OWNER: OwnerId = OwnerId::new(1);

    #[test]
    fn test_ancestor_chain_root_first() {
        let backend = Arc::new(SqliteBackend::in_memory().expect("backend"));
        let work = backend.create_group(OWNER, "Work", None).expect("create");
        let projects = backend.create_group(OWNER, "Projects", Some(work.id)).expect("create");
        let alpha = backend.create_group(OWNER, "Alpha", Some(projects.id)).expect("create");

        let navigator = TreeNavigator::new(backend);
        let chain = navigator.ancestor_chain(&alpha).expect("chain");
        let titles: Vec<&str> = chain.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["Work", "Projects"]);
        assert_eq!(chain[0].link, format!("/groups/{}", work.id));

        assert!(navigator.ancestor_chain(&work).expect("root chain").is_empty());
    }

    #[test]
    fn test_children_and_descendants() {
        let backend = Arc::new(SqliteBackend::in_memory().expect("backend"));
        let work = backend.create_group(OWNER, "Work", None).expect("create");
        let projects = backend.create_group(OWNER, "Projects", Some(work.id)).expect("create");
        let alpha = backend.create_group(OWNER, "Alpha", Some(projects.id)).expect("create");

        let navigator = TreeNavigator::new(backend);
        let children = navigator.children(&work).expect("children");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].child_group_count, 1);

        assert_eq!(
            navigator.descendants(&work).expect("descendants"),
            vec![projects.id, alpha.id]
        );

        let forest = navigator.forest(OWNER).expect("forest");
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].children[0].children[0].title, "Alpha");
    }
}
