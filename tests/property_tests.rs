//! Property-based tests for the group tree.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Titles shorter than three characters are always rejected
//! - Created groups keep the parent they were created with
//! - Ancestor chains end at the direct parent and never contain the group
//! - Every cascade policy leaves no child pointing at a deleted group
//! - Root listings are stable between calls

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashSet;

use linkshelf::models::{GroupId, OwnerId, validate_title};
use linkshelf::services::{CascadePolicy, ServiceContainer};
use linkshelf::ShelfConfig;
use proptest::prelude::*;

const OWNER: OwnerId = OwnerId::new(1);

/// Builds a random tree: entry `i` picks the parent of group `i` among the
/// groups created before it (`None` for a root).
fn tree_shape() -> impl Strategy<Value = Vec<Option<prop::sample::Index>>> {
    prop::collection::vec(prop::option::of(any::<prop::sample::Index>()), 1..16)
}

fn build_tree(
    services: &ServiceContainer,
    shape: &[Option<prop::sample::Index>],
) -> Vec<(GroupId, Option<GroupId>)> {
    let mut created: Vec<(GroupId, Option<GroupId>)> = Vec::new();
    for (i, pick) in shape.iter().enumerate() {
        let parent = match pick {
            Some(index) if !created.is_empty() => Some(created[index.index(created.len())].0),
            _ => None,
        };
        let group = services
            .groups
            .create_group(OWNER, &format!("Group {i:02}"), parent)
            .expect("create group");
        created.push((group.id, parent));
    }
    created
}

proptest! {
    /// Property: titles with fewer than three characters are rejected.
    #[test]
    fn prop_short_titles_rejected(title in "[a-zA-Z ]{0,2}") {
        prop_assert!(validate_title(&title).is_err());
    }

    /// Property: titles with at least three non-blank characters are accepted.
    #[test]
    fn prop_long_titles_accepted(title in "[a-zA-Z0-9]{3,40}") {
        prop_assert!(validate_title(&title).is_ok());
    }

    /// Property: a created group keeps the parent it was created with.
    #[test]
    fn prop_create_keeps_parent(shape in tree_shape()) {
        let services = ServiceContainer::in_memory(&ShelfConfig::default()).unwrap();
        for (id, parent) in build_tree(&services, &shape) {
            let page = services.groups.get_group(OWNER, id, 1).unwrap();
            prop_assert_eq!(page.group.parent_group_id, parent);
        }
    }

    /// Property: the ancestor chain ends at the direct parent and excludes the group.
    #[test]
    fn prop_ancestor_chain_ends_at_parent(shape in tree_shape()) {
        let services = ServiceContainer::in_memory(&ShelfConfig::default()).unwrap();
        let created = build_tree(&services, &shape);

        for (id, parent) in &created {
            let page = services.groups.get_group(OWNER, *id, 1).unwrap();
            match parent {
                None => prop_assert!(page.ancestors.is_empty()),
                Some(parent) => {
                    let last = page.ancestors.last().unwrap();
                    prop_assert_eq!(&last.link, &parent.path());
                },
            }
            prop_assert!(page.ancestors.iter().all(|c| c.link != id.path()));
            prop_assert!(page.ancestors.len() < created.len());
        }
    }

    /// Property: no cascade policy leaves a dangling parent reference.
    #[test]
    fn prop_delete_never_dangles(
        shape in tree_shape(),
        target in any::<prop::sample::Index>(),
        policy in prop::sample::select(vec![
            CascadePolicy::Reparent,
            CascadePolicy::Cascade,
            CascadePolicy::Restrict,
        ]),
    ) {
        let services = ServiceContainer::in_memory(&ShelfConfig::default()).unwrap();
        let created = build_tree(&services, &shape);
        let (target, _) = created[target.index(created.len())];

        let before = services.groups.list_all_groups_flat(OWNER).unwrap();
        let result = services.groups.delete_group_with(OWNER, target, policy);

        let after = services.groups.list_all_groups_flat(OWNER).unwrap();
        let remaining: HashSet<GroupId> = after.iter().map(|g| g.id).collect();
        for group in &after {
            if let Some(parent) = group.parent_group_id {
                prop_assert!(remaining.contains(&parent));
            }
        }

        match result {
            Ok(outcome) => {
                prop_assert!(!remaining.contains(&target));
                prop_assert_eq!(after.len() + outcome.deleted_groups.len(), before.len());
            },
            Err(_) => {
                prop_assert_eq!(policy, CascadePolicy::Restrict);
                prop_assert_eq!(after, before);
            },
        }
    }

    /// Property: listing root groups twice returns identical results.
    #[test]
    fn prop_list_root_groups_idempotent(shape in tree_shape()) {
        let services = ServiceContainer::in_memory(&ShelfConfig::default()).unwrap();
        build_tree(&services, &shape);

        let first = services.groups.list_root_groups(OWNER).unwrap();
        let second = services.groups.list_root_groups(OWNER).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: cascade policy names parse case-insensitively.
    #[test]
    fn prop_cascade_policy_parse(policy in prop::sample::select(vec![
        CascadePolicy::Reparent,
        CascadePolicy::Cascade,
        CascadePolicy::Restrict,
    ])) {
        let upper: CascadePolicy = policy.as_str().to_uppercase().parse().unwrap();
        prop_assert_eq!(upper, policy);
    }
}
