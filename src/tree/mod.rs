//! Tree algorithms over the group forest.
//!
//! Groups reference their parent by id. These functions resolve parents
//! through a lookup (or a flat node list) and never recurse, so a corrupted
//! parent chain is reported instead of overflowing the stack or looping.

pub mod cascade;

use std::collections::{HashMap, HashSet};

use crate::models::{Group, GroupId, GroupNode, TreeNode};
use crate::{Error, Result};

/// Collects the ancestors of `group`, root first, excluding `group` itself.
///
/// Parents are resolved one at a time through `lookup`. The walk stops at the
/// first group without a parent, or when `lookup` cannot resolve a parent
/// (a parent outside the owner's scope ends the trail).
///
/// # Errors
///
/// Returns [`Error::CycleDetected`] if a group is visited twice or more than
/// `limit` parents are resolved. Errors from `lookup` are propagated.
pub fn walk_ancestors<F>(group: &Group, limit: usize, mut lookup: F) -> Result<Vec<Group>>
where
    F: FnMut(GroupId) -> Result<Option<Group>>,
{
    let mut visited = HashSet::from([group.id]);
    let mut ancestors = Vec::new();
    let mut next = group.parent_group_id;

    while let Some(parent_id) = next {
        if ancestors.len() >= limit || !visited.insert(parent_id) {
            return Err(Error::CycleDetected {
                group_id: group.id,
                limit,
            });
        }
        let Some(parent) = lookup(parent_id)? else {
            break;
        };
        next = parent.parent_group_id;
        ancestors.push(parent);
    }

    // Collected leaf to root.
    ancestors.reverse();
    Ok(ancestors)
}

/// Returns every descendant of `root` in breadth-first order, excluding `root`.
///
/// Nodes reachable twice (corrupted data) are emitted once.
#[must_use]
pub fn collect_descendants(root: GroupId, nodes: &[GroupNode]) -> Vec<GroupId> {
    let children = children_by_parent(nodes);
    let mut visited = HashSet::from([root]);
    let mut order = Vec::new();
    let mut cursor = 0;
    let mut frontier = vec![root];

    while cursor < frontier.len() {
        let current = frontier[cursor];
        cursor += 1;
        for &child in children.get(&current).map_or(&[][..], Vec::as_slice) {
            if visited.insert(child) {
                order.push(child);
                frontier.push(child);
            }
        }
    }

    order
}

/// Builds the nested forest from groups already sorted by title.
///
/// Groups whose parent is missing from `groups` are treated as roots so that
/// nothing disappears from the dump. Groups that are only reachable through a
/// parent cycle are also promoted to roots, with the cycle cut at that point.
#[must_use]
pub fn build_forest(groups: &[Group]) -> Vec<TreeNode> {
    let known: HashSet<GroupId> = groups.iter().map(|g| g.id).collect();
    let titles: HashMap<GroupId, &str> = groups.iter().map(|g| (g.id, g.title.as_str())).collect();
    let nodes: Vec<GroupNode> = groups.iter().map(GroupNode::from).collect();
    let children = children_by_parent(&nodes);

    let mut placed = HashSet::new();
    let mut forest = Vec::new();

    let roots = groups
        .iter()
        .filter(|g| g.parent_group_id.is_none_or(|p| !known.contains(&p)))
        .map(|g| g.id);
    for root in roots {
        forest.push(build_subtree(root, &children, &titles, &mut placed));
    }

    // Anything left is caught in a cycle.
    for group in groups {
        if !placed.contains(&group.id) {
            forest.push(build_subtree(group.id, &children, &titles, &mut placed));
        }
    }

    forest
}

fn children_by_parent(nodes: &[GroupNode]) -> HashMap<GroupId, Vec<GroupId>> {
    let mut children: HashMap<GroupId, Vec<GroupId>> = HashMap::new();
    for node in nodes {
        if let Some(parent) = node.parent_group_id {
            children.entry(parent).or_default().push(node.id);
        }
    }
    children
}

/// Builds one subtree without recursion.
fn build_subtree(
    root: GroupId,
    children: &HashMap<GroupId, Vec<GroupId>>,
    titles: &HashMap<GroupId, &str>,
    placed: &mut HashSet<GroupId>,
) -> TreeNode {
    placed.insert(root);

    // Discover nodes top-down, then assemble them bottom-up.
    let mut order = vec![(root, None::<usize>)];
    let mut cursor = 0;
    while cursor < order.len() {
        let (id, _) = order[cursor];
        for &child in children.get(&id).map_or(&[][..], Vec::as_slice) {
            if placed.insert(child) {
                order.push((child, Some(cursor)));
            }
        }
        cursor += 1;
    }

    let mut built: Vec<Option<TreeNode>> = order
        .iter()
        .map(|(id, _)| {
            Some(TreeNode {
                id: *id,
                title: titles.get(id).copied().unwrap_or_default().to_string(),
                children: Vec::new(),
            })
        })
        .collect();

    for index in (1..order.len()).rev() {
        let (_, parent) = order[index];
        if let (Some(parent), Some(node)) = (parent, built[index].take())
            && let Some(parent_node) = built[parent].as_mut()
        {
            parent_node.children.push(node);
        }
    }

    // Children were attached in reverse discovery order.
    let mut root_node = built[0].take().unwrap_or(TreeNode {
        id: root,
        title: String::new(),
        children: Vec::new(),
    });
    restore_child_order(&mut root_node);
    root_node
}

fn restore_child_order(root: &mut TreeNode) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        node.children.reverse();
        stack.extend(node.children.iter_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OwnerId;

    fn group(id: i64, title: &str, parent: Option<i64>) -> Group {
        Group {
            id: GroupId::new(id),
            title: title.to_string(),
            parent_group_id: parent.map(GroupId::new),
            owner_id: OwnerId::new(1),
            created_at: 0,
            updated_at: 0,
        }
    }

    fn lookup_in(groups: &[Group]) -> impl FnMut(GroupId) -> Result<Option<Group>> + '_ {
        move |id| Ok(groups.iter().find(|g| g.id == id).cloned())
    }

    #[test]
    fn test_walk_ancestors_root_first() {
        let groups = vec![
            group(1, "Work", None),
            group(2, "Projects", Some(1)),
            group(3, "Alpha", Some(2)),
        ];
        let chain = walk_ancestors(&groups[2], groups.len(), lookup_in(&groups))
            .expect("walk should succeed");
        let titles: Vec<_> = chain.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Work", "Projects"]);
    }

    #[test]
    fn test_walk_ancestors_of_root_is_empty() {
        let groups = vec![group(1, "Work", None)];
        let chain =
            walk_ancestors(&groups[0], 1, lookup_in(&groups)).expect("walk should succeed");
        assert!(chain.is_empty());
    }

    #[test]
    fn test_walk_ancestors_stops_at_unresolved_parent() {
        let groups = vec![group(2, "Projects", Some(99)), group(3, "Alpha", Some(2))];
        let chain =
            walk_ancestors(&groups[1], 2, lookup_in(&groups)).expect("walk should succeed");
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].id, GroupId::new(2));
    }

    #[test]
    fn test_walk_ancestors_detects_cycle() {
        let groups = vec![group(1, "Loop A", Some(2)), group(2, "Loop B", Some(1))];
        let result = walk_ancestors(&groups[0], 10, lookup_in(&groups));
        assert!(matches!(
            result,
            Err(Error::CycleDetected { group_id, .. }) if group_id == GroupId::new(1)
        ));
    }

    #[test]
    fn test_walk_ancestors_respects_limit() {
        let groups = vec![
            group(1, "Work", None),
            group(2, "Projects", Some(1)),
            group(3, "Alpha", Some(2)),
        ];
        let result = walk_ancestors(&groups[2], 1, lookup_in(&groups));
        assert!(matches!(result, Err(Error::CycleDetected { limit: 1, .. })));
    }

    #[test]
    fn test_collect_descendants_breadth_first() {
        let groups = [
            group(1, "Work", None),
            group(2, "Projects", Some(1)),
            group(3, "Alpha", Some(2)),
            group(4, "Notes", Some(1)),
            group(5, "Home", None),
        ];
        let nodes: Vec<GroupNode> = groups.iter().map(GroupNode::from).collect();
        let descendants = collect_descendants(GroupId::new(1), &nodes);
        assert_eq!(
            descendants,
            vec![GroupId::new(2), GroupId::new(4), GroupId::new(3)]
        );
        assert!(collect_descendants(GroupId::new(5), &nodes).is_empty());
    }

    #[test]
    fn test_collect_descendants_survives_cycle() {
        let nodes = vec![
            GroupNode {
                id: GroupId::new(1),
                parent_group_id: Some(GroupId::new(2)),
            },
            GroupNode {
                id: GroupId::new(2),
                parent_group_id: Some(GroupId::new(1)),
            },
        ];
        assert_eq!(
            collect_descendants(GroupId::new(1), &nodes),
            vec![GroupId::new(2)]
        );
    }

    #[test]
    fn test_build_forest_nests_children_in_order() {
        let groups = vec![
            group(3, "Alpha", Some(2)),
            group(5, "Home", None),
            group(4, "Notes", Some(1)),
            group(2, "Projects", Some(1)),
            group(1, "Work", None),
        ];
        let forest = build_forest(&groups);
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].title, "Home");
        assert_eq!(forest[1].title, "Work");

        let work_children: Vec<_> = forest[1].children.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(work_children, vec!["Notes", "Projects"]);
        assert_eq!(forest[1].children[1].children[0].title, "Alpha");
    }

    #[test]
    fn test_build_forest_keeps_cyclic_groups() {
        let groups = vec![group(1, "Loop A", Some(2)), group(2, "Loop B", Some(1))];
        let forest = build_forest(&groups);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, GroupId::new(1));
        assert_eq!(forest[0].children[0].id, GroupId::new(2));
        assert!(forest[0].children[0].children.is_empty());
    }
}
