//! Cascade planning for group deletion.
//!
//! Deleting a group must never leave a child pointing at the removed id. The
//! planner turns a [`CascadePolicy`] and a snapshot of the owner's tree into
//! an explicit [`CascadePlan`]; storage applies the plan inside the same
//! transaction that took the snapshot.
//!
//! | Policy | Child groups | Link and tag associations |
//! |--------|--------------|---------------------------|
//! | `Reparent` (default) | moved to the deleted group's parent, or to the root level | detached |
//! | `Cascade` | deleted with all their descendants | detached for every deleted group |
//! | `Restrict` | deletion refused while children exist | untouched |
//!
//! Links themselves are never deleted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::collect_descendants;
use crate::models::{GroupId, GroupNode};
use crate::{Error, Result};

/// What happens to child groups when their parent is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CascadePolicy {
    /// Move children to the deleted group's parent.
    #[default]
    Reparent,
    /// Delete the whole subtree.
    Cascade,
    /// Refuse to delete a group that still has children.
    Restrict,
}

impl CascadePolicy {
    /// Returns the policy as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reparent => "reparent",
            Self::Cascade => "cascade",
            Self::Restrict => "restrict",
        }
    }
}

impl fmt::Display for CascadePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CascadePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "reparent" => Ok(Self::Reparent),
            "cascade" => Ok(Self::Cascade),
            "restrict" => Ok(Self::Restrict),
            other => Err(Error::InvalidInput(format!(
                "unknown cascade policy '{other}' (expected reparent, cascade or restrict)"
            ))),
        }
    }
}

/// The row changes needed to delete a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadePlan {
    /// Direct children that move to `new_parent`.
    pub reparent: Vec<GroupId>,
    /// Parent the moved children end up under.
    pub new_parent: Option<GroupId>,
    /// Groups to delete, children before parents, target last.
    pub delete: Vec<GroupId>,
}

/// Summary of an applied cascade.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeOutcome {
    /// Policy that was applied.
    pub policy: CascadePolicy,
    /// Every deleted group, target last.
    pub deleted_groups: Vec<GroupId>,
    /// Children that were moved.
    pub reparented_groups: Vec<GroupId>,
    /// Where moved children now live.
    pub new_parent: Option<GroupId>,
    /// Link associations removed.
    pub detached_links: u64,
    /// Tag associations removed.
    pub detached_tags: u64,
}

/// Plans the deletion of `target` under `policy`.
///
/// `nodes` is the owner's full set of `(id, parent)` pairs.
///
/// # Errors
///
/// Returns [`Error::Conflict`] under [`CascadePolicy::Restrict`] when the
/// target still has children.
pub fn plan_cascade(
    policy: CascadePolicy,
    target: GroupNode,
    nodes: &[GroupNode],
) -> Result<CascadePlan> {
    let children: Vec<GroupId> = nodes
        .iter()
        .filter(|n| n.parent_group_id == Some(target.id) && n.id != target.id)
        .map(|n| n.id)
        .collect();

    match policy {
        CascadePolicy::Reparent => Ok(CascadePlan {
            // A corrupted grandparent that is also a child would dangle again.
            new_parent: target.parent_group_id.filter(|p| !children.contains(p)),
            reparent: children,
            delete: vec![target.id],
        }),
        CascadePolicy::Cascade => {
            let mut delete = collect_descendants(target.id, nodes);
            delete.reverse();
            delete.push(target.id);
            Ok(CascadePlan {
                reparent: Vec::new(),
                new_parent: None,
                delete,
            })
        },
        CascadePolicy::Restrict => {
            if children.is_empty() {
                Ok(CascadePlan {
                    reparent: Vec::new(),
                    new_parent: None,
                    delete: vec![target.id],
                })
            } else {
                Err(Error::Conflict(format!(
                    "group {} still has {} child group(s)",
                    target.id,
                    children.len()
                )))
            }
        },
    }
}
