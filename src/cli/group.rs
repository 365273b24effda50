//! Group commands.

use clap::Subcommand;
use serde_json::Value;

use crate::models::{GroupId, OwnerId};
use crate::services::{CascadePolicy, ServiceContainer};
use crate::Result;

use super::to_json;

/// Group subcommands.
#[derive(Debug, Subcommand)]
pub enum GroupAction {
    /// List root groups with child and link counts.
    Roots,

    /// Show a group with its breadcrumbs, children and links.
    Show {
        /// Group id.
        id: GroupId,

        /// Page of links to show (1-based).
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// List the direct children of a group.
    Children {
        /// Group id.
        id: GroupId,
    },

    /// List every group below a group, breadth first.
    Descendants {
        /// Group id.
        id: GroupId,
    },

    /// Create a group.
    Create {
        /// Group title (at least 3 characters).
        title: String,

        /// Parent group id; omit for a root group.
        #[arg(short, long)]
        parent: Option<GroupId>,
    },

    /// Update a group's title and parent.
    ///
    /// Omitting `--parent` moves the group to the root level.
    Update {
        /// Group id.
        id: GroupId,

        /// New title.
        title: String,

        /// New parent group id.
        #[arg(short, long)]
        parent: Option<GroupId>,
    },

    /// Rename a group, keeping its parent.
    Rename {
        /// Group id.
        id: GroupId,

        /// New title.
        title: String,
    },

    /// Delete a group.
    Delete {
        /// Group id.
        id: GroupId,

        /// Cascade policy: reparent, cascade or restrict.
        #[arg(long)]
        policy: Option<CascadePolicy>,
    },

    /// List every group with its parent, for parent pickers.
    List,

    /// Print the whole group tree.
    Tree,
}

pub(super) fn execute(
    action: GroupAction,
    owner: OwnerId,
    services: &ServiceContainer,
) -> Result<Value> {
    let groups = &services.groups;
    match action {
        GroupAction::Roots => to_json(&groups.list_root_groups(owner)?),
        GroupAction::Show { id, page } => to_json(&groups.get_group(owner, id, page)?),
        GroupAction::Children { id } => to_json(&groups.list_children(owner, id)?),
        GroupAction::Descendants { id } => to_json(&groups.descendants(owner, id)?),
        GroupAction::Create { title, parent } => {
            to_json(&groups.create_group(owner, &title, parent)?)
        },
        GroupAction::Update { id, title, parent } => {
            to_json(&groups.update_group(owner, id, &title, parent)?)
        },
        GroupAction::Rename { id, title } => to_json(&groups.rename_group(owner, id, &title)?),
        GroupAction::Delete { id, policy } => {
            let policy = policy.unwrap_or_else(|| groups.policy());
            to_json(&groups.delete_group_with(owner, id, policy)?)
        },
        GroupAction::List => to_json(&groups.list_all_groups_flat(owner)?),
        GroupAction::Tree => to_json(&groups.tree(owner)?),
    }
}
