//! Link commands.

use clap::Subcommand;
use serde_json::{Value, json};

use crate::Result;
use crate::models::{GroupId, LinkId, OwnerId};
use crate::services::ServiceContainer;

use super::to_json;

/// Link subcommands.
#[derive(Debug, Subcommand)]
pub enum LinkAction {
    /// Create a link.
    Add {
        /// Link title.
        title: String,

        /// Absolute URL.
        url: String,

        /// Group to file the link under (repeatable).
        #[arg(short, long = "group")]
        groups: Vec<GroupId>,
    },

    /// Show a link and the groups it is filed under.
    Show {
        /// Link id.
        id: LinkId,
    },

    /// Delete a link.
    Delete {
        /// Link id.
        id: LinkId,
    },

    /// File a link under a group.
    Attach {
        /// Link id.
        id: LinkId,

        /// Group id.
        #[arg(short, long)]
        group: GroupId,
    },

    /// Remove a link from a group.
    Detach {
        /// Link id.
        id: LinkId,

        /// Group id.
        #[arg(short, long)]
        group: GroupId,
    },
}

pub(super) fn execute(
    action: LinkAction,
    owner: OwnerId,
    services: &ServiceContainer,
) -> Result<Value> {
    let links = &services.links;
    match action {
        LinkAction::Add { title, url, groups } => {
            to_json(&links.create_link(owner, &title, &url, &groups)?)
        },
        LinkAction::Show { id } => {
            let link = links.get_link(owner, id)?;
            let groups = links.link_groups(owner, id)?;
            Ok(json!({ "link": to_json(&link)?, "groups": groups }))
        },
        LinkAction::Delete { id } => {
            links.delete_link(owner, id)?;
            Ok(json!({ "deleted": id }))
        },
        LinkAction::Attach { id, group } => {
            let attached = links.attach(owner, group, id)?;
            Ok(json!({ "linkId": id, "groupId": group, "attached": attached }))
        },
        LinkAction::Detach { id, group } => {
            let detached = links.detach(owner, group, id)?;
            Ok(json!({ "linkId": id, "groupId": group, "detached": detached }))
        },
    }
}
