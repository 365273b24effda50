//! Tag commands.

use clap::{Args, Subcommand};
use serde_json::{Value, json};

use crate::models::{GroupId, LinkId, OwnerId, TagId, TaggableRef};
use crate::services::ServiceContainer;
use crate::{Error, Result};

use super::to_json;

/// The group or link a tag command applies to.
#[derive(Debug, Clone, Args)]
#[group(required = false, multiple = false)]
pub struct TargetArgs {
    /// Target group id.
    #[arg(long)]
    pub group: Option<GroupId>,

    /// Target link id.
    #[arg(long)]
    pub link: Option<LinkId>,
}

impl TargetArgs {
    /// Returns the selected target, if any.
    #[must_use]
    pub fn target(&self) -> Option<TaggableRef> {
        self.group
            .map(TaggableRef::Group)
            .or_else(|| self.link.map(TaggableRef::Link))
    }

    fn require(&self) -> Result<TaggableRef> {
        self.target()
            .ok_or_else(|| Error::InvalidInput("either --group or --link is required".to_string()))
    }
}

/// Tag subcommands.
#[derive(Debug, Subcommand)]
pub enum TagAction {
    /// Tag a group or link, creating the tag on first use.
    Add {
        /// Tag name.
        name: String,

        /// Group or link to apply the tag to.
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Remove a tag from a group or link.
    Remove {
        /// Tag id.
        id: TagId,

        /// Group or link to remove the tag from.
        #[command(flatten)]
        target: TargetArgs,
    },

    /// List tags, optionally only those on a group or link.
    List {
        /// Group or link whose tags to list.
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Delete a tag everywhere.
    Delete {
        /// Tag id.
        id: TagId,
    },
}

pub(super) fn execute(
    action: TagAction,
    owner: OwnerId,
    services: &ServiceContainer,
) -> Result<Value> {
    let tags = &services.tags;
    match action {
        TagAction::Add { name, target } => to_json(&tags.tag(owner, &name, target.require()?)?),
        TagAction::Remove { id, target } => {
            let detached = tags.untag(owner, id, target.require()?)?;
            Ok(json!({ "tagId": id, "detached": detached }))
        },
        TagAction::List { target } => match target.target() {
            Some(target) => to_json(&tags.tags_for(owner, target)?),
            None => to_json(&tags.list_tags(owner)?),
        },
        TagAction::Delete { id } => {
            tags.delete_tag(owner, id)?;
            Ok(json!({ "deleted": id }))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_selection() {
        let none = TargetArgs {
            group: None,
            link: None,
        };
        assert!(none.target().is_none());
        assert!(matches!(none.require(), Err(Error::InvalidInput(_))));

        let link = TargetArgs {
            group: None,
            link: Some(LinkId::new(4)),
        };
        assert_eq!(link.target(), Some(TaggableRef::Link(LinkId::new(4))));
    }
}
