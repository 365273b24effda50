//! Tag models.
//!
//! Tags are per-owner labels that attach to groups and links through the
//! `taggables` association table.

use serde::{Deserialize, Serialize};

use super::group::{GroupId, OwnerId};
use super::link::LinkId;
use crate::{Error, Result};

integer_id!(
    /// Unique identifier for a tag.
    TagId
);

impl TagId {
    /// Returns the relative deep link to the tag's page.
    #[must_use]
    pub fn path(self) -> String {
        format!("/tags/{}", self.0)
    }
}

/// A named label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Unique identifier, assigned by storage.
    pub id: TagId,
    /// Tag name, unique per owner.
    pub name: String,
    /// Owning user.
    pub owner_id: OwnerId,
}

impl Tag {
    /// Normalises and validates a tag name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the name is blank.
    pub fn normalize_name(name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation {
                field: "name",
                message: "must not be empty".to_string(),
            });
        }
        Ok(name.to_string())
    }
}

/// An entity a tag can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum TaggableRef {
    /// A group.
    Group(GroupId),
    /// A link.
    Link(LinkId),
}

impl TaggableRef {
    /// Type discriminator stored in the association table.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Group(_) => "group",
            Self::Link(_) => "link",
        }
    }

    /// Raw id stored in the association table.
    #[must_use]
    pub const fn raw_id(&self) -> i64 {
        match self {
            Self::Group(id) => id.get(),
            Self::Link(id) => id.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(Tag::normalize_name("  rust ").expect("valid"), "rust");
        assert!(Tag::normalize_name("   ").is_err());
    }

    #[test]
    fn test_taggable_ref() {
        let group = TaggableRef::Group(GroupId::new(2));
        assert_eq!(group.type_name(), "group");
        assert_eq!(group.raw_id(), 2);

        let link = TaggableRef::Link(LinkId::new(5));
        assert_eq!(link.type_name(), "link");
        assert_eq!(link.raw_id(), 5);
        assert_eq!(TagId::new(4).path(), "/tags/4");
    }
}
