//! Data models for groups, links, tags and their searchable projections.
//!
//! Records reference each other by id only. Parents are resolved through
//! storage lookups, never through embedded pointers, so every structure here
//! is plain data that serializes cleanly.

/// Declares an integer-backed identifier newtype.
macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database identifier.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw identifier.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::Error;

            fn from_str(s: &str) -> crate::Result<Self> {
                s.trim().parse::<i64>().map(Self).map_err(|_| {
                    crate::Error::InvalidInput(format!(
                        "{} must be an integer: {s}",
                        stringify!($name)
                    ))
                })
            }
        }
    };
}

pub mod group;
pub mod link;
pub mod search;
pub mod tag;

pub use group::{
    Breadcrumb, Group, GroupId, GroupListing, GroupNode, GroupPage, GroupSummary, OwnerId,
    ParentUpdate, TITLE_MIN_LEN, TreeNode, validate_parent, validate_title,
};
pub use link::{Link, LinkId, LinkSummary, Page};
pub use search::{SearchResult, Searchable, SearchableType};
pub use tag::{Tag, TagId, TaggableRef};
