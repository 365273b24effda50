//! # Linkshelf
//!
//! Owner-scoped bookmark groups.
//!
//! Links are organised into a tree of named groups that can nest arbitrarily
//! deep. Every read and write is scoped to the acting owner, breadcrumbs are
//! resolved by walking parent ids, and deleting a group applies an explicit
//! cascade policy so no child is ever left pointing at a removed parent.
//!
//! ## Example
//!
//! ```rust
//! use linkshelf::models::OwnerId;
//! use linkshelf::services::ServiceContainer;
//! use linkshelf::ShelfConfig;
//!
//! let services = ServiceContainer::in_memory(&ShelfConfig::default())?;
//!
//! let owner = OwnerId::new(1);
//! let work = services.groups.create_group(owner, "Work", None)?;
//! let projects = services.groups.create_group(owner, "Projects", Some(work.id))?;
//!
//! // Deleting "Work" moves "Projects" to the root level.
//! services.groups.delete_group(owner, work.id)?;
//! let roots = services.groups.list_root_groups(owner)?;
//! assert_eq!(roots[0].id, projects.id);
//! # Ok::<(), linkshelf::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
pub mod tree;

pub use config::{LoggingSettings, ShelfConfig};
pub use models::{
    Breadcrumb, Group, GroupId, GroupListing, GroupSummary, Link, LinkId, LinkSummary, OwnerId,
    Page, SearchResult, Tag, TagId,
};
pub use services::{
    CascadeOutcome, CascadePolicy, GroupService, LinkService, OwnerScope, SearchService,
    ServiceContainer, TagService, TreeNavigator,
};
pub use storage::{GroupBackend, LinkBackend, SqliteBackend, StorageFactory, TagBackend};

/// Error type for linkshelf operations.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Validation` | Group title shorter than three characters, empty tag name, unparsable link URL |
/// | `Reference` | Parent group missing, owned by someone else, or below the group being moved |
/// | `NotFound` | The target record does not exist for the acting owner |
/// | `SelfReference` | A group is named as its own parent |
/// | `CycleDetected` | An ancestor walk exceeds the number of groups the owner has |
/// | `Conflict` | Deletion refused because the group still has children |
/// | `InvalidInput` | Configuration or command line values cannot be parsed |
/// | `OperationFailed` | `SQLite` or filesystem failures |
#[derive(Debug, ThisError)]
pub enum Error {
    /// A field failed validation.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The offending field.
        field: &'static str,
        /// Human-readable reason.
        message: String,
    },

    /// A reference to another record could not be honoured.
    ///
    /// Foreign and missing parents are reported the same way so that the
    /// existence of other owners' groups is never revealed.
    #[error("invalid {field}: {message}")]
    Reference {
        /// The offending field.
        field: &'static str,
        /// Human-readable reason.
        message: String,
    },

    /// The record does not exist for the acting owner.
    #[error("not found: {0}")]
    NotFound(String),

    /// A group was named as its own parent.
    #[error("group {0} cannot be its own parent")]
    SelfReference(GroupId),

    /// The parent chain of a group loops or is deeper than the owner's group count.
    #[error("cycle detected above group {group_id} after {limit} steps")]
    CycleDetected {
        /// The group whose ancestors were being walked.
        group_id: GroupId,
        /// The walk bound that was exceeded.
        limit: usize,
    },

    /// The operation conflicts with the current state of the tree.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Builds an [`Error::OperationFailed`] from any displayable cause.
    pub fn operation(operation: &str, cause: impl std::fmt::Display) -> Self {
        Self::OperationFailed {
            operation: operation.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Builds an [`Error::NotFound`] for a record of the given kind.
    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{kind} {id}"))
    }

    /// Builds the [`Error::Reference`] reported for an unusable parent group.
    ///
    /// Missing and foreign parents share one message.
    pub fn unknown_parent(parent: GroupId) -> Self {
        Self::Reference {
            field: "parentGroupId",
            message: format!("group {parent} does not exist"),
        }
    }

    /// Returns `true` for errors that describe bad caller input rather than a failure.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Reference { .. } | Self::NotFound(_) | Self::Conflict(_)
        )
    }
}

/// Result type alias for linkshelf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in seconds.
///
/// Falls back to 0 if the system clock is before the Unix epoch.
#[must_use]
pub fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_secs()).ok())
        .unwrap_or(0)
}
