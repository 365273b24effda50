//! CLI command implementations.
//!
//! The command line is the request handler in front of the services: it
//! resolves the acting owner from `--owner` (or `LINKSHELF_OWNER`), calls one
//! service operation and returns its result as JSON.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `group` | Create, update, delete, list and show groups |
//! | `link` | Create, delete, file and unfile links |
//! | `tag` | Attach, detach, list and delete tags |
//! | `search` | Search groups, tags and links |
//!
//! # Example Usage
//!
//! ```bash
//! # Create a root group and a child group
//! linkshelf --owner 1 group create Work
//! linkshelf --owner 1 group create Projects --parent 1
//!
//! # Show a group with breadcrumbs, children and links
//! linkshelf --owner 1 group show 2
//!
//! # Delete a group, deleting its subtree instead of reparenting
//! linkshelf --owner 1 group delete 1 --policy cascade
//! ```

mod group;
mod link;
mod tag;

pub use group::GroupAction;
pub use link::LinkAction;
pub use tag::{TagAction, TargetArgs};

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use crate::models::OwnerId;
use crate::services::ServiceContainer;
use crate::{Error, Result};

/// Linkshelf - owner-scoped bookmark groups.
#[derive(Debug, Parser)]
#[command(name = "linkshelf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the database, overriding the configuration.
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Acting owner id.
    #[arg(long, env = "LINKSHELF_OWNER", global = true)]
    pub owner: Option<OwnerId>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage groups.
    Group {
        /// Group subcommand.
        #[command(subcommand)]
        action: GroupAction,
    },

    /// Manage links.
    Link {
        /// Link subcommand.
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Manage tags.
    Tag {
        /// Tag subcommand.
        #[command(subcommand)]
        action: TagAction,
    },

    /// Search groups, tags and links.
    Search {
        /// The search query.
        query: Option<String>,

        /// Print every searchable record instead of matches.
        #[arg(long, conflicts_with = "query")]
        all: bool,
    },
}

impl Cli {
    /// Returns the acting owner.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no owner was given.
    pub fn owner(&self) -> Result<OwnerId> {
        self.owner.ok_or_else(|| {
            Error::InvalidInput("an owner is required (--owner or LINKSHELF_OWNER)".to_string())
        })
    }
}

/// Runs a command against `services` and returns its JSON output.
///
/// # Errors
///
/// Returns the error of the service operation.
pub fn execute(command: Commands, owner: OwnerId, services: &ServiceContainer) -> Result<Value> {
    match command {
        Commands::Group { action } => group::execute(action, owner, services),
        Commands::Link { action } => link::execute(action, owner, services),
        Commands::Tag { action } => tag::execute(action, owner, services),
        Commands::Search { all: true, .. } => to_json(&services.search.index_records(owner)?),
        Commands::Search { query, .. } => {
            to_json(&services.search.search(owner, query.as_deref().unwrap_or_default())?)
        },
    }
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::operation("serialize_output", e))
}
