//! `SQLite` storage backend.
//!
//! A single [`SqliteBackend`] implements every storage trait on one
//! connection, so cross-table changes run in one transaction.

mod backend;
mod connection;
mod metrics;
mod sql;

pub use backend::SqliteBackend;
pub(crate) use backend::{
    GROUP_COLUMNS, LINK_COLUMNS, TAG_COLUMNS, fetch_group, fetch_link, fetch_tag, group_from_row,
    link_from_row, tag_from_row, to_count,
};
pub use connection::{acquire_lock, configure_connection};
pub use metrics::record_operation_metrics;
pub use sql::{contains_pattern, escape_like_wildcards};
