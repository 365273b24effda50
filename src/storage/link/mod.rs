//! Link storage.
//!
//! Links live in their own table and are filed under groups through the
//! `groupables` association table.

mod sqlite;
mod traits;

pub use traits::LinkBackend;

/// Discriminator stored in `groupables.groupable_type` for links.
pub(crate) const GROUPABLE_LINK: &str = "link";
