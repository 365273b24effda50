//! Group storage.
//!
//! Groups form a per-owner forest. Each group row stores its parent id; the
//! tree is never materialized in storage.
//!
//! # Invariants kept by the backend
//!
//! - A parent always belongs to the same owner as its child
//! - A group is never its own parent or its own ancestor
//! - Deleting a group never leaves a child pointing at the removed id

mod sqlite;
mod traits;

pub use traits::GroupBackend;
