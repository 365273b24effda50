//! Tag storage.

mod sqlite;
mod traits;

pub use traits::TagBackend;
