//! Read-through catalog and its builder

mod builder;
mod read_through;

pub use builder::{Mimir, MimirBuilder};
pub use read_through::ReadThroughCatalog;
