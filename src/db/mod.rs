pub mod model;
pub mod repo;
pub mod sqlite;

#[cfg(test)]
pub(crate) mod fixtures;

pub use model::*;
pub use repo::*;
pub use sqlite::SqliteRepository;
