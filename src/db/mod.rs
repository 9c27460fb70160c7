pub mod model;
pub mod repo;
pub mod sqlite;
pub mod store;

pub use model::*;
pub use repo::*;
pub use sqlite::SqliteRepository;
pub use store::{MovieStore, StoreState};
