pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::DatabaseError;
pub use memory::MemoryTable;
pub use models::{Actor, ActorFields, Movie, MovieFields};
pub use postgres::PgStore;
pub use store::{Record, Store};
