use async_trait::async_trait;

use super::manager::DatabaseError;

/// A row type with an auto-assigned integer id
pub trait Record: Clone + Send + Sync + 'static {
    /// Writable columns accepted on create
    type Fields: Send + 'static;

    const TABLE: &'static str;

    fn id(&self) -> i64;

    fn from_fields(id: i64, fields: Self::Fields) -> Self;
}

/// Persistence for one entity table.
///
/// Every write is committed before the call returns. `update` and `delete`
/// report `DatabaseError::NotFound` when the row no longer exists.
#[async_trait]
pub trait Store<T: Record>: Send + Sync {
    /// All rows, ordered by id ascending
    async fn list(&self) -> Result<Vec<T>, DatabaseError>;

    async fn create(&self, fields: T::Fields) -> Result<T, DatabaseError>;

    async fn get(&self, id: i64) -> Result<Option<T>, DatabaseError>;

    async fn update(&self, record: &T) -> Result<(), DatabaseError>;

    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

pub(crate) fn not_found<T: Record>(id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("{}/{}", T::TABLE, id))
}
