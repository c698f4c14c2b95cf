//! In-process table used for local runs (`DATABASE_URL=memory://`) and tests

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::store::{not_found, Record, Store};

struct Rows<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

/// One entity table held in memory. Ids start at 1 and are never reused.
pub struct MemoryTable<T> {
    inner: RwLock<Rows<T>>,
}

impl<T> MemoryTable<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Rows {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> Store<T> for MemoryTable<T> {
    async fn list(&self) -> Result<Vec<T>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().cloned().collect())
    }

    async fn create(&self, fields: T::Fields) -> Result<T, DatabaseError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let record = T::from_fields(inner.last_id, fields);
        inner.rows.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn update(&self, record: &T) -> Result<(), DatabaseError> {
        let mut inner = self.inner.write().await;
        match inner.rows.get_mut(&record.id()) {
            Some(row) => {
                *row = record.clone();
                Ok(())
            }
            None => Err(not_found::<T>(record.id())),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut inner = self.inner.write().await;
        inner
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found::<T>(id))
    }
}
