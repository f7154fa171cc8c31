//! Task documents in redb.
//!
//! One table, keyed by the 16 id bytes, values are postcard-encoded
//! [`TaskRecord`]s. Every mutation is a single write transaction.

use redb::{backends::InMemoryBackend, Database, ReadableTable, TableDefinition};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::task_record::{TaskRecord, ValidationError};

const TASKS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("tasks");

#[derive(Debug, Error)]
pub enum TaskDbError {
    #[error("redb: {0}")]
    Redb(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("encode: {0}")]
    Encode(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// redb 2.x has many error types. Blanket them all into TaskDbError::Redb.
macro_rules! from_redb {
    ($($t:ty),*) => {
        $(impl From<$t> for TaskDbError {
            fn from(e: $t) -> Self { TaskDbError::Redb(e.to_string()) }
        })*
    };
}

from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TableError,
    redb::TransactionError,
    redb::StorageError,
    redb::CommitError
);

/// Thin handle to the task table. Cloneable (Arc inside).
#[derive(Clone)]
pub struct TaskDb {
    db: Arc<Database>,
}

impl TaskDb {
    /// Open (or create) the store at the given path.
    pub fn open(path: &str) -> Result<Self, TaskDbError> {
        Self::with_database(Database::create(path)?)
    }

    /// A store that lives only as long as the handle. Used by tests.
    pub fn in_memory() -> Result<Self, TaskDbError> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Self::with_database(db)
    }

    fn with_database(db: Database) -> Result<Self, TaskDbError> {
        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(TASKS_TABLE)?;
        }
        txn.commit()?;
        Ok(TaskDb { db: Arc::new(db) })
    }

    /// All tasks, newest first.
    pub fn list_tasks(&self) -> Result<Vec<TaskRecord>, TaskDbError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(TASKS_TABLE)?;

        let mut tasks = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            tasks.push(decode(value.value())?);
        }

        tasks.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(tasks)
    }

    pub fn get_task(&self, id: Uuid) -> Result<Option<TaskRecord>, TaskDbError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(TASKS_TABLE)?;
        match table.get(id.as_bytes().as_slice())? {
            Some(data) => Ok(Some(decode(data.value())?)),
            None => Ok(None),
        }
    }

    pub fn insert_task(&self, task: &TaskRecord) -> Result<(), TaskDbError> {
        let bytes = encode(task)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(TASKS_TABLE)?;
            table.insert(task.id.as_bytes().as_slice(), bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Read, modify and write back one task inside a single transaction.
    /// Returns `Ok(None)` (and writes nothing) when the id is unknown.
    pub fn find_and_update<F>(&self, id: Uuid, apply: F) -> Result<Option<TaskRecord>, TaskDbError>
    where
        F: FnOnce(TaskRecord) -> Result<TaskRecord, ValidationError>,
    {
        let txn = self.db.begin_write()?;
        let updated = {
            let mut table = txn.open_table(TASKS_TABLE)?;
            let current = match table.get(id.as_bytes().as_slice())? {
                Some(data) => decode(data.value())?,
                None => return Ok(None),
            };
            let updated = apply(current)?;
            let bytes = encode(&updated)?;
            table.insert(id.as_bytes().as_slice(), bytes.as_slice())?;
            updated
        };
        txn.commit()?;
        Ok(Some(updated))
    }

    /// Hard delete. Returns the removed task, or `None` if the id is unknown.
    pub fn find_and_delete(&self, id: Uuid) -> Result<Option<TaskRecord>, TaskDbError> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut table = txn.open_table(TASKS_TABLE)?;
            let removed = table.remove(id.as_bytes().as_slice())?;
            match removed {
                Some(data) => Some(decode(data.value())?),
                None => None,
            }
        };
        txn.commit()?;
        Ok(removed)
    }
}

fn decode(bytes: &[u8]) -> Result<TaskRecord, TaskDbError> {
    postcard::from_bytes(bytes).map_err(|e| TaskDbError::Decode(e.to_string()))
}

fn encode(task: &TaskRecord) -> Result<Vec<u8>, TaskDbError> {
    postcard::to_allocvec(task).map_err(|e| TaskDbError::Encode(e.to_string()))
}
