use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::{Db, Tree};
use tracing::trace;

use crate::encoding::{decode, encode, increment};
use crate::record::Record;
use crate::result::{DbResult, RosterError};

/// Tree holding every table's last handed out ID, keyed by table name.
pub(crate) const META_TREE: &str = "__roster_meta";

/// Table names starting with this prefix belong to the engine (sled's default
/// tree, [`META_TREE`]) and cannot be opened as tables.
pub(crate) const RESERVED_PREFIX: &str = "__";

pub trait TableType: Serialize + DeserializeOwned + Clone + Debug {}
impl<T: Serialize + DeserializeOwned + Debug + Clone> TableType for T {}

/// Provides methods for interacting with a typed table.
pub struct Table<T: TableType + 'static>(pub(crate) Arc<TableInner<T>>);

impl<T: TableType> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: TableType> Deref for Table<T> {
    type Target = Arc<TableInner<T>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub struct TableInner<T>
where
    T: TableType + 'static,
{
    root: Tree,
    /// Shared counter tree, see [`META_TREE`].
    meta: Tree,
    name: String,
    _table_type: PhantomData<T>,
}

impl<T> TableInner<T>
where
    T: TableType,
{
    /// Creates a new table with the given engine and name.
    ///
    /// This method is intended for internal use and should not be called directly. Instead, use the
    /// [`crate::Roster`]'s `open_table()` method.
    ///
    /// # Arguments
    ///
    /// * `engine` - The database engine.
    /// * `name` - The name of the table.
    pub(crate) fn new(engine: &Db, name: &str) -> DbResult<Self> {
        if name.starts_with(RESERVED_PREFIX) {
            return Err(RosterError::ReservedName(name.to_owned()));
        }

        Ok(Self {
            root: engine.open_tree(name)?,
            meta: engine.open_tree(META_TREE)?,
            name: name.to_owned(),
            _table_type: PhantomData,
        })
    }

    /// Advance the table's counter and return the new ID.
    ///
    /// IDs start at 1 and only ever grow, so an ID freed by a delete is never
    /// handed out again.
    fn generate_id(&self) -> DbResult<u64> {
        Ok(match self.meta.fetch_and_update(self.name.as_bytes(), increment)? {
            Some(previous) => decode::<u64>(&previous)? + 1,
            None => 1,
        })
    }

    /// Insert a new record at the end of the table.
    ///
    /// # Arguments
    ///
    /// * `value` - The value to insert.
    ///
    /// # Returns
    ///
    /// The ID of the new record.
    pub fn insert(&self, value: T) -> DbResult<u64> {
        let id = self.generate_id()?;
        self.root.insert(encode(&id)?, encode(&value)?)?;

        trace!(table = %self.name, id, "inserted record");
        Ok(id)
    }

    /// Select a record by its ID.
    ///
    /// # Returns
    ///
    /// An [`Option`] containing the selected record if it exists, or [`None`] otherwise.
    pub fn select(&self, id: u64) -> DbResult<Option<Record<T>>> {
        if let Some(serialized) = self.root.get(encode(&id)?)? {
            Ok(Some(Record {
                id,
                data: decode(&serialized)?,
            }))
        } else {
            Ok(None)
        }
    }

    /// Delete a record by its ID.
    ///
    /// # Returns
    ///
    /// An [`Option`] containing the deleted record if it exists, or [`None`] otherwise.
    pub fn delete(&self, id: u64) -> DbResult<Option<Record<T>>> {
        if let Some(serialized) = self.root.remove(encode(&id)?)? {
            trace!(table = %self.name, id, "removed record");

            Ok(Some(Record {
                id,
                data: decode(&serialized)?,
            }))
        } else {
            Ok(None)
        }
    }

    /// Replace the value of an existing record, keeping its ID and position.
    ///
    /// Nothing is written when no record has the given ID.
    ///
    /// # Returns
    ///
    /// An [`Option`] containing the updated record if it exists, or [`None`] otherwise.
    pub fn update(&self, id: u64, value: T) -> DbResult<Option<Record<T>>> {
        let serialized_value = encode(&value)?;

        let previous = self
            .root
            .fetch_and_update(encode(&id)?, |old_value| {
                old_value.map(|_| serialized_value.clone())
            })?;

        Ok(previous.map(|_| {
            trace!(table = %self.name, id, "updated record");
            Record { id, data: value }
        }))
    }

    /// Iterate over every record in ID order, which is also insertion order.
    pub fn iter(&self) -> impl Iterator<Item = DbResult<Record<T>>> + '_ {
        self.root.iter().map(|entry| -> DbResult<Record<T>> {
            let (key, value) = entry?;

            Ok(Record {
                id: decode(&key)?,
                data: decode(&value)?,
            })
        })
    }

    /// Collect every record in insertion order.
    pub fn all(&self) -> DbResult<Vec<Record<T>>> {
        self.iter().collect()
    }

    /// Linear scan keeping the records whose value matches `predicate`.
    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> DbResult<Vec<Record<T>>> {
        let mut matches = vec![];

        for record in self.iter() {
            let record = record?;
            if predicate(&record.data) {
                matches.push(record);
            }
        }

        Ok(matches)
    }

    /// Number of records currently in the table.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}
