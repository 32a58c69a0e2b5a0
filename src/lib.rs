use std::sync::Arc;

use sled::Config;

pub mod form;
pub use form::{StudentForm, ValidationError};

pub mod result;
pub use result::{DbResult, RosterError};

pub mod record;
pub use record::Record;

pub mod session;
pub use session::{Event, Notice, Response, Session};

pub mod store;
pub use store::StudentStore;

pub mod student;
pub use student::{Gender, Student};

pub mod table;
pub use table::Table;
use table::{TableInner, TableType};

mod encoding;

/// Name of the table backing [`StudentStore`].
pub const STUDENTS_TABLE: &str = "students";

/// A tiny session-scoped record database based on sled.
///
/// The engine is always temporary: everything written through a `Roster` is
/// discarded when the last handle to it is dropped.
pub struct Roster {
    engine: sled::Db,
}

impl Roster {
    /// Create a new in-memory `Roster`.
    ///
    /// # Errors
    ///
    /// Returns an error if sled could not open its temporary storage.
    pub fn new() -> DbResult<Self> {
        Ok(Self {
            engine: Config::new().temporary(true).open()?,
        })
    }

    /// Open a table for a given type.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the table.
    ///
    /// # Errors
    ///
    /// Names starting with `__` are reserved for the engine and are refused.
    pub fn open_table<T: TableType>(&self, name: &str) -> DbResult<Table<T>> {
        Ok(Table(Arc::new(TableInner::new(&self.engine, name)?)))
    }

    /// Open the student store.
    pub fn students(&self) -> DbResult<StudentStore> {
        Ok(StudentStore::new(self.open_table(STUDENTS_TABLE)?))
    }
}
