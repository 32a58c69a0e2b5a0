/// A single record in a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<T> {
    /// Unique ID of a record. Never reused, even after the record is deleted.
    pub id: u64,
    pub data: T,
}
