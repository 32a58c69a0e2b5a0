use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::record::Record;
use crate::result::DbResult;
use crate::student::{Gender, Student};
use crate::table::Table;

/// The student record store.
///
/// Wraps a [`Table<Student>`] with the operations a front end needs. Records
/// come back in insertion order and IDs are never handed out twice within a
/// store's lifetime.
///
/// The store does not validate its input; presence and range checks belong to
/// the caller (see [`crate::StudentForm`]).
#[derive(Clone)]
pub struct StudentStore {
    table: Table<Student>,
}

impl StudentStore {
    pub(crate) fn new(table: Table<Student>) -> Self {
        Self { table }
    }

    /// Append a new student and return the created record.
    pub fn add(
        &self,
        name: impl Into<String>,
        age: u8,
        gender: Gender,
        course: impl Into<String>,
    ) -> DbResult<Record<Student>> {
        let data = Student::new(name, age, gender, course);
        let id = self.table.insert(data.clone())?;

        debug!(id, name = %data.name, "added student");
        Ok(Record { id, data })
    }

    /// Replace every field of the student with the given ID.
    ///
    /// # Returns
    ///
    /// The updated record, or [`None`] if no student has that ID. Nothing is
    /// changed in that case.
    pub fn update(
        &self,
        id: u64,
        name: impl Into<String>,
        age: u8,
        gender: Gender,
        course: impl Into<String>,
    ) -> DbResult<Option<Record<Student>>> {
        let updated = self
            .table
            .update(id, Student::new(name, age, gender, course))?;

        match &updated {
            Some(record) => debug!(id, name = %record.data.name, "updated student"),
            None => debug!(id, "update skipped, no such student"),
        }

        Ok(updated)
    }

    /// Remove the student with the given ID, returning it if it existed.
    pub fn delete(&self, id: u64) -> DbResult<Option<Record<Student>>> {
        let removed = self.table.delete(id)?;

        if removed.is_some() {
            debug!(id, "deleted student");
        } else {
            debug!(id, "delete skipped, no such student");
        }

        Ok(removed)
    }

    /// Students whose name or course contains `query`, ignoring case.
    ///
    /// An empty query matches everyone.
    pub fn search(&self, query: &str) -> DbResult<Vec<Record<Student>>> {
        let needle = query.to_lowercase();
        let results = self.table.filter(|student| student.matches_lowercase(&needle))?;

        trace!(query, hits = results.len(), "searched students");
        Ok(results)
    }

    /// Every student in insertion order.
    pub fn list(&self) -> DbResult<Vec<Record<Student>>> {
        self.table.all()
    }

    pub fn get(&self, id: u64) -> DbResult<Option<Record<Student>>> {
        self.table.select(id)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of students of each age, ordered by age.
    pub fn age_distribution(&self) -> DbResult<BTreeMap<u8, usize>> {
        let mut counts = BTreeMap::new();

        for record in self.table.iter() {
            *counts.entry(record?.data.age).or_insert(0) += 1;
        }

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Roster;

    fn store() -> (Roster, StudentStore) {
        let db = Roster::new().unwrap();
        let store = db.students().unwrap();
        (db, store)
    }

    fn names(records: &[Record<Student>]) -> Vec<&str> {
        records.iter().map(|r| r.data.name.as_str()).collect()
    }

    #[test]
    fn add_assigns_increasing_ids() {
        let (_db, store) = store();

        let alice = store.add("Alice", 20, Gender::Female, "Math").unwrap();
        let bob = store.add("Bob", 22, Gender::Male, "CS").unwrap();

        assert_eq!(alice.id, 1);
        assert_eq!(bob.id, 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(2).unwrap(), Some(bob));
    }

    #[test]
    fn add_after_delete_does_not_reuse_id() {
        let (_db, store) = store();

        store.add("Alice", 20, Gender::Female, "Math").unwrap();
        store.add("Bob", 22, Gender::Male, "CS").unwrap();
        store.delete(1).unwrap();
        let cara = store.add("Cara", 21, Gender::Other, "Art").unwrap();

        assert_eq!(cara.id, 3);

        let ids: Vec<u64> = store.list().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn add_does_not_validate() {
        let (_db, store) = store();

        let record = store.add("", 0, Gender::Other, "").unwrap();

        assert_eq!(record.data.age, 0);
        assert!(record.data.name.is_empty());
    }

    #[test]
    fn update_only_touches_target() {
        let (_db, store) = store();

        let alice = store.add("Alice", 20, Gender::Female, "Math").unwrap();
        store.add("Bob", 22, Gender::Male, "CS").unwrap();
        let cara = store.add("Cara", 21, Gender::Other, "Art").unwrap();

        let bobby = store
            .update(2, "Bobby", 23, Gender::Male, "CompSci")
            .unwrap()
            .expect("Record not found");

        assert_eq!(bobby.id, 2);
        assert_eq!(bobby.data, Student::new("Bobby", 23, Gender::Male, "CompSci"));

        let all = store.list().unwrap();
        assert_eq!(all, vec![alice, bobby, cara]);
    }

    #[test]
    fn update_missing_is_noop() {
        let (_db, store) = store();
        let alice = store.add("Alice", 20, Gender::Female, "Math").unwrap();

        assert!(store
            .update(9, "Ghost", 30, Gender::Other, "None")
            .unwrap()
            .is_none());
        assert_eq!(store.list().unwrap(), vec![alice]);
    }

    #[test]
    fn delete_twice_is_same_as_once() {
        let (_db, store) = store();
        store.add("Alice", 20, Gender::Female, "Math").unwrap();
        store.add("Bob", 22, Gender::Male, "CS").unwrap();

        assert!(store.delete(1).unwrap().is_some());
        let after_once = store.list().unwrap();

        assert!(store.delete(1).unwrap().is_none());
        assert_eq!(store.list().unwrap(), after_once);
    }

    #[test]
    fn delete_middle_keeps_order() {
        let (_db, store) = store();
        store.add("Alice", 20, Gender::Female, "Math").unwrap();
        store.add("Bob", 22, Gender::Male, "CS").unwrap();
        store.add("Cara", 21, Gender::Other, "Art").unwrap();

        store.delete(2).unwrap();

        assert_eq!(names(&store.list().unwrap()), vec!["Alice", "Cara"]);
    }

    #[test]
    fn search_name_or_course_ignoring_case() {
        let (_db, store) = store();
        store.add("Alice", 20, Gender::Female, "Math").unwrap();
        store.add("Bob", 22, Gender::Male, "CS").unwrap();
        store.add("Cara", 21, Gender::Other, "Art").unwrap();

        assert_eq!(names(&store.search("a").unwrap()), vec!["Alice", "Cara"]);
        assert_eq!(names(&store.search("cs").unwrap()), vec!["Bob"]);
        assert_eq!(names(&store.search("MATH").unwrap()), vec!["Alice"]);
        assert!(store.search("zzz").unwrap().is_empty());

        // An empty query matches everyone
        assert_eq!(
            names(&store.search("").unwrap()),
            vec!["Alice", "Bob", "Cara"]
        );

        // Case folding is not limited to ASCII
        store.add("Élodie", 19, Gender::Female, "école normale").unwrap();
        assert_eq!(names(&store.search("ÉCOLE").unwrap()), vec!["Élodie"]);
        assert_eq!(names(&store.search("élo").unwrap()), vec!["Élodie"]);

        // Searching never mutates the collection
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn age_distribution_counts_each_age() {
        let (_db, store) = store();
        assert!(store.age_distribution().unwrap().is_empty());

        store.add("Alice", 20, Gender::Female, "Math").unwrap();
        store.add("Bob", 22, Gender::Male, "CS").unwrap();
        store.add("Cara", 20, Gender::Other, "Art").unwrap();

        let distribution = store.age_distribution().unwrap();
        assert_eq!(
            distribution.into_iter().collect::<Vec<_>>(),
            vec![(20, 2), (22, 1)]
        );
    }
}
