//! Event handlers sitting between a front end and the [`StudentStore`].
//!
//! A front end turns each discrete user action into an [`Event`] and hands it to
//! [`Session::handle`]. The handler validates the input, calls the store and
//! returns a [`Response`] describing what to show. The session owns its store,
//! so nothing is kept in ambient state between events.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::form::{parse_selection, StudentForm, ValidationError};
use crate::record::Record;
use crate::result::DbResult;
use crate::store::StudentStore;
use crate::student::Student;
use crate::Roster;

/// A discrete user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Submit the add form.
    Add(StudentForm),
    /// Show every student.
    View,
    /// Submit the update form for the student picked by `selection`.
    Update {
        selection: String,
        form: StudentForm,
    },
    /// Delete the student picked by `selection`.
    Delete { selection: String },
    /// Search names and courses.
    Search(String),
    /// Show the age distribution.
    Stats,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Warning(String),
    Error(String),
}

/// What a front end should render after an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub notice: Option<Notice>,
    /// Rows to list, in collection order.
    pub rows: Vec<Record<Student>>,
    /// Age to number of students, for charting.
    pub age_distribution: BTreeMap<u8, usize>,
}

impl Response {
    fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            ..Default::default()
        }
    }

    fn invalid(err: ValidationError) -> Self {
        warn!(%err, "rejected input");
        Self::notice(Notice::Error(err.to_string()))
    }
}

/// One interactive session holding its own student collection.
///
/// Everything is discarded when the session is dropped.
pub struct Session {
    /// Keeps the engine open for as long as the session lives.
    _roster: Roster,
    store: StudentStore,
}

impl Session {
    /// Start a session with an empty collection.
    pub fn new() -> DbResult<Self> {
        let roster = Roster::new()?;
        let store = roster.students()?;

        Ok(Self {
            _roster: roster,
            store,
        })
    }

    pub fn store(&self) -> &StudentStore {
        &self.store
    }

    /// Labels for a student picker, e.g. `1 - Alice`, in collection order.
    pub fn selection_labels(&self) -> DbResult<Vec<String>> {
        Ok(self.store.list()?.iter().map(|record| record.label()).collect())
    }

    /// Current values of the selected student, for pre-filling an update form.
    pub fn prefill(&self, selection: &str) -> DbResult<Result<StudentForm, ValidationError>> {
        Ok(self
            .resolve(selection)?
            .map(|record| StudentForm::from(record.data)))
    }

    /// Run the handler for `event`.
    ///
    /// Bad input comes back as an error [`Notice`]; only storage failures are
    /// returned as `Err`.
    pub fn handle(&self, event: Event) -> DbResult<Response> {
        debug!(?event, "handling event");

        match event {
            Event::Add(form) => self.add(form),
            Event::View => self.view(),
            Event::Update { selection, form } => self.update(&selection, form),
            Event::Delete { selection } => self.delete(&selection),
            Event::Search(query) => self.search(&query),
            Event::Stats => self.stats(),
        }
    }

    fn add(&self, form: StudentForm) -> DbResult<Response> {
        if let Err(err) = form.validate() {
            return Ok(Response::invalid(err));
        }

        let record = self
            .store
            .add(form.name, form.age, form.gender, form.course)?;

        Ok(Response::notice(Notice::Success(format!(
            "Student {} added successfully!",
            record.data.name
        ))))
    }

    fn view(&self) -> DbResult<Response> {
        let rows = self.store.list()?;

        if rows.is_empty() {
            return Ok(Response::notice(Notice::Info(
                "No students found.".to_owned(),
            )));
        }

        Ok(Response {
            rows,
            ..Default::default()
        })
    }

    fn update(&self, selection: &str, form: StudentForm) -> DbResult<Response> {
        if self.store.is_empty() {
            return Ok(Response::notice(Notice::Info(
                "No students to update.".to_owned(),
            )));
        }

        let id = match parse_selection(selection) {
            Ok(id) => id,
            Err(err) => return Ok(Response::invalid(err)),
        };

        if let Err(err) = form.validate() {
            return Ok(Response::invalid(err));
        }

        match self
            .store
            .update(id, form.name, form.age, form.gender, form.course)?
        {
            Some(record) => Ok(Response::notice(Notice::Success(format!(
                "Student {} updated successfully!",
                record.data.name
            )))),
            None => Ok(Response::invalid(ValidationError::UnresolvedSelection {
                selection: selection.to_owned(),
            })),
        }
    }

    fn delete(&self, selection: &str) -> DbResult<Response> {
        if self.store.is_empty() {
            return Ok(Response::notice(Notice::Info(
                "No students to delete.".to_owned(),
            )));
        }

        let id = match parse_selection(selection) {
            Ok(id) => id,
            Err(err) => return Ok(Response::invalid(err)),
        };

        match self.store.delete(id)? {
            Some(_) => Ok(Response::notice(Notice::Warning(format!(
                "Student ID {} deleted successfully!",
                id
            )))),
            None => Ok(Response::invalid(ValidationError::UnresolvedSelection {
                selection: selection.to_owned(),
            })),
        }
    }

    fn search(&self, query: &str) -> DbResult<Response> {
        // Nothing typed yet, nothing to report.
        if query.is_empty() {
            return Ok(Response::default());
        }

        let rows = self.store.search(query)?;

        let notice = if rows.is_empty() {
            Notice::Warning("No matching students found.".to_owned())
        } else {
            Notice::Success(format!("Found {} result(s)", rows.len()))
        };

        Ok(Response {
            notice: Some(notice),
            rows,
            ..Default::default()
        })
    }

    fn stats(&self) -> DbResult<Response> {
        let age_distribution = self.store.age_distribution()?;

        if age_distribution.is_empty() {
            return Ok(Response::notice(Notice::Info(
                "No students to visualize.".to_owned(),
            )));
        }

        Ok(Response {
            age_distribution,
            ..Default::default()
        })
    }

    /// Find the record a selection label points at.
    fn resolve(&self, selection: &str) -> DbResult<Result<Record<Student>, ValidationError>> {
        let unresolved = || ValidationError::UnresolvedSelection {
            selection: selection.to_owned(),
        };

        let id = match parse_selection(selection) {
            Ok(id) => id,
            Err(err) => return Ok(Err(err)),
        };

        Ok(self.store.get(id)?.ok_or_else(unresolved))
    }
}
