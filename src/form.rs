use std::ops::RangeInclusive;

use thiserror::Error;

use crate::student::{Gender, Student, LABEL_SEPARATOR};

/// Ages a form accepts.
pub const AGE_RANGE: RangeInclusive<u8> = 1..=120;

/// Input rejected before it reaches the store. Shown to the user, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill all fields.")]
    MissingField { field: &'static str },
    #[error("Age must be between 1 and 120, got {age}.")]
    AgeOutOfRange { age: u8 },
    #[error("No student matches the selection \"{selection}\".")]
    UnresolvedSelection { selection: String },
}

/// Field values collected from an add or update form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentForm {
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub course: String,
}

impl StudentForm {
    pub fn new(
        name: impl Into<String>,
        age: u8,
        gender: Gender,
        course: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            age,
            gender,
            course: course.into(),
        }
    }

    /// Check that the required fields are present and the age is in range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::MissingField { field: "name" });
        }

        if self.course.is_empty() {
            return Err(ValidationError::MissingField { field: "course" });
        }

        if !AGE_RANGE.contains(&self.age) {
            return Err(ValidationError::AgeOutOfRange { age: self.age });
        }

        Ok(())
    }
}

/// Pre-fill an update form from an existing student.
impl From<Student> for StudentForm {
    fn from(student: Student) -> Self {
        Self {
            name: student.name,
            age: student.age,
            gender: student.gender,
            course: student.course,
        }
    }
}

/// Read the ID back out of a selection label such as `2 - Bob`.
pub fn parse_selection(selection: &str) -> Result<u64, ValidationError> {
    selection
        .split(LABEL_SEPARATOR)
        .next()
        .and_then(|id| id.trim().parse().ok())
        .ok_or_else(|| ValidationError::UnresolvedSelection {
            selection: selection.to_owned(),
        })
}
