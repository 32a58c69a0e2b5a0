use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::record::Record;

/// Separator between the ID and the name in a selection label.
pub const LABEL_SEPARATOR: &str = " - ";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Everything stored about a student except its ID, which belongs to the
/// [`Record`] wrapping it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub course: String,
}

impl Student {
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

    /// Whether the name or the course contains `needle`, which must already
    /// be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.course.to_lowercase().contains(needle)
    }
}

impl Record<Student> {
    /// Label used to pick this record from a list, e.g. `3 - Cara`.
    pub fn label(&self) -> String {
        format!("{}{}{}", self.id, LABEL_SEPARATOR, self.data.name)
    }
}

impl fmt::Display for Record<Student> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | Name: {} | Age: {} | Gender: {} | Course: {}",
            self.id, self.data.name, self.data.age, self.data.gender, self.data.course
        )
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn gender_text_form() {
        let names: Vec<&'static str> = Gender::iter().map(|g| g.into()).collect();
        assert_eq!(names, vec!["Male", "Female", "Other"]);

        assert_eq!(Gender::from_str("Female").unwrap(), Gender::Female);
        assert!(Gender::from_str("Unknown").is_err());
    }

    #[test]
    fn record_row_and_label() {
        let record = Record {
            id: 7,
            data: Student::new("Alice", 20, Gender::Female, "Math"),
        };

        assert_eq!(
            record.to_string(),
            "ID: 7 | Name: Alice | Age: 20 | Gender: Female | Course: Math"
        );
        assert_eq!(record.label(), "7 - Alice");
    }

    #[test]
    fn matches_name_or_course() {
        let student = Student::new("Bob", 22, Gender::Male, "Computer Science");

        assert!(student.matches_lowercase("bo"));
        assert!(student.matches_lowercase("science"));
        assert!(!student.matches_lowercase("art"));
    }
}
