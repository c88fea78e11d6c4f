use non_empty_string::NonEmptyString;

use super::CourseNumber;

/// A single course record.
///
/// Invariant: the number and name are non-empty by construction. The
/// prerequisite list preserves insertion order, is not deduplicated, and is
/// not checked against any catalog — a prerequisite may name a course that
/// was never loaded. [`crate::domain::audit`] reports such references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    number: CourseNumber,
    name: NonEmptyString,
    prerequisites: Vec<CourseNumber>,
}

impl Course {
    /// Create a course with no prerequisites.
    ///
    /// This is an infallible constructor that takes pre-validated types.
    #[must_use]
    pub const fn new(number: CourseNumber, name: NonEmptyString) -> Self {
        Self {
            number,
            name,
            prerequisites: Vec::new(),
        }
    }

    /// Appends a prerequisite, preserving insertion order.
    pub fn add_prerequisite(&mut self, prerequisite: CourseNumber) {
        self.prerequisites.push(prerequisite);
    }

    /// Returns the course number.
    #[must_use]
    pub const fn number(&self) -> &CourseNumber {
        &self.number
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the prerequisites in insertion order.
    #[must_use]
    pub fn prerequisites(&self) -> &[CourseNumber] {
        &self.prerequisites
    }
}
