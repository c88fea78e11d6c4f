use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;

/// A validated course number, e.g. `CS101` or `MATH201`.
///
/// Course numbers are compared case-sensitively and stored exactly as given.
/// Callers that want case-insensitive matching normalise before constructing
/// one (the command-line layer uppercases its input).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CourseNumber(NonEmptyString);

impl CourseNumber {
    /// Creates a new `CourseNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCourseNumberError` if the string is empty or carries
    /// surrounding whitespace.
    pub fn new(s: String) -> Result<Self, InvalidCourseNumberError> {
        let non_empty =
            NonEmptyString::new(s.clone()).map_err(|_| InvalidCourseNumberError(s.clone()))?;

        if s.trim() != s {
            return Err(InvalidCourseNumberError(s));
        }

        Ok(Self(non_empty))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the leading alphabetic prefix, e.g. `CS` for `CS101`.
    ///
    /// A number with no leading letters yields the whole string.
    #[must_use]
    pub fn subject(&self) -> &str {
        let s = self.0.as_str();
        s.find(|c: char| !c.is_ascii_alphabetic())
            .map_or(s, |end| &s[..end])
    }
}

impl TryFrom<String> for CourseNumber {
    type Error = InvalidCourseNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for CourseNumber {
    type Error = InvalidCourseNumberError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl AsRef<str> for CourseNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for CourseNumber {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for CourseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CourseNumber {
    type Err = InvalidCourseNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// Error returned when a string is not a usable course number.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid course number '{0}': must be non-empty with no surrounding whitespace")]
pub struct InvalidCourseNumberError(String);
