//! In-memory course catalog
//!
//! Courses live in a fixed-capacity hash table with separate chaining,
//! loaded from a delimited text file and queried by exact course number.

pub mod domain;
pub use domain::{Catalog, Config, Course, CourseNumber, CourseTable, InvalidCourseNumberError};

/// Course-file ingestion.
pub mod storage;
pub use storage::{load, LoadError, LoadReport};
