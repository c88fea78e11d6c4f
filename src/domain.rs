//! Domain models for the course planner.
//!
//! This module contains the core types: validated course numbers, course
//! records, the chained hash table that stores them, the catalog that wraps
//! it for ordered listing, and configuration.

/// Validated course number newtype and parsing.
pub mod number;
pub use number::{CourseNumber, InvalidCourseNumberError};

/// Course record type.
pub mod course;
pub use course::Course;

/// Fixed-capacity hash table with separate chaining.
pub mod table;
pub use table::CourseTable;

/// Catalog combining the table with an ordered number set.
pub mod catalog;
pub use catalog::Catalog;

pub mod audit;
pub use audit::{audit, AuditError, Issue};

mod config;
pub use config::Config;
