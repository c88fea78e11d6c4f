use std::{collections::BTreeSet, num::NonZeroUsize};

use super::{Course, CourseNumber, CourseTable};

/// A course catalog: a [`CourseTable`] plus the ordered set of numbers that
/// drives enumeration.
///
/// The table itself has no iteration order, so the catalog maintains a
/// `BTreeSet` of every number ever inserted and replays it through
/// [`CourseTable::in_order`]. The set is duplicate-free; a number inserted
/// twice is listed once (the table's first-inserted record, per the table's
/// duplicate semantics).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    table: CourseTable,
    numbers: BTreeSet<CourseNumber>,
}

impl Catalog {
    /// Create a catalog with the default table capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog whose table has the given bucket count.
    #[must_use]
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            table: CourseTable::with_capacity(capacity),
            numbers: BTreeSet::new(),
        }
    }

    /// Insert a course, recording its number for ordered listing.
    pub fn insert(&mut self, course: Course) {
        self.numbers.insert(course.number().clone());
        self.table.insert(course);
    }

    /// Look up a course by number. See [`CourseTable::get`].
    #[must_use]
    pub fn get(&self, number: &CourseNumber) -> Option<&Course> {
        self.table.get(number)
    }

    /// All courses in ascending course-number order.
    pub fn courses(&self) -> impl Iterator<Item = &Course> {
        self.table.in_order(&self.numbers)
    }

    /// Number of stored records, counting duplicates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.table.len()
    }

    /// `true` if no records are stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// The backing table, for capacity and chain statistics.
    #[must_use]
    pub const fn table(&self) -> &CourseTable {
        &self.table
    }
}
