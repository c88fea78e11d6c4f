use std::num::NonZeroUsize;

use super::{Course, CourseNumber};

/// A fixed-capacity hash table of courses with separate chaining.
///
/// The table owns every record it stores. Keys are derived from the course
/// number in two stages: a polynomial fold (`acc * 7 + byte`, wrapping) over
/// the number's bytes, then reduction modulo the bucket count. The fold is
/// deliberately simple and collision-prone; colliding records are appended to
/// the bucket's chain and found by a linear scan.
///
/// Invariant: the bucket count is fixed at construction and never changes.
/// There is no rehashing, no deletion, and no load-factor policy.
///
/// Inserting a course whose number is already present appends a second record
/// rather than overwriting; [`CourseTable::get`] then returns the
/// first-inserted one. Callers must not rely on overwrite semantics.
///
/// ```
/// use non_empty_string::NonEmptyString;
/// use planner::domain::{Course, CourseNumber, CourseTable};
///
/// let mut table = CourseTable::new();
/// let number: CourseNumber = "CS101".parse().unwrap();
/// let name = NonEmptyString::new("Intro to CS".to_string()).unwrap();
/// table.insert(Course::new(number.clone(), name));
///
/// assert_eq!(table.get(&number).map(Course::name), Some("Intro to CS"));
/// ```
#[derive(Debug, Clone)]
pub struct CourseTable {
    buckets: Vec<Vec<Course>>,
    len: usize,
}

impl CourseTable {
    /// Default bucket count. Prime, to spread the weak fold a little.
    pub const DEFAULT_CAPACITY: NonZeroUsize = NonZeroUsize::new(179).unwrap();

    /// Create a table with [`Self::DEFAULT_CAPACITY`] buckets.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a table with the given bucket count.
    ///
    /// A zero capacity is unrepresentable; the type carries the guarantee
    /// that the modulo reduction below is well defined.
    #[must_use]
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            buckets: vec![Vec::new(); capacity.get()],
            len: 0,
        }
    }

    /// Polynomial fold of the number's bytes, in wrapping unsigned
    /// arithmetic. Pure: equal strings always fold to equal keys.
    fn fold_key(number: &str) -> usize {
        number
            .bytes()
            .fold(0usize, |acc, byte| {
                acc.wrapping_mul(7).wrapping_add(usize::from(byte))
            })
    }

    /// Bucket for a number. Always in `0..self.capacity()`.
    fn bucket_index(&self, number: &str) -> usize {
        Self::fold_key(number) % self.buckets.len()
    }

    /// Insert a course. Always succeeds; duplicates append (see the type
    /// docs for the lookup consequences).
    pub fn insert(&mut self, course: Course) {
        let index = self.bucket_index(course.number());
        self.buckets[index].push(course);
        self.len += 1;
    }

    /// Look up a course by number.
    ///
    /// Scans the bucket's chain from its head and returns the first record
    /// whose number matches exactly, or `None` when the chain is exhausted.
    /// Comparison is case-sensitive.
    #[must_use]
    pub fn get(&self, number: &CourseNumber) -> Option<&Course> {
        self.buckets[self.bucket_index(number)]
            .iter()
            .find(|course| course.number() == number)
    }

    /// Yields the stored course for each of `numbers`, in the caller's
    /// order, skipping numbers with no record.
    ///
    /// The table keeps no iteration order of its own; callers supply an
    /// ordered, duplicate-free sequence (see [`crate::domain::Catalog`]).
    pub fn in_order<'a, I>(&'a self, numbers: I) -> impl Iterator<Item = &'a Course>
    where
        I: IntoIterator<Item = &'a CourseNumber>,
    {
        numbers.into_iter().filter_map(|number| self.get(number))
    }

    /// Number of stored records, counting duplicates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// `true` if no records are stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The fixed bucket count.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Chain length of every bucket, in bucket order.
    pub fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(Vec::len)
    }
}

impl Default for CourseTable {
    fn default() -> Self {
        Self::new()
    }
}
