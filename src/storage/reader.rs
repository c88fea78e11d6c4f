use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use non_empty_string::NonEmptyString;

use crate::domain::{Catalog, Course, CourseNumber};

/// Reads a delimited course file into `catalog`.
///
/// One record per line: course number, display name, then zero or more
/// prerequisite numbers, separated by `delimiter`. Every field is trimmed of
/// surrounding whitespace. Empty lines are skipped silently but still
/// counted; a line of only whitespace is a record whose number field trims
/// to nothing. A record without a number or a name is skipped and reported
/// in the returned [`LoadReport`]; empty prerequisite fields (such as a
/// trailing delimiter) are dropped.
///
/// Records land in the catalog as they are read, so a later read failure
/// leaves everything loaded so far intact, as does calling this again after
/// an error.
///
/// # Errors
///
/// Returns [`LoadError::Open`] if the file cannot be opened and
/// [`LoadError::Read`] if a line cannot be read. Malformed records are not
/// errors; they appear in the report instead.
pub fn load(path: &Path, delimiter: char, catalog: &mut Catalog) -> Result<LoadReport, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut report = LoadReport::default();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line_number = index + 1;
        report.lines = line_number;

        let line = line.map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            line: line_number,
            source,
        })?;

        if line.is_empty() {
            continue;
        }

        let mut fields = line.split(delimiter);

        // Validation is the constructor: a trimmed field builds a
        // CourseNumber unless it is empty.
        let number_field = fields.next().unwrap_or_default().trim();
        let Ok(number) = CourseNumber::new(number_field.to_string()) else {
            report.skip(line_number, SkipReason::MissingNumber);
            continue;
        };

        let name_field = fields.next().map(str::trim).unwrap_or_default();
        let Ok(name) = NonEmptyString::new(name_field.to_string()) else {
            report.skip(line_number, SkipReason::MissingName);
            continue;
        };

        let mut course = Course::new(number, name);
        for field in fields {
            // Empty prerequisite fields are dropped, not stored as "".
            if let Ok(prerequisite) = CourseNumber::new(field.trim().to_string()) {
                course.add_prerequisite(prerequisite);
            }
        }

        catalog.insert(course);
        report.loaded += 1;
    }

    Ok(report)
}

/// Outcome of a single [`load`] call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadReport {
    lines: usize,
    loaded: usize,
    skipped: Vec<SkippedLine>,
}

impl LoadReport {
    fn skip(&mut self, line: usize, reason: SkipReason) {
        tracing::debug!("skipped line {line}: {reason}");
        self.skipped.push(SkippedLine { line, reason });
    }

    /// Physical lines read, blanks included.
    #[must_use]
    pub const fn lines(&self) -> usize {
        self.lines
    }

    /// Records inserted into the catalog.
    #[must_use]
    pub const fn loaded(&self) -> usize {
        self.loaded
    }

    /// Records that were skipped, in file order.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    /// `true` when the source held no records at all, valid or not.
    ///
    /// Empty lines don't count: a file of newlines is still empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaded == 0 && self.skipped.is_empty()
    }
}

/// A record that was skipped during a [`load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based physical line number in the source file.
    pub line: usize,
    /// Why the record was skipped.
    pub reason: SkipReason,
}

impl fmt::Display for SkippedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// Why a record was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The first field was empty after trimming.
    MissingNumber,
    /// The second field was absent or empty after trimming.
    MissingName,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNumber => write!(f, "missing course number"),
            Self::MissingName => write!(f, "missing course name"),
        }
    }
}

/// Errors that can occur while reading a course file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be opened.
    #[error("failed to open course file {}", .path.display())]
    Open {
        /// The file that was being opened.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A line could not be read from the file.
    #[error("failed to read course file {} at line {line}", .path.display())]
    Read {
        /// The file that was being read.
        path: PathBuf,
        /// 1-based line where reading failed.
        line: usize,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn load_str(content: &str) -> (LoadReport, Catalog) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let mut catalog = Catalog::new();
        let report = load(file.path(), ',', &mut catalog).unwrap();
        (report, catalog)
    }

    fn get<'a>(catalog: &'a Catalog, number: &str) -> Option<&'a Course> {
        catalog.get(&number.parse().unwrap())
    }

    fn prerequisites(course: &Course) -> Vec<&str> {
        course
            .prerequisites()
            .iter()
            .map(CourseNumber::as_str)
            .collect()
    }

    #[test]
    fn loads_well_formed_records() {
        let (report, catalog) = load_str("CS101,Intro to CS\nCS201,Data Structures,CS101\n");

        assert_eq!(report.lines(), 2);
        assert_eq!(report.loaded(), 2);
        assert!(report.skipped().is_empty());
        assert!(!report.is_empty());

        let data_structures = get(&catalog, "CS201").unwrap();
        assert_eq!(data_structures.name(), "Data Structures");
        assert_eq!(prerequisites(data_structures), vec!["CS101"]);
    }

    #[test]
    fn fields_are_trimmed() {
        let (_, catalog) = load_str(" CS101 , Intro to CS \nCS201, Data Structures , CS101 \n");

        let intro = get(&catalog, "CS101").unwrap();
        assert_eq!(intro.name(), "Intro to CS");

        let data_structures = get(&catalog, "CS201").unwrap();
        assert_eq!(prerequisites(data_structures), vec!["CS101"]);
    }

    #[test]
    fn blank_lines_are_counted_but_skipped() {
        let (report, catalog) = load_str("CS101,Intro to CS\n\nCS201,Data Structures,CS101\n");

        assert_eq!(report.lines(), 3);
        assert_eq!(report.loaded(), 2);
        assert!(report.skipped().is_empty());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn record_without_name_is_skipped_with_line_number() {
        let (report, catalog) = load_str("CS101,Intro to CS\nCS300,\n");

        assert_eq!(report.loaded(), 1);
        assert_eq!(
            report.skipped(),
            &[SkippedLine {
                line: 2,
                reason: SkipReason::MissingName,
            }]
        );
        assert!(get(&catalog, "CS300").is_none());
        // A skipped record still proves the file wasn't empty.
        assert!(!report.is_empty());
    }

    #[test]
    fn record_without_number_is_skipped() {
        let (report, catalog) = load_str(" ,Orphan Name\n");

        assert_eq!(report.loaded(), 0);
        assert_eq!(
            report.skipped(),
            &[SkippedLine {
                line: 1,
                reason: SkipReason::MissingNumber,
            }]
        );
        assert!(catalog.is_empty());
    }

    #[test]
    fn whitespace_only_line_is_skipped_with_a_diagnostic() {
        // Only truly empty lines are blank; this one has a number field
        // that trims to nothing.
        let (report, catalog) = load_str("   \n");

        assert_eq!(report.lines(), 1);
        assert_eq!(
            report.skipped(),
            &[SkippedLine {
                line: 1,
                reason: SkipReason::MissingNumber,
            }]
        );
        assert!(!report.is_empty());
        assert!(catalog.is_empty());
    }

    #[test]
    fn empty_prerequisite_fields_are_dropped() {
        let (_, catalog) = load_str("CS201,Data Structures,CS101,,\n");

        let data_structures = get(&catalog, "CS201").unwrap();
        assert_eq!(prerequisites(data_structures), vec!["CS101"]);
    }

    #[test]
    fn a_file_of_blank_lines_is_empty() {
        let (report, catalog) = load_str("\n\n");

        assert_eq!(report.lines(), 2);
        assert!(report.is_empty());
        assert!(catalog.is_empty());
    }

    #[test]
    fn alternative_delimiter() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"CS201;Data Structures;CS101\n").unwrap();

        let mut catalog = Catalog::new();
        load(file.path(), ';', &mut catalog).unwrap();

        let data_structures = get(&catalog, "CS201").unwrap();
        assert_eq!(data_structures.name(), "Data Structures");
        assert_eq!(prerequisites(data_structures), vec!["CS101"]);
    }

    #[test]
    fn repeated_loads_accumulate() {
        let mut first = NamedTempFile::new().unwrap();
        first.write_all(b"CS101,Intro to CS\n").unwrap();
        let mut second = NamedTempFile::new().unwrap();
        second.write_all(b"CS201,Data Structures,CS101\n").unwrap();

        let mut catalog = Catalog::new();
        load(first.path(), ',', &mut catalog).unwrap();
        load(second.path(), ',', &mut catalog).unwrap();

        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn open_failure_leaves_prior_data_intact() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.csv");

        let mut catalog = Catalog::new();
        let mut course = Course::new(
            "CS101".parse().unwrap(),
            NonEmptyString::new("Intro to CS".to_string()).unwrap(),
        );
        course.add_prerequisite("MATH100".parse().unwrap());
        catalog.insert(course);

        let error = load(&missing, ',', &mut catalog).unwrap_err();
        assert!(matches!(error, LoadError::Open { .. }));
        assert_eq!(catalog.len(), 1);
        assert!(get(&catalog, "CS101").is_some());
    }

    #[test]
    fn end_to_end_scenario() {
        let (report, catalog) =
            load_str("CS101, Intro to CS\nCS201, Data Structures, CS101\n\nCS300,\n");

        assert_eq!(report.lines(), 4);
        assert_eq!(report.loaded(), 2);
        assert_eq!(
            report.skipped(),
            &[SkippedLine {
                line: 4,
                reason: SkipReason::MissingName,
            }]
        );

        assert_eq!(get(&catalog, "CS101").unwrap().name(), "Intro to CS");
        assert!(get(&catalog, "CS101").unwrap().prerequisites().is_empty());
        assert_eq!(prerequisites(get(&catalog, "CS201").unwrap()), vec!["CS101"]);
        assert!(get(&catalog, "CS300").is_none());
    }
}
