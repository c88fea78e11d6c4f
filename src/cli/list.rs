use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use planner::{Course, CourseNumber};
use regex::Regex;
use serde::Serialize;
use tracing::instrument;

const DEFAULT_LIMIT: usize = 200;

/// Command arguments for `plan list`.
#[derive(Debug, Parser)]
#[command(about = "List courses in ascending course-number order")]
pub struct List {
    /// Columns to display (comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "COL")]
    columns: Vec<ListColumn>,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Suppress headers and format rows for scripting.
    #[arg(long)]
    quiet: bool,

    /// Filter by subject prefix (comma-separated, case-insensitive).
    #[arg(long, value_delimiter = ',', value_name = "SUBJECT")]
    subject: Vec<String>,

    /// Case-insensitive substring match against number/name.
    #[arg(long, conflicts_with = "regex")]
    contains: Option<String>,

    /// Regular expression match against number/name.
    #[arg(long)]
    regex: Option<String>,

    /// Limit number of rows returned.
    #[arg(long)]
    limit: Option<usize>,

    /// Skip the first N rows.
    #[arg(long)]
    offset: Option<usize>,

    /// Course file to read instead of the configured source.
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// Columns available in list output.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ListColumn {
    Number,
    Name,
    Prerequisites,
}

#[derive(Debug)]
struct Filters {
    subjects: Vec<String>,
    contains: Option<String>,
    regex: Option<Regex>,
}

impl Filters {
    fn new(command: &List) -> anyhow::Result<Self> {
        let regex = if let Some(pattern) = &command.regex {
            Some(Regex::new(pattern).with_context(|| format!("invalid regex: {pattern}"))?)
        } else {
            None
        };

        Ok(Self {
            subjects: command
                .subject
                .iter()
                .map(String::as_str)
                .map(str::to_ascii_lowercase)
                .collect(),
            contains: command.contains.as_deref().map(str::to_ascii_lowercase),
            regex,
        })
    }

    fn matches(&self, course: &Course) -> bool {
        if !self.subjects.is_empty() {
            let subject = course.number().subject().to_ascii_lowercase();
            if !self.subjects.contains(&subject) {
                return false;
            }
        }

        if let Some(needle) = &self.contains {
            let number = course.number().as_str().to_ascii_lowercase();
            let name = course.name().to_ascii_lowercase();
            if !number.contains(needle) && !name.contains(needle) {
                return false;
            }
        }

        if let Some(regex) = &self.regex {
            if !regex.is_match(course.number()) && !regex.is_match(course.name()) {
                return false;
            }
        }

        true
    }
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let (catalog, _) = super::load_catalog(root, self.file.as_deref())?;
        let filters = Filters::new(&self)?;

        let mut courses: Vec<&Course> = catalog
            .courses()
            .filter(|course| filters.matches(course))
            .collect();

        let effective_limit = self
            .limit
            .and_then(|value| (value > 0).then_some(value))
            .or(Some(DEFAULT_LIMIT));

        courses = apply_offset_limit(courses, self.offset, effective_limit);

        match self.output {
            OutputFormat::Table => {
                render_table(&courses, &self.columns, self.quiet);
                Ok(())
            }
            OutputFormat::Json => render_json(&courses, &self.columns),
            OutputFormat::Csv => {
                render_csv(&courses, &self.columns, self.quiet);
                Ok(())
            }
        }
    }
}

fn apply_offset_limit<'a>(
    mut courses: Vec<&'a Course>,
    offset: Option<usize>,
    limit: Option<usize>,
) -> Vec<&'a Course> {
    if let Some(off) = offset {
        if off < courses.len() {
            courses = courses.into_iter().skip(off).collect();
        } else {
            courses.clear();
        }
    }

    if let Some(max) = limit {
        courses.truncate(max);
    }

    courses
}

fn render_table(courses: &[&Course], columns: &[ListColumn], quiet: bool) {
    let selected_columns = if columns.is_empty() {
        if quiet {
            vec![ListColumn::Number]
        } else {
            vec![
                ListColumn::Number,
                ListColumn::Name,
                ListColumn::Prerequisites,
            ]
        }
    } else {
        columns.to_vec()
    };

    let mut headers = Vec::new();
    let mut data: Vec<Vec<String>> = Vec::new();

    if !quiet {
        headers = selected_columns
            .iter()
            .map(|column| column.header().to_string())
            .collect();
    }

    for course in courses {
        let row = selected_columns
            .iter()
            .map(|column| column.value(course))
            .collect();
        data.push(row);
    }

    if quiet {
        for row in data {
            println!("{}", row.join("\t"));
        }
        return;
    }

    // Determine column widths for alignment.
    let widths = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            data.iter()
                .map(|row| row[idx].len())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect::<Vec<_>>();

    if !headers.is_empty() {
        for (header, width) in headers.iter().zip(&widths) {
            print!("{header:<width$}  ");
        }
        println!();

        for width in &widths {
            print!("{:-<width$}  ", "");
        }
        println!();
    }

    for row in data {
        for (idx, value) in row.iter().enumerate() {
            let width = widths[idx];
            print!("{value:<width$}  ");
        }
        println!();
    }
}

#[derive(Debug, Serialize)]
struct SerializableRow<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prerequisites: Option<Vec<&'a str>>,
}

fn build_serializable_row<'a>(course: &'a Course, columns: &[ListColumn]) -> SerializableRow<'a> {
    let mut row = SerializableRow {
        number: None,
        name: None,
        prerequisites: None,
    };

    for column in columns {
        match column {
            ListColumn::Number => row.number = Some(course.number().as_str()),
            ListColumn::Name => row.name = Some(course.name()),
            ListColumn::Prerequisites => {
                row.prerequisites = Some(
                    course
                        .prerequisites()
                        .iter()
                        .map(CourseNumber::as_str)
                        .collect(),
                );
            }
        }
    }

    row
}

fn render_json(courses: &[&Course], columns: &[ListColumn]) -> anyhow::Result<()> {
    let selected_columns = if columns.is_empty() {
        vec![
            ListColumn::Number,
            ListColumn::Name,
            ListColumn::Prerequisites,
        ]
    } else {
        columns.to_vec()
    };

    let rows = courses
        .iter()
        .map(|course| build_serializable_row(course, &selected_columns))
        .collect::<Vec<_>>();

    serde_json::to_writer_pretty(std::io::stdout(), &rows)
        .context("failed to render json output")?;
    println!();
    Ok(())
}

fn render_csv(courses: &[&Course], columns: &[ListColumn], quiet: bool) {
    let selected_columns = if columns.is_empty() {
        vec![
            ListColumn::Number,
            ListColumn::Name,
            ListColumn::Prerequisites,
        ]
    } else {
        columns.to_vec()
    };

    if !quiet {
        let header_line = selected_columns
            .iter()
            .map(|column| csv_escape(column.header()))
            .collect::<Vec<_>>()
            .join(",");
        println!("{header_line}");
    }

    for course in courses {
        let values = selected_columns
            .iter()
            .map(|column| csv_escape(&column.value(course)))
            .collect::<Vec<_>>();

        println!("{}", values.join(","));
    }
}

fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

impl ListColumn {
    const fn header(self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::Name => "Name",
            Self::Prerequisites => "Prerequisites",
        }
    }

    fn value(self, course: &Course) -> String {
        match self {
            Self::Number => course.number().to_string(),
            Self::Name => course.name().to_string(),
            Self::Prerequisites => course
                .prerequisites()
                .iter()
                .map(CourseNumber::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Csv => "csv",
        })
    }
}

#[cfg(test)]
mod tests {
    use non_empty_string::NonEmptyString;

    use super::*;

    fn course(number: &str, name: &str, prerequisites: &[&str]) -> Course {
        let mut course = Course::new(
            number.parse().unwrap(),
            NonEmptyString::new(name.to_string()).unwrap(),
        );
        for prerequisite in prerequisites {
            course.add_prerequisite(prerequisite.parse().unwrap());
        }
        course
    }

    fn list_with(subject: &[&str], contains: Option<&str>, regex: Option<&str>) -> List {
        List {
            columns: Vec::new(),
            output: OutputFormat::Table,
            quiet: false,
            subject: subject.iter().map(ToString::to_string).collect(),
            contains: contains.map(ToString::to_string),
            regex: regex.map(ToString::to_string),
            limit: None,
            offset: None,
            file: None,
        }
    }

    #[test]
    fn subject_filter_is_case_insensitive() {
        let filters = Filters::new(&list_with(&["cs"], None, None)).unwrap();

        assert!(filters.matches(&course("CS101", "Introduction to Computer Science", &[])));
        assert!(!filters.matches(&course("MATH201", "Discrete Mathematics", &[])));
    }

    #[test]
    fn contains_matches_number_and_name() {
        let filters = Filters::new(&list_with(&[], Some("discrete"), None)).unwrap();

        assert!(filters.matches(&course("MATH201", "Discrete Mathematics", &[])));
        assert!(!filters.matches(&course("CS101", "Introduction to Computer Science", &[])));
    }

    #[test]
    fn regex_matches_against_number() {
        let filters = Filters::new(&list_with(&[], None, Some("^CS[0-9]+$"))).unwrap();

        assert!(filters.matches(&course("CS101", "Introduction to Computer Science", &[])));
        assert!(!filters.matches(&course("MATH201", "Discrete Mathematics", &[])));
    }

    #[test]
    fn invalid_regex_is_rejected() {
        assert!(Filters::new(&list_with(&[], None, Some("["))).is_err());
    }

    #[test]
    fn offset_beyond_rows_clears_everything() {
        let intro = course("CS101", "Introduction to Computer Science", &[]);
        let rows = vec![&intro];

        assert!(apply_offset_limit(rows, Some(5), None).is_empty());
    }

    #[test]
    fn limit_truncates_rows() {
        let intro = course("CS101", "Introduction to Computer Science", &[]);
        let data = course("CS201", "Data Structures", &["CS101"]);
        let rows = vec![&intro, &data];

        let limited = apply_offset_limit(rows, None, Some(1));

        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].number().as_str(), "CS101");
    }

    #[test]
    fn csv_escape_quotes_fields_with_commas() {
        assert_eq!(csv_escape("CS101, MATH201"), "\"CS101, MATH201\"");
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
