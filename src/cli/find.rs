use std::{
    path::{Path, PathBuf},
    process,
};

use clap::Parser;
use planner::{Course, CourseNumber};
use serde_json::json;
use tracing::instrument;

use super::terminal::Colorize;

/// Look up a single course and display it with its prerequisites.
#[derive(Debug, Parser)]
pub struct Find {
    /// The course number to look up (lowercase input is normalized)
    #[clap(value_parser = super::parse_course_number)]
    number: CourseNumber,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,

    /// Course file to read instead of the configured source
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Find {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let (catalog, _) = super::load_catalog(root, self.file.as_deref())?;

        let Some(course) = catalog.get(&self.number) else {
            eprintln!("Course {} not found", self.number);
            process::exit(1);
        };

        match self.output {
            OutputFormat::Pretty => output_pretty(course),
            OutputFormat::Json => output_json(course)?,
        }

        Ok(())
    }
}

fn output_pretty(course: &Course) {
    println!("{}, {}", course.number().as_str().info(), course.name());

    if course.prerequisites().is_empty() {
        println!("{}", "Prerequisites: none".dim());
    } else {
        println!("Prerequisites: {}", join_numbers(course.prerequisites()));
    }
}

fn output_json(course: &Course) -> anyhow::Result<()> {
    let prerequisites: Vec<&str> = course
        .prerequisites()
        .iter()
        .map(CourseNumber::as_str)
        .collect();

    let output = json!({
        "number": course.number().as_str(),
        "name": course.name(),
        "prerequisites": prerequisites,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn join_numbers(numbers: &[CourseNumber]) -> String {
    numbers
        .iter()
        .map(CourseNumber::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
