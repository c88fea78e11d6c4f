use std::path::{Path, PathBuf};

use clap::Parser;
use planner::{
    domain::{audit, AuditError, Issue},
    Catalog, CourseNumber,
};
use tracing::instrument;

use super::terminal::Colorize;

/// Verify that every prerequisite resolves and no cycles exist.
#[derive(Debug, Parser)]
pub struct Check {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,

    /// Course file to read instead of the configured source
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

#[derive(Debug, Default)]
struct CheckResult {
    unknown: Vec<UnknownReference>,
    cycles: Vec<Vec<CourseNumber>>,
}

#[derive(Debug)]
struct UnknownReference {
    course: CourseNumber,
    prerequisite: CourseNumber,
}

impl CheckResult {
    fn collect(error: &AuditError) -> Self {
        let mut result = Self::default();

        for issue in error.issues() {
            match issue {
                Issue::UnknownPrerequisite {
                    course,
                    prerequisite,
                } => result.unknown.push(UnknownReference {
                    course: course.clone(),
                    prerequisite: prerequisite.clone(),
                }),
                Issue::PrerequisiteCycle { members } => result.cycles.push(members.clone()),
            }
        }

        result
    }

    fn total(&self) -> usize {
        self.unknown.len() + self.cycles.len()
    }
}

impl Check {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let (catalog, _) = super::load_catalog(root, self.file.as_deref())?;

        let result = match audit(&catalog) {
            Ok(()) => CheckResult::default(),
            Err(error) => CheckResult::collect(&error),
        };

        match self.output {
            OutputFormat::Table => self.output_table(&result, &catalog),
            OutputFormat::Json => Self::output_json(&result, &catalog)?,
            OutputFormat::Summary => Self::output_summary(&result),
        }

        if result.total() > 0 {
            std::process::exit(2);
        }

        Ok(())
    }

    fn output_table(&self, result: &CheckResult, catalog: &Catalog) {
        if self.quiet {
            return;
        }

        println!("Checking catalog...\n");

        if result.unknown.is_empty() {
            println!(
                "✓ Prerequisites: {} courses, all references resolve",
                catalog.len()
            );
        } else {
            println!(
                "{}",
                format!(
                    "✗ Prerequisites: {} unresolved references",
                    result.unknown.len()
                )
                .warning()
            );
            for issue in &result.unknown {
                println!("    • {} requires {}", issue.course, issue.prerequisite);
            }
        }

        if result.cycles.is_empty() {
            println!("✓ Cycles:        none");
        } else {
            println!(
                "{}",
                format!("✗ Cycles:        {} found", result.cycles.len()).warning()
            );
            for members in &result.cycles {
                println!("    • {}", join_numbers(members));
            }
        }

        let total = result.total();
        if total == 0 {
            println!(
                "\n{}",
                format!("Catalog is consistent ({} courses)", catalog.len()).success()
            );
        } else {
            println!("\n{}", format!("Summary: {total} issues found").warning());
            println!(
                "\n{}",
                "Fix the course file and reload before trusting prerequisite chains".dim()
            );
        }
    }

    fn output_json(result: &CheckResult, catalog: &Catalog) -> anyhow::Result<()> {
        use serde_json::json;

        let unknown: Vec<_> = result
            .unknown
            .iter()
            .map(|issue| {
                json!({
                    "course": issue.course.as_str(),
                    "prerequisite": issue.prerequisite.as_str(),
                })
            })
            .collect();

        let cycles: Vec<Vec<&str>> = result
            .cycles
            .iter()
            .map(|members| members.iter().map(CourseNumber::as_str).collect())
            .collect();

        let total = result.total();
        let output = json!({
            "status": if total == 0 { "consistent" } else { "issues_found" },
            "courses": catalog.len(),
            "issues": {
                "unknown_prerequisites": unknown,
                "cycles": cycles,
            },
            "summary": {
                "total_issues": total,
            }
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_summary(result: &CheckResult) {
        let total = result.total();
        println!("issues={total}");
    }
}

fn join_numbers(numbers: &[CourseNumber]) -> String {
    numbers
        .iter()
        .map(CourseNumber::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use non_empty_string::NonEmptyString;
    use planner::Course;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn collect_groups_issues_by_kind() {
        let mut catalog = Catalog::new();
        let mut course = Course::new(
            "CS201".parse().unwrap(),
            NonEmptyString::new("Data Structures".to_string()).unwrap(),
        );
        course.add_prerequisite("CS999".parse().unwrap());
        catalog.insert(course);

        let error = audit(&catalog).unwrap_err();
        let result = CheckResult::collect(&error);

        assert_eq!(result.unknown.len(), 1);
        assert_eq!(result.unknown[0].course.as_str(), "CS201");
        assert_eq!(result.unknown[0].prerequisite.as_str(), "CS999");
        assert!(result.cycles.is_empty());
    }

    #[test]
    fn run_succeeds_for_a_consistent_catalog() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        std::fs::write(
            root.join("courses.csv"),
            "CS101,Introduction to Computer Science\nCS201,Data Structures,CS101\n",
        )
        .unwrap();

        let check = Check {
            output: OutputFormat::Summary,
            quiet: false,
            file: None,
        };

        check.run(root).expect("consistent catalog should pass");
    }
}
