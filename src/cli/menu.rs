use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use clap::Parser;
use planner::{Catalog, Course, CourseNumber};
use tracing::instrument;

use super::terminal::Colorize;

/// Interactive operator menu, the default when no subcommand is given.
#[derive(Debug, Default, Parser)]
#[command(about = "Run the interactive course-planner menu")]
pub struct Menu {
    /// Course file offered as the default for option 1
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,
}

impl Menu {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config = super::load_config(root);
        let default_source = self.file.unwrap_or_else(|| root.join(config.source()));
        let mut catalog = Catalog::with_capacity(config.buckets());

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        println!("Welcome to the course planner!");

        loop {
            print_menu(&mut io::stdout())?;

            let Some(input) = next_line(&mut lines)? else {
                break;
            };

            match parse_choice(&input) {
                Some(1) => {
                    load_into(&mut catalog, &default_source, config.delimiter(), &mut lines)?;
                }
                Some(2) => print_all(&catalog),
                Some(3) => find_course(&catalog, &mut lines)?,
                Some(9) => break,
                Some(choice) => println!(
                    "{choice} is not a valid option. Please choose from the available options."
                ),
                None => println!("Invalid input. Please choose from the available options."),
            }
        }

        println!("Good bye.");
        Ok(())
    }
}

fn print_menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Menu:")?;
    writeln!(out, "  1. Load Courses")?;
    writeln!(out, "  2. Display All Courses")?;
    writeln!(out, "  3. Find Course")?;
    writeln!(out, "  9. Exit")?;
    write!(out, "Enter choice: ")?;
    out.flush()
}

fn next_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> io::Result<Option<String>> {
    lines.next().transpose()
}

fn parse_choice(input: &str) -> Option<u8> {
    let &[byte] = input.as_bytes() else {
        return None;
    };

    byte.checked_sub(b'0').filter(|&digit| digit <= 9)
}

fn load_into(
    catalog: &mut Catalog,
    default_source: &Path,
    delimiter: char,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> io::Result<()> {
    println!(
        "Enter course file path to read (or press Enter to use default: \"{}\")",
        default_source.display()
    );

    let Some(reply) = next_line(lines)? else {
        return Ok(());
    };

    let source = resolve_source(&reply, default_source);

    println!("Loading course file... {}", source.display());

    match planner::load(&source, delimiter, catalog) {
        Ok(report) => {
            for skipped in report.skipped() {
                println!("{}", format!("Skipped {skipped}").warning());
            }
            if report.is_empty() {
                println!("The file is empty. Please try a different one.");
            } else {
                println!("The file was read!");
            }
        }
        Err(error) => eprintln!("{}", format!("Error: {error}").warning()),
    }

    Ok(())
}

fn resolve_source(reply: &str, default_source: &Path) -> PathBuf {
    let reply = reply.trim();
    if reply.is_empty() {
        default_source.to_path_buf()
    } else {
        PathBuf::from(reply)
    }
}

fn print_all(catalog: &Catalog) {
    for course in catalog.courses() {
        println!("{}, {}", course.number(), course.name());
    }
}

fn find_course(
    catalog: &Catalog,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> io::Result<()> {
    println!("Enter a course number to search: ");

    let Some(input) = next_line(lines)? else {
        return Ok(());
    };

    // The search term is a single whitespace-delimited token.
    let token = input.split_whitespace().next().unwrap_or_default();

    match super::parse_course_number(token)
        .ok()
        .and_then(|number| catalog.get(&number))
    {
        Some(course) => print_course(course),
        None => println!("Course {token} not found."),
    }

    Ok(())
}

fn print_course(course: &Course) {
    println!("{}, {}", course.number(), course.name());

    if !course.prerequisites().is_empty() {
        let prerequisites = course
            .prerequisites()
            .iter()
            .map(CourseNumber::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        println!("Prerequisites: {prerequisites}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_opens_with_the_header_and_no_leading_blank_line() {
        let mut rendered = Vec::new();
        print_menu(&mut rendered).unwrap();

        let text = String::from_utf8(rendered).unwrap();
        assert!(text.starts_with("Menu:\n"));
        assert!(text.contains("  1. Load Courses\n"));
        assert!(text.contains("  9. Exit\n"));
        assert!(text.ends_with("Enter choice: "));
    }

    #[test]
    fn parse_choice_accepts_single_digits() {
        assert_eq!(parse_choice("1"), Some(1));
        assert_eq!(parse_choice("9"), Some(9));
        assert_eq!(parse_choice("0"), Some(0));
    }

    #[test]
    fn parse_choice_rejects_everything_else() {
        assert_eq!(parse_choice(""), None);
        assert_eq!(parse_choice("12"), None);
        assert_eq!(parse_choice("x"), None);
        assert_eq!(parse_choice(" 1"), None);
        assert_eq!(parse_choice("!"), None);
        assert_eq!(parse_choice(":"), None);
    }

    #[test]
    fn resolve_source_falls_back_to_the_default() {
        let default_source = Path::new("courses.csv");

        assert_eq!(
            resolve_source("", default_source),
            PathBuf::from("courses.csv")
        );
        assert_eq!(
            resolve_source("  \t", default_source),
            PathBuf::from("courses.csv")
        );
        assert_eq!(
            resolve_source("custom.csv", default_source),
            PathBuf::from("custom.csv")
        );
        assert_eq!(
            resolve_source("  custom.csv  ", default_source),
            PathBuf::from("custom.csv")
        );
    }
}
