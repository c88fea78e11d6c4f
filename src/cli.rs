use std::path::{Path, PathBuf};

mod check;
mod find;
mod list;
mod menu;
mod stats;
mod terminal;

use check::Check;
use clap::ArgAction;
use find::Find;
use list::List;
use menu::Menu;
use planner::{Catalog, Config, CourseNumber};
use stats::Stats;
use tracing::instrument;

/// Name of the configuration file expected in the root directory.
const CONFIG_FILE: &str = "planner.toml";

/// Starter catalog written by `plan init`.
const SAMPLE_COURSES: &str = "\
MATH201,Discrete Mathematics
CS101,Introduction to Computer Science
CS201,Data Structures,CS101
CS300,Algorithms,CS201,MATH201
";

/// Parse a course number from a string, normalizing to uppercase.
///
/// This is a CLI boundary function that accepts lowercase input
/// and normalizes it before validation.
fn parse_course_number(s: &str) -> Result<CourseNumber, String> {
    // Normalize to uppercase
    let uppercase = s.trim().to_uppercase();
    uppercase.parse().map_err(|e| format!("{e}"))
}

/// Read the configuration from the root directory, falling back to
/// defaults when no file is present.
fn load_config(root: &Path) -> Config {
    let path = root.join(CONFIG_FILE);
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}

/// Build a catalog from the configured source, or from an explicit
/// override path.
///
/// Returns the catalog together with the path that was read.
fn load_catalog(root: &Path, file: Option<&Path>) -> anyhow::Result<(Catalog, PathBuf)> {
    let config = load_config(root);
    let source = file.map_or_else(|| root.join(config.source()), Path::to_path_buf);

    let mut catalog = Catalog::with_capacity(config.buckets());
    let report = planner::load(&source, config.delimiter(), &mut catalog)?;

    for skipped in report.skipped() {
        tracing::warn!("{}: {skipped}", source.display());
    }
    if report.is_empty() {
        tracing::warn!("no courses found in {}", source.display());
    }

    Ok((catalog, source))
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The directory containing planner.toml and the course file
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let command = self
            .command
            .unwrap_or_else(|| Command::Menu(Menu::default()));
        command.run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Run the interactive course-planner menu (default)
    Menu(Menu),

    /// Initialize a directory with a config file and a sample catalog
    Init,

    /// List courses in ascending course-number order
    List(List),

    /// Display a course and its prerequisites
    Find(Find),

    /// Check that every prerequisite resolves and no cycles exist
    Check(Check),

    /// Show course counts and hash-table occupancy
    Stats(Stats),
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::Menu(command) => command.run(root)?,
            Self::Init => Init::run(root)?,
            Self::List(command) => command.run(root)?,
            Self::Find(command) => command.run(root)?,
            Self::Check(command) => command.run(root)?,
            Self::Stats(command) => command.run(root)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        use std::fs;

        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            anyhow::bail!("Already initialized (found existing {CONFIG_FILE})");
        }

        let config = Config::default();
        config
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {CONFIG_FILE}: {e}"))?;

        // Only seed a sample catalog when the source doesn't exist yet.
        let source = root.join(config.source());
        let mut created_source = false;
        if !source.exists() {
            fs::write(&source, SAMPLE_COURSES)
                .map_err(|e| anyhow::anyhow!("Failed to create sample course file: {e}"))?;
            created_source = true;
        }

        println!("Initialized course planner in {}", root.display());
        println!("  Created: {CONFIG_FILE}");
        if created_source {
            println!("  Created: {}", config.source().display());
        }
        println!();
        println!("Next steps:");
        println!("  plan              # interactive menu");
        println!("  plan list         # list the sample catalog");
        println!("  plan check        # verify prerequisites");

        Ok(())
    }
}
