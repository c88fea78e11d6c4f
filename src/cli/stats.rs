use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use clap::Parser;
use tracing::instrument;

use super::terminal::{is_narrow, Colorize};

/// Show course counts per subject and hash-table occupancy.
#[derive(Debug, Parser)]
pub struct Stats {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
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
}

impl Stats {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let (catalog, _) = super::load_catalog(root, self.file.as_deref())?;

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for course in catalog.courses() {
            *counts
                .entry(course.number().subject().to_string())
                .or_insert(0) += 1;
        }

        // Stored records count duplicates; the listing is duplicate-free.
        let total = catalog.len();
        let distinct = catalog.courses().count();
        let table = catalog.table();
        let occupied = table.chain_lengths().filter(|&length| length > 0).count();
        let longest = table.chain_lengths().max().unwrap_or(0);

        if total == 0 {
            println!("No courses loaded yet. Run 'plan init' to create a starter catalog.");
            return Ok(());
        }

        let capacity = table.capacity();
        match self.output {
            OutputFormat::Json => {
                Self::output_json(&counts, total, distinct, capacity, occupied, longest)?;
            }
            OutputFormat::Table => {
                if self.quiet {
                    Self::output_quiet(total, distinct, capacity, occupied, longest);
                } else {
                    Self::output_table(&counts, total, distinct, capacity, occupied, longest);
                }
            }
        }

        Ok(())
    }

    fn output_json(
        counts: &BTreeMap<String, usize>,
        total: usize,
        distinct: usize,
        capacity: usize,
        occupied: usize,
        longest: usize,
    ) -> anyhow::Result<()> {
        use serde_json::json;

        let subjects: Vec<_> = counts
            .iter()
            .map(|(subject, count)| {
                json!({
                    "subject": subject,
                    "count": count,
                })
            })
            .collect();

        let output = json!({
            "subjects": subjects,
            "total": total,
            "distinct": distinct,
            "table": {
                "buckets": capacity,
                "occupied": occupied,
                "longest_chain": longest,
            }
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(
        total: usize,
        distinct: usize,
        capacity: usize,
        occupied: usize,
        longest: usize,
    ) {
        println!(
            "total={total} distinct={distinct} buckets={capacity} occupied={occupied} longest={longest}"
        );
    }

    fn output_table(
        counts: &BTreeMap<String, usize>,
        total: usize,
        distinct: usize,
        capacity: usize,
        occupied: usize,
        longest: usize,
    ) {
        // Chains longer than this suggest the bucket count is too small.
        const LONG_CHAIN_THRESHOLD: usize = 3;
        let narrow = is_narrow();

        println!("Course counts");
        println!("{}", "─────────────".dim());

        if narrow {
            // Stacked output for narrow terminals
            for (subject, count) in counts {
                println!("{subject}: {count}");
            }
            println!("Total: {distinct}");
        } else {
            // Table layout
            println!("{:<10} Count", "Subject");
            for (subject, count) in counts {
                println!("{subject:<10} {count}");
            }
            println!("Total      {distinct}");
        }

        println!();

        println!("Hash table");
        println!("{}", "──────────".dim());
        println!("Records:       {total}");
        println!("Buckets:       {occupied} of {capacity} occupied");
        if longest > LONG_CHAIN_THRESHOLD {
            println!("Longest chain: {} ⚠️", longest.to_string().warning());
            println!("{}", "Consider raising 'buckets' in planner.toml.".dim());
        } else {
            println!("Longest chain: {longest} ✅");
        }
    }
}
