use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use super::CourseTable;

/// Configuration for the course planner.
///
/// Read from `planner.toml` in the root directory. Every field has a
/// default, so a missing file or a bare `_version` line yields a working
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The course file loaded when no override is given on the command line.
    /// Relative paths are resolved against the root directory.
    source: PathBuf,

    /// The field separator used by the course file.
    delimiter: char,

    /// Bucket count for the lookup table.
    ///
    /// Zero is unrepresentable; a `buckets = 0` line fails deserialization
    /// rather than producing a table that cannot hash.
    buckets: NonZeroUsize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: default_source(),
            delimiter: default_delimiter(),
            buckets: default_buckets(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the configured course file path.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Returns the field separator.
    #[must_use]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Returns the lookup-table bucket count.
    #[must_use]
    pub const fn buckets(&self) -> NonZeroUsize {
        self.buckets
    }
}

fn default_source() -> PathBuf {
    PathBuf::from("courses.csv")
}

const fn default_delimiter() -> char {
    ','
}

const fn default_buckets() -> NonZeroUsize {
    CourseTable::DEFAULT_CAPACITY
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_source")]
        source: PathBuf,

        #[serde(default = "default_delimiter")]
        delimiter: char,

        #[serde(default = "default_buckets")]
        buckets: NonZeroUsize,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                source,
                delimiter,
                buckets,
            } => Self {
                source,
                delimiter,
                buckets,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            source: config.source,
            delimiter: config.delimiter,
            buckets: config.buckets,
        }
    }
}
