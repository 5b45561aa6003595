//! Plain-text comparison report
//!
//! Every entry is flushed as soon as it is written so an aborted run still leaves
//! everything reported so far on disk.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, TimeZone};

use crate::comparator::ComparisonOutcome;
use crate::naming::Side;

/// Marker placed before each identifier in a list
pub const BULLET: &str = "  · ";

/// Line written for a pair without differences
pub const IDENTICAL_MARKER: &str = "  Schemas are identical.";

/// Line written when no identifier is shared
pub const NO_MATCHES: &str = "No matching schemas found between the directories.";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writer for the comparison report
pub struct ReportWriter<W: Write> {
    out: W,
    rule_width: usize,
}

impl ReportWriter<File> {
    /// Create the report file, replacing any report left by an earlier run
    pub fn create(path: impl AsRef<Path>, rule_width: usize) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self::new(File::create(path)?, rule_width))
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, rule_width: usize) -> Self {
        Self { out, rule_width }
    }

    /// Timestamp and the two sides being compared
    pub fn header<Tz>(&mut self, at: &DateTime<Tz>, first: &Side, second: &Side) -> io::Result<()>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        self.entry(&format!("{}\n", at.format(TIMESTAMP_FORMAT)))?;
        self.entry(&format!(
            "First directory - {} (prefix '{}')",
            first.directory.display(),
            first.prefix()
        ))?;
        self.entry(&format!(
            "Second directory - {} (prefix '{}')\n",
            second.directory.display(),
            second.prefix()
        ))
    }

    /// Identifiers found only in one directory; nothing is written for an empty set
    pub fn unique_schemas(&mut self, directory: &Path, identifiers: &BTreeSet<String>) -> io::Result<()> {
        if identifiers.is_empty() {
            return Ok(());
        }
        self.entry(&format!(
            "Found the next {} unique schemas in {}.",
            identifiers.len(),
            directory.display()
        ))?;
        self.entry(&format!("{}\n", bullet_list(identifiers)))
    }

    /// Identifiers shared by both directories
    pub fn matching_schemas(&mut self, identifiers: &BTreeSet<String>) -> io::Result<()> {
        if identifiers.is_empty() {
            return self.entry(NO_MATCHES);
        }
        self.entry(&format!("Found the next {} matching schemas.", identifiers.len()))?;
        self.entry(&bullet_list(identifiers))
    }

    /// Heading for one compared pair
    pub fn pair_header(&mut self, identifier: &str, first: &Path, second: &Path) -> io::Result<()> {
        self.entry(&format!(
            "\n💠 Comparing schema '{}'...\n    First directory file - {}\n    Second directory file - {}",
            identifier,
            file_name(first),
            file_name(second)
        ))
    }

    /// Result of one compared pair
    pub fn outcome(&mut self, outcome: &ComparisonOutcome) -> io::Result<()> {
        match outcome {
            ComparisonOutcome::Identical => self.entry(IDENTICAL_MARKER),
            ComparisonOutcome::Different(diff) => self.entry(diff),
            ComparisonOutcome::Failed(message) => {
                self.entry(&format!("  Comparison failed: {}", message))
            }
        }
    }

    /// Dash rule separating two pairs
    pub fn rule(&mut self) -> io::Result<()> {
        self.entry(&format!("\n{}", "-".repeat(self.rule_width)))
    }

    /// Message for an error that ended the run
    pub fn error(&mut self, message: &str) -> io::Result<()> {
        self.entry(message)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn entry(&mut self, content: &str) -> io::Result<()> {
        writeln!(self.out, "{}", content)?;
        self.out.flush()
    }
}

fn bullet_list(identifiers: &BTreeSet<String>) -> String {
    identifiers
        .iter()
        .map(|id| format!("{}{}", BULLET, id))
        .collect::<Vec<_>>()
        .join("\n")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
