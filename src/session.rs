//! Comparison session
//!
//! Runs one end-to-end comparison: reconcile both directories, write the report
//! header and identifier sections, then compare every matched pair in identifier
//! order. A pair whose comparison fails is reported in place and the run carries
//! on; configuration errors, I/O errors and interruption end the run and are
//! appended to the report before being returned.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};

use crate::comparator::{Comparator, ComparisonOutcome, OutcomeKind};
use crate::config::CompareConfig;
use crate::error::{CompareError, Result};
use crate::naming::{Convention, Side};
use crate::reconcile::Reconciliation;
use crate::report::ReportWriter;

/// One end-to-end comparison between two schema directories
pub struct ComparisonSession<C> {
    first: Side,
    second: Side,
    output: PathBuf,
    rule_width: usize,
    comparator: C,
    cancelled: Arc<AtomicBool>,
}

/// What a finished run found
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub first_directory: PathBuf,
    pub second_directory: PathBuf,
    pub first_prefix: String,
    pub second_prefix: String,
    pub output: PathBuf,
    pub first_only: Vec<String>,
    pub second_only: Vec<String>,
    pub compared: Vec<PairSummary>,
}

/// Outcome of one compared pair
#[derive(Debug, Clone, Serialize)]
pub struct PairSummary {
    pub identifier: String,
    pub outcome: OutcomeKind,
}

impl RunSummary {
    pub fn count(&self, kind: OutcomeKind) -> usize {
        self.compared.iter().filter(|p| p.outcome == kind).count()
    }

    pub fn has_matches(&self) -> bool {
        !self.compared.is_empty()
    }
}

impl<C: Comparator> ComparisonSession<C> {
    pub fn new(first: Side, second: Side, output: impl Into<PathBuf>, comparator: C) -> Self {
        Self {
            first,
            second,
            output: output.into(),
            rule_width: 75,
            comparator,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Build a session from a naming convention and loaded configuration
    pub fn from_config(
        convention: &Convention,
        config: &CompareConfig,
        output: Option<&Path>,
        comparator: C,
    ) -> Result<Self> {
        let (first, second) =
            convention.resolve(&config.naming.suffix, &config.naming.version_separator)?;
        Ok(Self::new(first, second, config.resolve_output(output), comparator)
            .with_rule_width(config.report.rule_width))
    }

    pub fn with_rule_width(mut self, width: usize) -> Self {
        self.rule_width = width;
        self
    }

    /// Share a flag that aborts the run once set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = flag;
        self
    }

    pub fn first(&self) -> &Side {
        &self.first
    }

    pub fn second(&self) -> &Side {
        &self.second
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Run the comparison, replacing the report file at the output path
    pub fn run(&self) -> Result<RunSummary> {
        info!(output = %self.output.display(), "starting schema comparison");
        let mut report = ReportWriter::create(&self.output, self.rule_width)?;
        self.run_to(&mut report)
    }

    /// Run the comparison against an arbitrary report writer
    pub fn run_to<W: Write>(&self, report: &mut ReportWriter<W>) -> Result<RunSummary> {
        match self.execute(report) {
            Ok(summary) => Ok(summary),
            Err(err) => {
                if let Err(write_err) = report.error(&err.to_string()) {
                    warn!(error = %write_err, "could not append error to report");
                }
                Err(err)
            }
        }
    }

    fn execute<W: Write>(&self, report: &mut ReportWriter<W>) -> Result<RunSummary> {
        report.header(&Local::now(), &self.first, &self.second)?;

        let reconciliation = Reconciliation::from_sides(&self.first, &self.second)?;

        report.unique_schemas(&self.first.directory, &reconciliation.first_only)?;
        report.unique_schemas(&self.second.directory, &reconciliation.second_only)?;
        report.matching_schemas(&reconciliation.common)?;

        let mut compared = Vec::with_capacity(reconciliation.common.len());
        let total = reconciliation.common.len();

        for (index, pair) in reconciliation.pairs().enumerate() {
            self.check_cancelled()?;

            let outcome = match self.comparator.compare(pair.first, pair.second) {
                Ok(outcome) => outcome,
                Err(_) if self.is_cancelled() => return Err(CompareError::Interrupted),
                Err(err) => return Err(err),
            };
            self.check_cancelled()?;

            // Header only once the comparison actually ran
            report.pair_header(pair.identifier, pair.first, pair.second)?;
            if let ComparisonOutcome::Failed(message) = &outcome {
                warn!(schema = pair.identifier, %message, "comparison failed");
            }
            report.outcome(&outcome)?;

            compared.push(PairSummary {
                identifier: pair.identifier.to_string(),
                outcome: outcome.kind(),
            });

            if index + 1 < total {
                report.rule()?;
            }
        }

        info!(compared = compared.len(), "schema comparison finished");

        Ok(RunSummary {
            first_directory: self.first.directory.clone(),
            second_directory: self.second.directory.clone(),
            first_prefix: self.first.prefix().to_string(),
            second_prefix: self.second.prefix().to_string(),
            output: self.output.clone(),
            first_only: reconciliation.first_only.into_iter().collect(),
            second_only: reconciliation.second_only.into_iter().collect(),
            compared,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(CompareError::Interrupted);
        }
        Ok(())
    }
}
