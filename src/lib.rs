//! Schema Compare
//!
//! Compares JSON schema files between two directories (typically two API versions)
//! and writes a plain-text diff report.
//!
//! ## Features
//!
//! - **Prefix Matching**: Files are joined on an identifier derived by stripping a
//!   per-directory prefix and a shared suffix (`v1_user_schema.json` -> `user`)
//! - **Version Substitution**: The second directory and both prefixes can be
//!   derived from a pair of version tokens
//! - **Pluggable Engines**: `json-diff` as an external process or a built-in
//!   line diff of normalized JSON
//! - **Self-Documenting Reports**: Errors that end a run are appended to the report
//!
//! ## Report layout
//!
//! ```text
//! 2024-03-05 14:07:09
//!
//! First directory - api/v1 (prefix 'v1_')
//! Second directory - api/v2 (prefix 'v2_')
//!
//! Found the next 1 unique schemas in api/v1.
//!   · order
//!
//! Found the next 1 matching schemas.
//!   · user
//!
//! 💠 Comparing schema 'user'...
//!     First directory file - v1_user_schema.json
//!     Second directory file - v2_user_schema.json
//!   Schemas are identical.
//! ```

pub mod checksum;
pub mod comparator;
pub mod config;
pub mod error;
pub mod listing;
pub mod naming;
pub mod reconcile;
pub mod report;
pub mod session;

pub use checksum::Checksum;
pub use comparator::{
    ChecksumShortcut, Comparator, ComparisonOutcome, JsonDiffTool, OutcomeKind, TextDiffEngine,
};
pub use config::{CompareConfig, Engine};
pub use error::{CompareError, Result};
pub use listing::DirectoryListing;
pub use naming::{Convention, SchemaNaming, Side};
pub use reconcile::{FileMapping, Reconciliation, SchemaPair};
pub use report::ReportWriter;
pub use session::{ComparisonSession, PairSummary, RunSummary};
