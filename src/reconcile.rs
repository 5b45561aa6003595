//! Schema reconciliation
//!
//! Joins two directory listings on schema identifier and partitions the
//! identifiers into common, first-only and second-only sets.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::listing::DirectoryListing;
use crate::naming::{SchemaNaming, Side};

/// Identifier → absolute file path for one side
pub type FileMapping = HashMap<String, PathBuf>;

/// Outcome of joining two directories on schema identifier
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Identifiers present on both sides
    pub common: BTreeSet<String>,
    /// Identifiers only in the first directory
    pub first_only: BTreeSet<String>,
    /// Identifiers only in the second directory
    pub second_only: BTreeSet<String>,
    pub first_mapping: FileMapping,
    pub second_mapping: FileMapping,
}

/// A matched pair of schema files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaPair<'a> {
    pub identifier: &'a str,
    pub first: &'a Path,
    pub second: &'a Path,
}

impl Reconciliation {
    /// Scan both directories and reconcile them.
    ///
    /// The first directory is checked before the second; a missing directory aborts
    /// before anything else is read.
    pub fn from_sides(first: &Side, second: &Side) -> Result<Self> {
        let first_listing = DirectoryListing::scan(&first.directory)?;
        let second_listing = DirectoryListing::scan(&second.directory)?;
        debug!(
            first = %first_listing.directory().display(),
            first_files = first_listing.len(),
            second = %second_listing.directory().display(),
            second_files = second_listing.len(),
            "scanned schema directories"
        );
        Ok(Self::from_listings(
            &first_listing,
            &first.naming,
            &second_listing,
            &second.naming,
        ))
    }

    /// Reconcile two in-memory listings
    pub fn from_listings(
        first: &DirectoryListing,
        first_naming: &SchemaNaming,
        second: &DirectoryListing,
        second_naming: &SchemaNaming,
    ) -> Self {
        let first_mapping = file_mapping(first, first_naming);
        let second_mapping = file_mapping(second, second_naming);

        let first_keys: BTreeSet<String> = first_mapping.keys().cloned().collect();
        let second_keys: BTreeSet<String> = second_mapping.keys().cloned().collect();

        let common: BTreeSet<_> = first_keys.intersection(&second_keys).cloned().collect();
        let first_only: BTreeSet<_> = first_keys.difference(&second_keys).cloned().collect();
        let second_only: BTreeSet<_> = second_keys.difference(&first_keys).cloned().collect();

        info!(
            common = common.len(),
            first_only = first_only.len(),
            second_only = second_only.len(),
            "reconciled schema directories"
        );

        Self {
            common,
            first_only,
            second_only,
            first_mapping,
            second_mapping,
        }
    }

    /// Matched pairs in identifier order
    pub fn pairs(&self) -> impl Iterator<Item = SchemaPair<'_>> {
        self.common.iter().filter_map(move |identifier| {
            let first = self.first_mapping.get(identifier)?;
            let second = self.second_mapping.get(identifier)?;
            Some(SchemaPair {
                identifier,
                first,
                second,
            })
        })
    }
}

/// Build the identifier mapping for one listing; later names win on collision
fn file_mapping(listing: &DirectoryListing, naming: &SchemaNaming) -> FileMapping {
    let mut mapping = FileMapping::new();
    for (name, path) in listing.entries() {
        let Some(identifier) = naming.identifier(name) else {
            continue;
        };
        if let Some(previous) = mapping.insert(identifier.clone(), path.to_path_buf()) {
            debug!(
                identifier = %identifier,
                replaced = %previous.display(),
                "duplicate schema identifier"
            );
        }
    }
    mapping
}
