//! Directory listing
//!
//! Only the top level of a directory is read. A symlink counts as a file when its
//! target is a regular file; dangling links and links to directories are skipped.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{CompareError, Result};

/// Regular files directly inside one directory, keyed by file name.
///
/// Names that are not valid UTF-8 are kept under their lossy rendering so they
/// show up in [`names`](Self::names), but [`entries`](Self::entries) leaves them
/// out since no prefix can be matched against them.
#[derive(Debug, Clone, Default)]
pub struct DirectoryListing {
    directory: PathBuf,
    files: BTreeMap<String, PathBuf>,
}

impl DirectoryListing {
    /// Scan a directory.
    ///
    /// Fails with [`CompareError::DirectoryNotFound`] when the path is missing or is
    /// not a directory.
    pub fn scan(directory: impl AsRef<Path>) -> Result<Self> {
        let directory = directory.as_ref();
        if !directory.is_dir() {
            return Err(CompareError::DirectoryNotFound {
                path: directory.to_path_buf(),
            });
        }

        let root = std::path::absolute(directory)?;
        let mut files = BTreeMap::new();

        for entry in WalkDir::new(&root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(walk_error)?;
            // Path::is_file follows symlinks
            if !entry.file_type().is_file() && !entry.path().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            files.insert(name, entry.path().to_path_buf());
        }

        debug!(directory = %root.display(), count = files.len(), "listed directory");

        Ok(Self {
            directory: root,
            files,
        })
    }

    /// Build a listing from names without touching the filesystem
    pub fn from_names<I, S>(directory: impl Into<PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let directory = directory.into();
        let files = names
            .into_iter()
            .map(|name| {
                let name = name.into();
                let path = directory.join(&name);
                (name, path)
            })
            .collect();
        Self { directory, files }
    }

    /// Absolute directory path
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File names in lexicographic order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// (name, path) pairs in lexicographic name order, UTF-8 names only
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.files
            .iter()
            .filter(|(_, path)| path.file_name().and_then(|n| n.to_str()).is_some())
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

fn walk_error(err: walkdir::Error) -> CompareError {
    match err.into_io_error() {
        Some(io) => CompareError::Io(io),
        None => CompareError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "filesystem loop while listing directory",
        )),
    }
}
