//! Idempotent symlink and directory helpers used by the shared installer.
//!
//! "Nothing to do" is reported as `Ok(false)`, never as an error. Only a
//! failed removal of something that is there is fatal.

use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

use crate::error::SharedPackageError;
use crate::runtime::Runtime;

pub struct SymlinkFilesystem<'a, R: Runtime> {
    runtime: &'a R,
}

impl<'a, R: Runtime> SymlinkFilesystem<'a, R> {
    pub fn new(runtime: &'a R) -> Self {
        Self { runtime }
    }

    /// Create `link` pointing at `source`, creating missing parent directories.
    ///
    /// Returns `false` if `link` is already a symlink, whatever it points at.
    #[tracing::instrument(skip(self))]
    pub fn ensure_symlink(&self, source: &Path, link: &Path) -> Result<bool> {
        if self.runtime.is_symlink(link) {
            debug!("Symlink {:?} already exists", link);
            return Ok(false);
        }

        if let Some(parent) = link.parent()
            && !self.runtime.exists(parent)
        {
            self.runtime.create_dir_all(parent)?;
        }

        self.runtime
            .symlink(source, link)
            .with_context(|| format!("Failed to create symlink {:?} -> {:?}", link, source))?;
        Ok(true)
    }

    /// Remove `link` if it is a symlink. Returns `false` when there is none.
    #[tracing::instrument(skip(self))]
    pub fn remove_symlink(&self, link: &Path) -> Result<bool> {
        if !self.runtime.is_symlink(link) {
            return Ok(false);
        }

        self.runtime
            .remove_symlink(link)
            .map_err(|source| SharedPackageError::Filesystem {
                action: "Unable to remove the symlink",
                path: link.to_path_buf(),
                source: source.into(),
            })?;
        Ok(true)
    }

    /// Remove `path` if it is an empty directory. Returns `false` when it is
    /// missing, not a directory, or not empty.
    #[tracing::instrument(skip(self))]
    pub fn remove_empty_directory(&self, path: &Path) -> Result<bool> {
        if !self.runtime.is_dir(path) || self.runtime.is_symlink(path) {
            return Ok(false);
        }

        let entries = self
            .runtime
            .read_dir(path)
            .with_context(|| format!("Failed to list directory {:?}", path))?;
        if !entries.is_empty() {
            debug!("Directory {:?} is not empty, keeping it", path);
            return Ok(false);
        }

        self.runtime
            .remove_dir(path)
            .map_err(|source| SharedPackageError::Filesystem {
                action: "Unable to remove the directory",
                path: path.to_path_buf(),
                source: source.into(),
            })?;
        Ok(true)
    }
}
