//! Symlink operations (create, remove, inspect).

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn symlink_impl(&self, original: &Path, link: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::symlink as unix_symlink;
            unix_symlink(original, link).context("Failed to create symlink")?;
        }
        #[cfg(windows)]
        {
            use anyhow::bail;
            use log::trace;
            use std::os::windows::fs::{symlink_dir, symlink_file};

            // A relative target is relative to the link's parent, not the CWD.
            let target_path = if original.is_absolute() {
                original.to_path_buf()
            } else {
                link.parent()
                    .context("Failed to get parent directory for symlink")?
                    .join(original)
            };

            // Shared package trees are directories; a missing target is most
            // likely one that has not been downloaded yet.
            if target_path.is_dir() || !target_path.exists() {
                trace!("Creating directory symlink {:?} -> {:?}", link, original);
                symlink_dir(original, link).context("Failed to create directory symlink")?;
            } else {
                trace!("Creating file symlink {:?} -> {:?}", link, original);
                symlink_file(original, link).context("Failed to create file symlink")?;
            }

            if fs::symlink_metadata(link).is_err() {
                bail!(
                    "Symlink creation reported success but link does not exist: link={:?} target={:?}",
                    link,
                    original
                );
            }
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_symlink_impl(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_symlink_impl(&self, path: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            fs::remove_file(path).context("Failed to remove symlink")?;
        }
        #[cfg(windows)]
        {
            // Directory symlinks need remove_dir, file symlinks remove_file.
            fs::remove_dir(path)
                .or_else(|_| fs::remove_file(path))
                .context("Failed to remove symlink")?;
        }
        Ok(())
    }
}
