//! The default strategy: every project gets its own copy of the package
//! under `<vendor>/<name>`, copied from the package's local `dist` directory.

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use super::{DefaultInstaller, PackageInstaller};
use crate::error::SharedPackageError;
use crate::filesystem::SymlinkFilesystem;
use crate::package::{InstallationSource, InstalledRepository, Package};
use crate::runtime::{Runtime, relative_symlink_path};

/// Directory under the vendor dir holding links to package executables.
pub const BIN_DIR: &str = "bin";

pub struct LibraryInstaller<'a, R: Runtime> {
    runtime: &'a R,
    vendor_dir: PathBuf,
}

impl<'a, R: Runtime> LibraryInstaller<'a, R> {
    pub fn new(runtime: &'a R, vendor_dir: &Path) -> Self {
        Self {
            runtime,
            vendor_dir: vendor_dir.to_path_buf(),
        }
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.vendor_dir.join(BIN_DIR)
    }

    fn bin_link(&self, bin: &str) -> Option<PathBuf> {
        Path::new(bin)
            .file_name()
            .map(|name| self.bin_dir().join(name))
    }

    fn copy_dir(&self, from: &Path, to: &Path) -> Result<()> {
        self.runtime.create_dir_all(to)?;
        for entry in self.runtime.read_dir(from)? {
            let Some(name) = entry.file_name() else {
                continue;
            };
            let dest = to.join(name);
            if self.runtime.is_dir(&entry) {
                self.copy_dir(&entry, &dest)?;
            } else {
                self.runtime
                    .copy(&entry, &dest)
                    .with_context(|| format!("Failed to copy {:?} to {:?}", entry, dest))?;
            }
        }
        Ok(())
    }

    fn require_installed(repo: &dyn InstalledRepository, package: &Package) -> Result<()> {
        if !repo.has_package(package) {
            return Err(SharedPackageError::not_installed(&package.name, &package.version).into());
        }
        Ok(())
    }
}

impl<R: Runtime> PackageInstaller for LibraryInstaller<'_, R> {
    fn supports(&self, _package_type: &str) -> bool {
        true
    }

    fn install_path(&self, package: &Package) -> PathBuf {
        let path = self.vendor_dir.join(&package.name);
        match package.target_dir() {
            Some(target_dir) => path.join(target_dir),
            None => path,
        }
    }

    fn is_installed(&self, repo: &dyn InstalledRepository, package: &Package) -> bool {
        repo.has_package(package) && self.runtime.is_dir(&self.install_path(package))
    }

    #[tracing::instrument(skip(self, repo, package), fields(key = %package.key()))]
    fn install(&self, repo: &mut dyn InstalledRepository, package: &Package) -> Result<()> {
        println!("  - Installing {}", package);

        let path = self.install_path(package);
        let mut installed = package.clone();
        self.download_to(&mut installed, &path)?;
        self.install_binaries(&installed, &path)?;
        repo.add_package(installed);
        Ok(())
    }

    #[tracing::instrument(
        skip(self, repo, initial, target),
        fields(from = %initial.key(), to = %target.key())
    )]
    fn update(
        &self,
        repo: &mut dyn InstalledRepository,
        initial: &Package,
        target: &Package,
    ) -> Result<()> {
        Self::require_installed(repo, initial)?;
        println!(
            "  - Updating {} ({} => {})",
            target.name, initial.version, target.version
        );

        let initial_path = self.install_path(initial);
        let target_path = self.install_path(target);
        let mut updated = target.clone();

        self.remove_binaries(initial)?;
        if initial_path == target_path {
            self.update_code(initial, &mut updated, &target_path)?;
        } else {
            self.remove_from(initial, &initial_path)?;
            self.download_to(&mut updated, &target_path)?;
        }
        self.install_binaries(&updated, &target_path)?;

        repo.remove_package(initial);
        repo.add_package(updated);
        Ok(())
    }

    #[tracing::instrument(skip(self, repo, package), fields(key = %package.key()))]
    fn uninstall(&self, repo: &mut dyn InstalledRepository, package: &Package) -> Result<()> {
        Self::require_installed(repo, package)?;
        println!("  - Removing {}", package);

        let path = self.install_path(package);
        self.remove_from(package, &path)?;
        self.remove_binaries(package)?;
        repo.remove_package(package);

        // `<vendor>/acme` once the last `acme/*` package is gone
        if let Some(parent) = self.vendor_dir.join(&package.name).parent()
            && parent != self.vendor_dir
        {
            SymlinkFilesystem::new(self.runtime).remove_empty_directory(parent)?;
        }
        Ok(())
    }
}

impl<R: Runtime> DefaultInstaller for LibraryInstaller<'_, R> {
    fn download_to(&self, package: &mut Package, path: &Path) -> Result<()> {
        let Some(dist) = package.dist.clone() else {
            bail!("Package {} has no dist directory to install from", package);
        };
        if !self.runtime.is_dir(&dist) {
            bail!(
                "Dist directory {:?} of package {} does not exist",
                dist,
                package
            );
        }

        if self.runtime.exists(path) {
            debug!("Replacing existing directory {:?}", path);
            self.runtime.remove_dir_all(path)?;
        }
        debug!("Copying {:?} to {:?}", dist, path);
        self.copy_dir(&dist, path)?;

        package.installation_source = Some(InstallationSource::Dist);
        Ok(())
    }

    fn update_code(&self, initial: &Package, target: &mut Package, path: &Path) -> Result<()> {
        self.remove_from(initial, path)?;
        self.download_to(target, path)
    }

    fn remove_from(&self, package: &Package, path: &Path) -> Result<()> {
        if !self.runtime.exists(path) {
            debug!("Nothing to remove for {} at {:?}", package, path);
            return Ok(());
        }
        self.runtime
            .remove_dir_all(path)
            .with_context(|| format!("Failed to remove {} from {:?}", package, path))
    }

    fn install_binaries(&self, package: &Package, install_path: &Path) -> Result<()> {
        for bin in &package.bin {
            let target = install_path.join(bin);
            if !self.runtime.is_file(&target) {
                warn!(
                    "Skipped installation of bin {} for package {}: file not found in package",
                    bin, package.name
                );
                continue;
            }
            let Some(link) = self.bin_link(bin) else {
                continue;
            };

            if self.runtime.is_symlink(&link) {
                self.runtime.remove_symlink(&link)?;
            } else if self.runtime.exists(&link) {
                warn!(
                    "Skipped installation of bin {} for package {}: name conflicts with an existing file",
                    bin, package.name
                );
                continue;
            }

            let bin_dir = self.bin_dir();
            if !self.runtime.exists(&bin_dir) {
                self.runtime.create_dir_all(&bin_dir)?;
            }
            let link_target = relative_symlink_path(&link, &target).unwrap_or(target);
            self.runtime
                .symlink(&link_target, &link)
                .with_context(|| format!("Failed to link bin {:?}", link))?;
        }
        Ok(())
    }

    fn remove_binaries(&self, package: &Package) -> Result<()> {
        for bin in &package.bin {
            let Some(link) = self.bin_link(bin) else {
                continue;
            };
            if self.runtime.is_symlink(&link) {
                debug!("Removing bin link {:?}", link);
                self.runtime.remove_symlink(&link)?;
            }
        }
        Ok(())
    }
}
