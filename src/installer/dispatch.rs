//! Facade routing every operation to the shared or the default strategy.

use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use super::{PackageInstaller, SharedPackageSolver};
use crate::error::SharedPackageError;
use crate::package::{InstalledRepository, Package};

pub struct InstallerDispatcher<'a, S: PackageInstaller, D: PackageInstaller> {
    solver: &'a SharedPackageSolver,
    shared: &'a S,
    default: &'a D,
}

impl<'a, S: PackageInstaller, D: PackageInstaller> InstallerDispatcher<'a, S, D> {
    pub fn new(solver: &'a SharedPackageSolver, shared: &'a S, default: &'a D) -> Self {
        Self {
            solver,
            shared,
            default,
        }
    }

    pub fn is_shared(&self, package: &Package) -> bool {
        self.solver.is_shared_package(package)
    }

    fn strategy(&self, package: &Package) -> &dyn PackageInstaller {
        if self.is_shared(package) {
            debug!("{} is a shared package", package);
            self.shared
        } else {
            self.default
        }
    }

    fn require_installed(repo: &dyn InstalledRepository, package: &Package) -> Result<()> {
        if !repo.has_package(package) {
            return Err(SharedPackageError::not_installed(&package.name, &package.version).into());
        }
        Ok(())
    }
}

impl<S: PackageInstaller, D: PackageInstaller> PackageInstaller for InstallerDispatcher<'_, S, D> {
    fn supports(&self, _package_type: &str) -> bool {
        true
    }

    fn install_path(&self, package: &Package) -> PathBuf {
        self.strategy(package).install_path(package)
    }

    fn is_installed(&self, repo: &dyn InstalledRepository, package: &Package) -> bool {
        self.strategy(package).is_installed(repo, package)
    }

    fn install(&self, repo: &mut dyn InstalledRepository, package: &Package) -> Result<()> {
        self.strategy(package).install(repo, package)
    }

    /// Both sides default: the default strategy. Both shared: the shared
    /// strategy. Mixed: remove `initial` with its strategy and install
    /// `target` with the other one.
    fn update(
        &self,
        repo: &mut dyn InstalledRepository,
        initial: &Package,
        target: &Package,
    ) -> Result<()> {
        let initial_shared = self.is_shared(initial);
        let target_shared = self.is_shared(target);

        if !initial_shared && !target_shared {
            return self.default.update(repo, initial, target);
        }

        Self::require_installed(repo, initial)?;

        if initial_shared && target_shared {
            return self.shared.update(repo, initial, target);
        }

        debug!(
            "{} moves between strategies (shared: {} => {})",
            target.name, initial_shared, target_shared
        );
        self.strategy(initial).uninstall(repo, initial)?;
        self.strategy(target).install(repo, target)
    }

    fn uninstall(&self, repo: &mut dyn InstalledRepository, package: &Package) -> Result<()> {
        if !self.is_shared(package) {
            return self.default.uninstall(repo, package);
        }

        Self::require_installed(repo, package)?;
        self.shared.uninstall(repo, package)
    }
}
