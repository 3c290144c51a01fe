//! Installation strategies.
//!
//! - `solver` - decides shared vs default per package
//! - `library` - the default strategy: a private copy under the project's vendor dir
//! - `shared` - one copy per version in the shared store, linked into each project
//! - `dispatch` - the facade picking a strategy per operation

mod dispatch;
mod library;
mod shared;
mod solver;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::package::{InstalledRepository, Package};

pub use dispatch::InstallerDispatcher;
pub use library::LibraryInstaller;
pub use shared::SharedInstaller;
pub use solver::{PLUGIN_PACKAGE_NAME, SharedPackageSolver};

/// A strategy able to install, update and remove packages for one project.
pub trait PackageInstaller {
    fn supports(&self, package_type: &str) -> bool;

    fn install_path(&self, package: &Package) -> PathBuf;

    fn is_installed(&self, repo: &dyn InstalledRepository, package: &Package) -> bool;

    fn install(&self, repo: &mut dyn InstalledRepository, package: &Package) -> Result<()>;

    fn update(
        &self,
        repo: &mut dyn InstalledRepository,
        initial: &Package,
        target: &Package,
    ) -> Result<()>;

    fn uninstall(&self, repo: &mut dyn InstalledRepository, package: &Package) -> Result<()>;
}

/// The lower-level steps of the default strategy, reused by the shared
/// installer against paths inside the shared store.
pub trait DefaultInstaller: PackageInstaller {
    /// Fetch the package's code into `path` and record how it was obtained.
    fn download_to(&self, package: &mut Package, path: &Path) -> Result<()>;

    /// Replace the code at `path` (holding `initial`) with `target`.
    fn update_code(&self, initial: &Package, target: &mut Package, path: &Path) -> Result<()>;

    /// Delete the package's code at `path`.
    fn remove_from(&self, package: &Package, path: &Path) -> Result<()>;

    /// Expose the package's executables found under `install_path`.
    fn install_binaries(&self, package: &Package, install_path: &Path) -> Result<()>;

    fn remove_binaries(&self, package: &Package) -> Result<()>;
}
