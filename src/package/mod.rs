//! Package model and the per-project installed-package registry.

mod model;
mod repository;

pub use model::{
    DEFAULT_PACKAGE_TYPE, InstallationSource, Package, PackageKey, SHARED_PACKAGE_TYPE,
};
pub use repository::{INSTALLED_FILENAME, InstalledRepository, JsonInstalledRepository};

#[cfg(test)]
pub use repository::MockInstalledRepository;
