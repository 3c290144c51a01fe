//! Registry of the packages installed for one project.

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

use super::Package;

/// File name of the installed-package registry inside the project's vendor directory.
pub const INSTALLED_FILENAME: &str = "installed.json";

/// The project's record of which packages are installed.
///
/// Identity is `name` + `version`; other fields are informational.
#[cfg_attr(test, mockall::automock)]
pub trait InstalledRepository {
    fn has_package(&self, package: &Package) -> bool;
    fn add_package(&mut self, package: Package);
    fn remove_package(&mut self, package: &Package);

    /// Look an installed package up by name, whatever its version.
    fn find_package(&self, name: &str) -> Option<Package>;

    fn packages(&self) -> Vec<Package>;
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct InstalledFile {
    #[serde(default)]
    packages: Vec<Package>,
}

/// [`InstalledRepository`] persisted as `<vendor>/installed.json`.
///
/// Mutations stay in memory until [`JsonInstalledRepository::write`] is called.
pub struct JsonInstalledRepository<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
    packages: Vec<Package>,
}

impl<'a, R: Runtime> JsonInstalledRepository<'a, R> {
    /// Load the registry of `vendor_dir`, starting empty when it does not exist yet.
    #[tracing::instrument(skip(runtime))]
    pub fn load(runtime: &'a R, vendor_dir: &Path) -> Result<Self> {
        let path = vendor_dir.join(INSTALLED_FILENAME);
        let packages = if runtime.exists(&path) {
            let content = runtime.read_to_string(&path)?;
            let file: InstalledFile = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {:?}", path))?;
            file.packages
        } else {
            debug!("No installed registry at {:?}, starting empty", path);
            Vec::new()
        };

        Ok(Self {
            runtime,
            path,
            packages,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the registry.
    pub fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !self.runtime.exists(parent)
        {
            self.runtime.create_dir_all(parent)?;
        }

        let file = InstalledFile {
            packages: self.packages.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        let tmp_path = self.path.with_extension("json.tmp");
        self.runtime.write(&tmp_path, json.as_bytes())?;
        self.runtime
            .rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to save installed registry to {:?}", self.path))
    }
}

impl<R: Runtime> InstalledRepository for JsonInstalledRepository<'_, R> {
    fn has_package(&self, package: &Package) -> bool {
        self.packages.iter().any(|p| p.same_identity(package))
    }

    fn add_package(&mut self, package: Package) {
        self.packages.retain(|p| !p.same_identity(&package));
        self.packages.push(package);
    }

    fn remove_package(&mut self, package: &Package) {
        self.packages.retain(|p| !p.same_identity(package));
    }

    fn find_package(&self, name: &str) -> Option<Package> {
        self.packages.iter().find(|p| p.name == name).cloned()
    }

    fn packages(&self) -> Vec<Package> {
        self.packages.clone()
    }
}
