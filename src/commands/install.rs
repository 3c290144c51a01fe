use anyhow::{Result, bail};
use log::debug;
use std::path::{Path, PathBuf};

use super::{ProjectContext, with_dispatcher};
use crate::installer::PackageInstaller;
use crate::package::{InstalledRepository, Package};
use crate::runtime::{Runtime, TerminalPrompt, resolve_against};

/// A package as described on the command line.
#[derive(Debug, Clone, Default)]
pub struct PackageArgs {
    pub name: String,
    pub version: String,
    /// Directory holding the package's files.
    pub from: PathBuf,
    pub package_type: Option<String>,
    pub dev: bool,
    pub target_dir: Option<String>,
    pub bin: Vec<String>,
}

impl PackageArgs {
    /// Build the package, taking unspecified attributes from `previous`.
    fn to_package(&self, current_dir: &Path, previous: Option<&Package>) -> Package {
        let mut package = Package::new(&self.name, &self.version)
            .with_dev(self.dev)
            .with_dist(resolve_against(current_dir, &self.from));

        if let Some(package_type) = self
            .package_type
            .clone()
            .or_else(|| previous.map(|p| p.package_type.clone()))
        {
            package = package.with_type(package_type);
        }
        if let Some(target_dir) = self
            .target_dir
            .clone()
            .or_else(|| previous.and_then(|p| p.target_dir.clone()))
        {
            package = package.with_target_dir(target_dir);
        }

        let bin = if self.bin.is_empty() {
            previous.map(|p| p.bin.clone()).unwrap_or_default()
        } else {
            self.bin.clone()
        };
        package.with_bin(bin)
    }
}

/// Install a package into the project. Installing another version of an
/// installed package updates it.
#[tracing::instrument(skip(runtime))]
pub fn install<R: Runtime>(runtime: R, project: Option<&Path>, args: &PackageArgs) -> Result<()> {
    let ctx = ProjectContext::load(&runtime, project)?;
    let package = args.to_package(&runtime.current_dir()?, None);
    let prompt = TerminalPrompt::new(false);

    with_dispatcher(&runtime, &ctx, &prompt, |dispatcher, repo| {
        match repo.find_package(&package.name) {
            Some(installed) if installed.same_identity(&package) => {
                if dispatcher.is_installed(&*repo, &installed) {
                    println!("Package {} is already installed", installed);
                    return Ok(());
                }
                debug!("{} is registered but incomplete, installing again", installed);
                dispatcher.install(repo, &package)
            }
            Some(installed) => dispatcher.update(repo, &installed, &package),
            None => dispatcher.install(repo, &package),
        }
    })
}

/// Move an installed package to another version (or new code for the same one).
#[tracing::instrument(skip(runtime))]
pub fn update<R: Runtime>(runtime: R, project: Option<&Path>, args: &PackageArgs) -> Result<()> {
    let ctx = ProjectContext::load(&runtime, project)?;
    let current_dir = runtime.current_dir()?;
    let prompt = TerminalPrompt::new(false);

    with_dispatcher(&runtime, &ctx, &prompt, |dispatcher, repo| {
        let Some(initial) = repo.find_package(&args.name) else {
            bail!("Package {} is not installed", args.name);
        };
        let target = args.to_package(&current_dir, Some(&initial));
        dispatcher.update(repo, &initial, &target)
    })
}
