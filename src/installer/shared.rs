//! The shared strategy.
//!
//! A shared package version is stored once at
//! `<shared storage dir>/<name>/<version>[/<target dir>]` and each consuming
//! project links `<symlink dir>/<name>` to it. The usage ledger tracks who
//! consumes what; the source tree is only deleted when the last consumer
//! leaves and the user agrees.

use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use super::{DefaultInstaller, PackageInstaller};
use crate::config::SharedConfig;
use crate::error::SharedPackageError;
use crate::filesystem::SymlinkFilesystem;
use crate::ledger::UsageLedger;
use crate::package::{InstallationSource, InstalledRepository, Package, SHARED_PACKAGE_TYPE};
use crate::runtime::{Prompt, Runtime};

pub struct SharedInstaller<'a, R: Runtime, D: DefaultInstaller> {
    runtime: &'a R,
    config: &'a SharedConfig,
    ledger: UsageLedger<'a, R>,
    filesystem: SymlinkFilesystem<'a, R>,
    default: &'a D,
    prompt: &'a dyn Prompt,
    project_name: String,
}

impl<'a, R: Runtime, D: DefaultInstaller> SharedInstaller<'a, R, D> {
    pub fn new(
        runtime: &'a R,
        config: &'a SharedConfig,
        default: &'a D,
        prompt: &'a dyn Prompt,
        project_name: &str,
    ) -> Self {
        Self {
            runtime,
            config,
            ledger: UsageLedger::new(runtime, config.shared_storage_dir(), config.source_policy()),
            filesystem: SymlinkFilesystem::new(runtime),
            default,
            prompt,
            project_name: project_name.to_string(),
        }
    }

    pub fn ledger(&self) -> &UsageLedger<'a, R> {
        &self.ledger
    }

    fn versioned_path(base: &Path, package: &Package) -> PathBuf {
        let path = base.join(&package.name).join(&package.version);
        match package.target_dir() {
            Some(target_dir) => path.join(target_dir),
            None => path,
        }
    }

    /// What the project's symlink points at: the install path, or the same
    /// layout under `symlink-base-path` when the store is seen elsewhere
    /// (containers, network mounts).
    pub fn symlink_source_path(&self, package: &Package) -> PathBuf {
        match self.config.symlink_base_path() {
            Some(base) => Self::versioned_path(base, package),
            None => self.install_path(package),
        }
    }

    pub fn vendor_symlink(&self, package: &Package) -> PathBuf {
        self.config.symlink_dir().join(&package.name)
    }

    /// Whether no project other than this one still uses the package.
    pub fn is_source_unused(&self, package: &Package) -> Result<bool> {
        let usage = self.ledger.get_usage(package)?;
        Ok(usage.iter().all(|project| *project == self.project_name))
    }

    fn create_vendor_symlink(&self, package: &Package) -> Result<()> {
        if !self.config.is_symlink_enabled() {
            return Ok(());
        }

        let created = self
            .filesystem
            .ensure_symlink(&self.symlink_source_path(package), &self.vendor_symlink(package))?;
        if created {
            println!("  - Creating symlink for {}", package);
        }
        Ok(())
    }

    fn remove_vendor_symlink(&self, package: &Package) -> Result<()> {
        if !self.config.is_symlink_enabled() {
            return Ok(());
        }

        let link = self.vendor_symlink(package);
        if self.filesystem.remove_symlink(&link)? {
            println!("  - Deleting symlink for {}", package);
            if let Some(parent) = link.parent() {
                self.filesystem.remove_empty_directory(parent)?;
            }
        }
        Ok(())
    }

    /// Delete the version's source tree, then the `<name>` and `<vendor>`
    /// directories of the store if that left them empty.
    fn remove_source(&self, package: &Package) -> Result<()> {
        let path = self.install_path(package);
        self.default.remove_from(package, &path)?;

        let version_dir = self
            .config
            .shared_storage_dir()
            .join(&package.name)
            .join(&package.version);
        if version_dir != path {
            self.filesystem.remove_empty_directory(&version_dir)?;
        }
        let mut dir = version_dir.parent();
        while let Some(current) = dir {
            if current == self.config.shared_storage_dir()
                || !self.filesystem.remove_empty_directory(current)?
            {
                break;
            }
            dir = current.parent();
        }
        Ok(())
    }

    fn download_into_store(
        &self,
        repo: &mut dyn InstalledRepository,
        package: &mut Package,
        path: &Path,
    ) -> Result<()> {
        self.default.download_to(package, path)?;
        self.default.install_binaries(package, path)?;
        repo.add_package(package.clone());
        Ok(())
    }

    /// A source tree nobody is recorded as using: refresh it from the
    /// package's dist when there is one, otherwise treat it as a `source`
    /// checkout.
    fn resolve_kept_source(
        &self,
        repo: &mut dyn InstalledRepository,
        package: &mut Package,
        path: &Path,
    ) -> Result<()> {
        if package.dist.is_some() {
            println!("  - Refreshing {} in the shared directory", package);
            return self.download_into_store(repo, package, path);
        }

        debug!(
            "Installation source of {} is unknown, assuming {}",
            package,
            InstallationSource::Source
        );
        package.installation_source = Some(InstallationSource::Source);
        self.default.install_binaries(package, path)?;
        repo.add_package(package.clone());
        Ok(())
    }

    fn confirm_source_removal(&self, package: &Package) -> Result<bool> {
        if !self.prompt.is_interactive() {
            debug!("Non-interactive session, keeping source of {}", package);
            return Ok(false);
        }
        self.prompt.ask_confirmation(
            &format!(
                "The package version {} seems to be unused.\nDo you want to delete the source folder?",
                package
            ),
            false,
        )
    }
}

impl<R: Runtime, D: DefaultInstaller> PackageInstaller for SharedInstaller<'_, R, D> {
    fn supports(&self, package_type: &str) -> bool {
        package_type == SHARED_PACKAGE_TYPE
    }

    fn install_path(&self, package: &Package) -> PathBuf {
        Self::versioned_path(self.config.shared_storage_dir(), package)
    }

    fn is_installed(&self, repo: &dyn InstalledRepository, package: &Package) -> bool {
        repo.has_package(package)
            && self.runtime.is_readable(&self.install_path(package))
            && (!self.config.is_symlink_enabled()
                || self.runtime.is_symlink(&self.vendor_symlink(package)))
    }

    #[tracing::instrument(skip(self, repo, package), fields(key = %package.key()))]
    fn install(&self, repo: &mut dyn InstalledRepository, package: &Package) -> Result<()> {
        let path = self.install_path(package);
        let mut installed = package.clone();

        if !self.runtime.is_readable(&path) {
            println!("  - Installing {} into the shared directory", package);
            self.download_into_store(repo, &mut installed, &path)?;
        } else {
            debug!("{} already present in the shared directory", package);
            self.ledger.set_installation_source(&mut installed)?;
            if installed.installation_source.is_none() {
                // Kept after its last user left, so the ledger forgot it.
                self.resolve_kept_source(repo, &mut installed, &path)?;
            } else if !repo.has_package(package) {
                self.default.install_binaries(&installed, &path)?;
                repo.add_package(installed.clone());
            }
        }

        self.create_vendor_symlink(&installed)?;
        self.ledger.add_usage(&installed, &self.project_name)
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
        if !repo.has_package(initial) {
            return Err(SharedPackageError::not_installed(&initial.name, &initial.version).into());
        }

        let mut initial = initial.clone();
        let mut target = target.clone();
        self.ledger.set_installation_source(&mut initial)?;
        self.ledger.set_installation_source(&mut target)?;

        let path = self.install_path(&initial);
        if path != self.install_path(&target) {
            debug!("Install path changes, replacing {} with {}", initial, target);
            self.uninstall(repo, &initial)?;
            return self.install(repo, &target);
        }

        // Same version directory: only the code behind it changes.
        self.create_vendor_symlink(&target)?;
        println!(
            "  - Updating {} ({} => {})",
            target.name, initial.version, target.version
        );
        self.default.remove_binaries(&initial)?;
        self.default.update_code(&initial, &mut target, &path)?;
        self.default.install_binaries(&target, &path)?;
        repo.remove_package(&initial);
        repo.add_package(target.clone());
        self.ledger.add_usage(&target, &self.project_name)
    }

    #[tracing::instrument(skip(self, repo, package), fields(key = %package.key()))]
    fn uninstall(&self, repo: &mut dyn InstalledRepository, package: &Package) -> Result<()> {
        if self.is_source_unused(package)? && self.confirm_source_removal(package)? {
            let mut removed = package.clone();
            self.ledger.set_installation_source(&mut removed)?;
            println!("  - Removing {} from the shared directory", package);
            self.remove_source(&removed)?;
            self.default.remove_binaries(&removed)?;
            repo.remove_package(&removed);
        } else {
            self.default.remove_binaries(package)?;
            repo.remove_package(package);
        }

        self.ledger.remove_usage(package, &self.project_name)?;
        self.remove_vendor_symlink(package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::LibraryInstaller;
    use crate::package::JsonInstalledRepository;
    use crate::runtime::{MockPrompt, MockRuntime, RealRuntime};
    use crate::test_utils::{configure_mock_env, test_project, test_shared};
    use serde_json::json;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    /// A project and a shared store side by side in a temp dir.
    struct Fixture {
        dir: TempDir,
        config: SharedConfig,
    }

    impl Fixture {
        fn new(settings: serde_json::Value) -> Self {
            let dir = tempdir().unwrap();
            let project = dir.path().join("app");
            fs::create_dir_all(&project).unwrap();

            let mut runtime = MockRuntime::new();
            configure_mock_env(&mut runtime, None, None);
            let config =
                SharedConfig::resolve(&runtime, &project, Path::new("vendor"), Some(&settings))
                    .unwrap();
            Self { dir, config }
        }

        fn shared() -> Self {
            Self::new(json!({"vendor-dir": "../store"}))
        }

        fn store(&self) -> PathBuf {
            self.dir.path().join("store")
        }

        fn link(&self, name: &str) -> PathBuf {
            self.dir.path().join("app/vendor-shared").join(name)
        }

        fn package(&self, name: &str, version: &str) -> Package {
            let dist = self.dir.path().join("dist").join(name).join(version);
            fs::create_dir_all(&dist).unwrap();
            fs::write(dist.join("README"), format!("{} {}", name, version)).unwrap();
            Package::new(name, version)
                .with_type(SHARED_PACKAGE_TYPE)
                .with_dist(dist)
        }

        fn library<'a>(&self, runtime: &'a RealRuntime) -> LibraryInstaller<'a, RealRuntime> {
            LibraryInstaller::new(runtime, self.config.original_vendor_dir())
        }
    }

    fn interactive_prompt(answer: bool) -> MockPrompt {
        let mut prompt = MockPrompt::new();
        prompt.expect_is_interactive().returning(|| true);
        prompt
            .expect_ask_confirmation()
            .returning(move |_, _| Ok(answer));
        prompt
    }

    fn silent_prompt() -> MockPrompt {
        let mut prompt = MockPrompt::new();
        prompt.expect_is_interactive().returning(|| false);
        prompt.expect_ask_confirmation().never();
        prompt
    }

    fn repo_for<'a>(
        runtime: &'a RealRuntime,
        fixture: &Fixture,
    ) -> JsonInstalledRepository<'a, RealRuntime> {
        JsonInstalledRepository::load(runtime, fixture.config.original_vendor_dir()).unwrap()
    }

    #[test]
    fn test_paths() {
        let mut runtime = MockRuntime::new();
        configure_mock_env(&mut runtime, None, None);
        let config = SharedConfig::resolve(
            &runtime,
            &test_project(),
            Path::new("vendor"),
            Some(&json!({"vendor-dir": test_shared()})),
        )
        .unwrap();
        let default = LibraryInstaller::new(&runtime, config.original_vendor_dir());
        let prompt = MockPrompt::new();
        let installer = SharedInstaller::new(&runtime, &config, &default, &prompt, "acme/app");

        let package = Package::new("acme/lib", "dev-master");
        assert_eq!(
            installer.install_path(&package),
            test_shared().join("acme/lib").join("dev-master")
        );
        assert_eq!(
            installer.install_path(&package.clone().with_target_dir("src")),
            test_shared().join("acme/lib").join("dev-master").join("src")
        );
        assert_eq!(
            installer.symlink_source_path(&package),
            installer.install_path(&package)
        );
        assert_eq!(
            installer.vendor_symlink(&package),
            test_project().join("vendor-shared").join("acme/lib")
        );
        assert!(installer.supports(SHARED_PACKAGE_TYPE));
        assert!(!installer.supports("library"));
    }

    #[test]
    fn test_symlink_source_uses_base_path() {
        let fixture = Fixture::shared();
        let runtime = RealRuntime;
        let default = fixture.library(&runtime);
        let prompt = MockPrompt::new();
        let installer =
            SharedInstaller::new(&runtime, &fixture.config, &default, &prompt, "acme/app");

        let package = Package::new("acme/lib", "1.0.0").with_target_dir("src");
        assert_eq!(
            installer.symlink_source_path(&package),
            Path::new("../../../store/acme/lib/1.0.0/src")
        );
    }

    #[test_log::test]
    fn test_install_then_uninstall_restores_initial_state() {
        let fixture = Fixture::shared();
        let runtime = RealRuntime;
        let default = fixture.library(&runtime);
        let prompt = interactive_prompt(true);
        let installer =
            SharedInstaller::new(&runtime, &fixture.config, &default, &prompt, "acme/app");
        let mut repo = repo_for(&runtime, &fixture);
        let package = fixture.package("acme/lib", "1.0.0");

        installer.install(&mut repo, &package).unwrap();

        assert!(installer.is_installed(&repo, &package));
        assert!(fixture.store().join("acme/lib/1.0.0/README").is_file());
        // The relative base path resolves from the link's location.
        assert_eq!(
            fs::read_to_string(fixture.link("acme/lib").join("README")).unwrap(),
            "acme/lib 1.0.0"
        );
        let record = installer.ledger().record(&package.key()).unwrap().unwrap();
        assert_eq!(record.project_usage, vec!["acme/app"]);
        assert_eq!(record.installation_source, Some(InstallationSource::Dist));

        installer.uninstall(&mut repo, &package).unwrap();

        assert!(!repo.has_package(&package));
        assert!(!fixture.store().join("acme").exists());
        assert!(fs::symlink_metadata(fixture.link("acme/lib")).is_err());
        assert!(!fixture.dir.path().join("app/vendor-shared/acme").exists());
        assert!(installer.ledger().records().unwrap().is_empty());
    }

    #[test]
    fn test_second_project_reuses_source() {
        let fixture = Fixture::shared();
        let runtime = RealRuntime;
        let default = fixture.library(&runtime);
        let prompt = silent_prompt();
        let package = fixture.package("acme/lib", "1.0.0");

        let first = SharedInstaller::new(&runtime, &fixture.config, &default, &prompt, "acme/app");
        let mut repo = repo_for(&runtime, &fixture);
        first.install(&mut repo, &package).unwrap();

        // The dist disappears: a second install must not download again.
        fs::remove_dir_all(package.dist.as_ref().unwrap()).unwrap();
        let mut other_repo = JsonInstalledRepository::load(
            &runtime,
            &fixture.dir.path().join("other/vendor"),
        )
        .unwrap();
        let second =
            SharedInstaller::new(&runtime, &fixture.config, &default, &prompt, "acme/other");
        second
            .install(&mut other_repo, &Package::new("acme/lib", "1.0.0"))
            .unwrap();

        let recorded = other_repo.find_package("acme/lib").unwrap();
        assert_eq!(recorded.installation_source, Some(InstallationSource::Dist));
        assert_eq!(
            second.ledger().get_usage(&package).unwrap(),
            vec!["acme/app", "acme/other"]
        );
    }

    #[test]
    fn test_uninstall_keeps_source_used_by_another_project() {
        let fixture = Fixture::shared();
        let runtime = RealRuntime;
        let default = fixture.library(&runtime);
        let mut prompt = MockPrompt::new();
        prompt.expect_is_interactive().returning(|| true);
        prompt.expect_ask_confirmation().never();
        let installer =
            SharedInstaller::new(&runtime, &fixture.config, &default, &prompt, "acme/app");
        let mut repo = repo_for(&runtime, &fixture);
        let package = fixture.package("acme/lib", "1.0.0");

        installer.install(&mut repo, &package).unwrap();
        installer.ledger().add_usage(&package, "acme/other").unwrap();

        installer.uninstall(&mut repo, &package).unwrap();

        assert!(fixture.store().join("acme/lib/1.0.0/README").is_file());
        assert!(!repo.has_package(&package));
        assert!(fs::symlink_metadata(fixture.link("acme/lib")).is_err());
        assert_eq!(
            installer.ledger().get_usage(&package).unwrap(),
            vec!["acme/other"]
        );
    }

    #[test]
    fn test_declined_confirmation_keeps_source() {
        let fixture = Fixture::shared();
        let runtime = RealRuntime;
        let default = fixture.library(&runtime);
        let prompt = interactive_prompt(false);
        let installer =
            SharedInstaller::new(&runtime, &fixture.config, &default, &prompt, "acme/app");
        let mut repo = repo_for(&runtime, &fixture);
        let package = fixture.package("acme/lib", "1.0.0");

        installer.install(&mut repo, &package).unwrap();
        installer.uninstall(&mut repo, &package).unwrap();

        assert!(fixture.store().join("acme/lib/1.0.0/README").is_file());
        assert!(!repo.has_package(&package));
        assert!(installer.ledger().records().unwrap().is_empty());
    }

    #[test]
    fn test_non_interactive_session_keeps_source() {
        let fixture = Fixture::shared();
        let runtime = RealRuntime;
        let default = fixture.library(&runtime);
        let prompt = silent_prompt();
        let installer =
            SharedInstaller::new(&runtime, &fixture.config, &default, &prompt, "acme/app");
        let mut repo = repo_for(&runtime, &fixture);
        let package = fixture.package("acme/lib", "1.0.0");

        installer.install(&mut repo, &package).unwrap();
        installer.uninstall(&mut repo, &package).unwrap();

        assert!(fixture.store().join("acme/lib/1.0.0").is_dir());
    }

    #[test]
    fn test_reinstall_after_source_was_kept() {
        let fixture = Fixture::shared();
        let runtime = RealRuntime;
        let default = fixture.library(&runtime);
        let prompt = silent_prompt();
        let installer =
            SharedInstaller::new(&runtime, &fixture.config, &default, &prompt, "acme/app");
        let mut repo = repo_for(&runtime, &fixture);
        let package = fixture.package("acme/lib", "1.0.0");

        installer.install(&mut repo, &package).unwrap();
        installer.uninstall(&mut repo, &package).unwrap();
        assert!(installer.ledger().records().unwrap().is_empty());

        installer.install(&mut repo, &package).unwrap();

        assert!(installer.is_installed(&repo, &package));
        assert_eq!(
            fs::read_to_string(fixture.link("acme/lib").join("README")).unwrap(),
            "acme/lib 1.0.0"
        );
        let record = installer.ledger().record(&package.key()).unwrap().unwrap();
        assert_eq!(record.project_usage, vec!["acme/app"]);
        assert_eq!(record.installation_source, Some(InstallationSource::Dist));
        assert_eq!(
            repo.find_package("acme/lib").unwrap().installation_source,
            Some(InstallationSource::Dist)
        );
    }

    #[test]
    fn test_kept_source_without_dist_is_taken_as_source() {
        let fixture = Fixture::shared();
        let runtime = RealRuntime;
        let default = fixture.library(&runtime);
        let prompt = interactive_prompt(false);
        let package = fixture.package("acme/lib", "1.0.0");

        let first = SharedInstaller::new(&runtime, &fixture.config, &default, &prompt, "acme/app");
        let mut repo = repo_for(&runtime, &fixture);
        first.install(&mut repo, &package).unwrap();
        first.uninstall(&mut repo, &package).unwrap();

        let mut other_repo = JsonInstalledRepository::load(
            &runtime,
            &fixture.dir.path().join("other/vendor"),
        )
        .unwrap();
        let second =
            SharedInstaller::new(&runtime, &fixture.config, &default, &prompt, "acme/other");
        let bare = Package::new("acme/lib", "1.0.0");
        second.install(&mut other_repo, &bare).unwrap();

        assert!(second.is_installed(&other_repo, &bare));
        assert!(fixture.store().join("acme/lib/1.0.0/README").is_file());
        let record = second.ledger().record(&bare.key()).unwrap().unwrap();
        assert_eq!(record.project_usage, vec!["acme/other"]);
        assert_eq!(record.installation_source, Some(InstallationSource::Source));
    }

    #[test]
    fn test_is_source_unused_boundaries() {
        let fixture = Fixture::shared();
        let runtime = RealRuntime;
        let default = fixture.library(&runtime);
        let prompt = MockPrompt::new();
        let installer =
            SharedInstaller::new(&runtime, &fixture.config, &default, &prompt, "acme/app");
        let package = Package::new("acme/lib", "1.0.0")
            .with_installation_source(InstallationSource::Dist);

        // no record
        assert!(installer.is_source_unused(&package).unwrap());

        // only this project
        installer.ledger().add_usage(&package, "acme/app").unwrap();
        assert!(installer.is_source_unused(&package).unwrap());

        // this project and another one
        installer.ledger().add_usage(&package, "acme/other").unwrap();
        assert!(!installer.is_source_unused(&package).unwrap());

        // only another project
        installer.ledger().remove_usage(&package, "acme/app").unwrap();
        assert!(!installer.is_source_unused(&package).unwrap());
    }

    #[test]
    fn test_update_in_place_keeps_link_and_usage() {
        let fixture = Fixture::shared();
        let runtime = RealRuntime;
        let default = fixture.library(&runtime);
        let prompt = silent_prompt();
        let installer =
            SharedInstaller::new(&runtime, &fixture.config, &default, &prompt, "acme/app");
        let mut repo = repo_for(&runtime, &fixture);

        let initial = fixture.package("acme/lib", "dev-master").with_dev(true);
        installer.install(&mut repo, &initial).unwrap();

        // Same branch, new code.
        let new_dist = fixture.dir.path().join("dist/next");
        fs::create_dir_all(&new_dist).unwrap();
        fs::write(new_dist.join("README"), "next commit").unwrap();
        let target = Package::new("acme/lib", "dev-master")
            .with_dev(true)
            .with_type(SHARED_PACKAGE_TYPE)
            .with_dist(new_dist);

        installer.update(&mut repo, &initial, &target).unwrap();

        assert_eq!(
            fs::read_to_string(fixture.store().join("acme/lib/dev-master/README")).unwrap(),
            "next commit"
        );
        assert!(installer.is_installed(&repo, &target));
        assert_eq!(
            installer.ledger().get_usage(&target).unwrap(),
            vec!["acme/app"]
        );
    }

    #[test]
    fn test_update_to_other_version_replaces_package() {
        let fixture = Fixture::shared();
        let runtime = RealRuntime;
        let default = fixture.library(&runtime);
        let prompt = interactive_prompt(true);
        let installer =
            SharedInstaller::new(&runtime, &fixture.config, &default, &prompt, "acme/app");
        let mut repo = repo_for(&runtime, &fixture);

        let initial = fixture.package("acme/lib", "1.0.0");
        let target = fixture.package("acme/lib", "2.0.0");
        installer.install(&mut repo, &initial).unwrap();
        installer.update(&mut repo, &initial, &target).unwrap();

        assert!(!fixture.store().join("acme/lib/1.0.0").exists());
        assert!(fixture.store().join("acme/lib/2.0.0/README").is_file());
        assert_eq!(
            fs::read_to_string(fixture.link("acme/lib").join("README")).unwrap(),
            "acme/lib 2.0.0"
        );
        assert!(!repo.has_package(&initial));
        assert!(repo.has_package(&target));
        assert!(installer.ledger().get_usage(&initial).unwrap().is_empty());
        assert_eq!(
            installer.ledger().get_usage(&target).unwrap(),
            vec!["acme/app"]
        );
    }

    #[test]
    fn test_update_requires_registered_initial() {
        let fixture = Fixture::shared();
        let runtime = RealRuntime;
        let default = fixture.library(&runtime);
        let prompt = MockPrompt::new();
        let installer =
            SharedInstaller::new(&runtime, &fixture.config, &default, &prompt, "acme/app");
        let mut repo = repo_for(&runtime, &fixture);

        let err = installer
            .update(
                &mut repo,
                &Package::new("acme/lib", "1.0.0"),
                &Package::new("acme/lib", "2.0.0"),
            )
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SharedPackageError>(),
            Some(SharedPackageError::NotInstalled { .. })
        ));
        assert!(installer.ledger().records().unwrap().is_empty());
    }

    #[test]
    fn test_symlinks_disabled() {
        let fixture = Fixture::new(json!({"vendor-dir": "../store", "symlink-enabled": false}));
        let runtime = RealRuntime;
        let default = fixture.library(&runtime);
        let prompt = interactive_prompt(true);
        let installer =
            SharedInstaller::new(&runtime, &fixture.config, &default, &prompt, "acme/app");
        let mut repo = repo_for(&runtime, &fixture);
        let package = fixture.package("acme/lib", "1.0.0");

        installer.install(&mut repo, &package).unwrap();
        assert!(fs::symlink_metadata(fixture.link("acme/lib")).is_err());
        assert!(installer.is_installed(&repo, &package));

        installer.uninstall(&mut repo, &package).unwrap();
        assert!(!fixture.store().join("acme/lib/1.0.0").exists());
    }

    #[test]
    fn test_missing_link_means_not_installed() {
        let fixture = Fixture::shared();
        let runtime = RealRuntime;
        let default = fixture.library(&runtime);
        let prompt = MockPrompt::new();
        let installer =
            SharedInstaller::new(&runtime, &fixture.config, &default, &prompt, "acme/app");
        let mut repo = repo_for(&runtime, &fixture);
        let package = fixture.package("acme/lib", "1.0.0");

        installer.install(&mut repo, &package).unwrap();
        fs::remove_file(fixture.link("acme/lib")).unwrap();

        assert!(!installer.is_installed(&repo, &package));
    }
}
