//! Resolved installer configuration.
//!
//! [`SharedConfig`] is built once per process from the project settings plus
//! environment overrides and never changes afterwards.

mod manifest;
mod settings;

use anyhow::Result;
use log::debug;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::SharedPackageError;
use crate::runtime::path::strip_trailing_separator;
use crate::runtime::{Runtime, resolve_against};

pub use manifest::{
    GLOBAL_CONFIG_DIR, GLOBAL_CONFIG_FILENAME, MANIFEST_FILENAME, ProjectManifest, SETTINGS_KEY,
    load_global_settings,
};
pub use settings::Settings;

/// Overrides the shared storage directory (`vendor-dir` setting).
pub const VENDOR_DIR_ENV: &str = "SHARED_PACKAGE_VENDOR_DIR";

/// Overrides the base path written into symlinks (`symlink-base-path` setting).
pub const SYMLINK_BASE_PATH_ENV: &str = "SHARED_PACKAGE_SYMLINK_BASE_PATH";

/// Default symlink directory name, relative to the project base directory.
pub const DEFAULT_SYMLINK_DIR: &str = "vendor-shared";

/// What installation source a newly created usage record gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourcePolicy {
    /// Keep whatever the package reports.
    #[default]
    Preserve,
    /// Always record `source`, so shared packages are full VCS checkouts.
    ForceSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SharedConfig {
    base_dir: PathBuf,
    original_vendor_dir: PathBuf,
    shared_storage_dir: PathBuf,
    symlink_dir: PathBuf,
    symlink_base_path: Option<PathBuf>,
    symlink_enabled: bool,
    package_list: Vec<String>,
    source_policy: SourcePolicy,
}

impl SharedConfig {
    /// Resolve the configuration of a project.
    ///
    /// * `base_dir` - the project root, against which relative settings resolve
    /// * `vendor_dir` - the project's normal vendor directory (relative to `base_dir` or absolute)
    /// * `raw_settings` - the `extra.shared-package` object, if any
    #[tracing::instrument(skip(runtime, raw_settings))]
    pub fn resolve<R: Runtime>(
        runtime: &R,
        base_dir: &Path,
        vendor_dir: &Path,
        raw_settings: Option<&Value>,
    ) -> Result<Self> {
        let settings = match raw_settings {
            Some(value) => Settings::from_value(value)?,
            None => Settings::default(),
        };

        let env_vendor_dir = non_empty_env(runtime, VENDOR_DIR_ENV);
        let storage_setting = env_vendor_dir
            .or_else(|| settings.vendor_dir.clone())
            .ok_or_else(|| {
                SharedPackageError::config(format!(
                    "the \"vendor-dir\" parameter should be provided in the \"{}\" settings \
                     (or through the {} environment variable)",
                    SETTINGS_KEY, VENDOR_DIR_ENV
                ))
            })?;

        let shared_storage_dir = resolve_against(base_dir, Path::new(&storage_setting));

        let symlink_dir = match &settings.symlink_dir {
            Some(dir) => resolve_against(base_dir, Path::new(dir)),
            None => base_dir.join(DEFAULT_SYMLINK_DIR),
        };

        let symlink_base_path = non_empty_env(runtime, SYMLINK_BASE_PATH_ENV)
            .or_else(|| settings.symlink_base_path.clone())
            .map(|path| PathBuf::from(strip_trailing_separator(&path)))
            .or_else(|| {
                // Symlinks live two levels below the project root
                // (`vendor-shared/<vendor>/<name>`), so a relative storage
                // dir is rebased from there.
                let storage = Path::new(strip_trailing_separator(&storage_setting));
                storage
                    .is_relative()
                    .then(|| Path::new("..").join("..").join(storage))
            });

        let source_policy = if settings.force_source.unwrap_or(false) {
            SourcePolicy::ForceSource
        } else {
            SourcePolicy::Preserve
        };

        let config = SharedConfig {
            base_dir: base_dir.to_path_buf(),
            original_vendor_dir: resolve_against(base_dir, vendor_dir),
            shared_storage_dir,
            symlink_dir,
            symlink_base_path,
            symlink_enabled: settings.symlink_enabled.unwrap_or(true),
            package_list: settings.package_list,
            source_policy,
        };
        debug!("Resolved shared package configuration: {:?}", config);

        Ok(config)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The project's own vendor directory, used for non-shared packages.
    pub fn original_vendor_dir(&self) -> &Path {
        &self.original_vendor_dir
    }

    /// Root of the shared store (`sharedStorageDir`).
    pub fn shared_storage_dir(&self) -> &Path {
        &self.shared_storage_dir
    }

    pub fn symlink_dir(&self) -> &Path {
        &self.symlink_dir
    }

    pub fn symlink_base_path(&self) -> Option<&Path> {
        self.symlink_base_path.as_deref()
    }

    pub fn is_symlink_enabled(&self) -> bool {
        self.symlink_enabled
    }

    pub fn package_list(&self) -> &[String] {
        &self.package_list
    }

    pub fn source_policy(&self) -> SourcePolicy {
        self.source_policy
    }
}

fn non_empty_env<R: Runtime>(runtime: &R, key: &str) -> Option<String> {
    runtime.env_var(key).ok().filter(|value| !value.is_empty())
}
