//! Usage ledger: which projects use which shared package version.
//!
//! The ledger lives at `<shared storage dir>/packages.json` and is shared by
//! every project pointing at the same store:
//!
//! ```json
//! {
//!   "acme/lib/dev-master": {
//!     "installation-source": "source",
//!     "project-usage": ["acme/app", "acme/api"]
//!   }
//! }
//! ```
//!
//! Reads are served from a copy loaded lazily on first access. Every
//! mutation re-reads the file, applies the change and replaces the file
//! through a rename, so a concurrent writer from another project loses at
//! most its own last change instead of corrupting the file.

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::SourcePolicy;
use crate::error::SharedPackageError;
use crate::package::{InstallationSource, Package, PackageKey};
use crate::runtime::Runtime;

/// Ledger file name inside the shared storage directory.
pub const LEDGER_FILENAME: &str = "packages.json";

/// One ledger entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UsageRecord {
    #[serde(
        rename = "installation-source",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub installation_source: Option<InstallationSource>,
    #[serde(rename = "project-usage", default)]
    pub project_usage: Vec<String>,
}

type Records = BTreeMap<String, UsageRecord>;

pub struct UsageLedger<'a, R: Runtime> {
    runtime: &'a R,
    path: PathBuf,
    policy: SourcePolicy,
    records: RefCell<Option<Records>>,
}

impl<'a, R: Runtime> UsageLedger<'a, R> {
    pub fn new(runtime: &'a R, storage_dir: &Path, policy: SourcePolicy) -> Self {
        Self {
            runtime,
            path: storage_dir.join(LEDGER_FILENAME),
            policy,
            records: RefCell::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<Records> {
        if !self.runtime.is_file(&self.path) {
            debug!("No usage ledger at {:?}, starting empty", self.path);
            return Ok(Records::new());
        }

        let content = self.runtime.read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Records::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse usage ledger {:?}", self.path))
    }

    fn write_file(&self, records: &Records) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !self.runtime.exists(parent)
        {
            self.runtime.create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(records)?;
        let tmp_path = self.path.with_extension("json.tmp");
        self.runtime.write(&tmp_path, json.as_bytes())?;
        self.runtime
            .rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to save usage ledger to {:?}", self.path))
    }

    /// Run `f` against the cached records, loading them on first use.
    fn with_records<T>(&self, f: impl FnOnce(&Records) -> T) -> Result<T> {
        let mut cache = self.records.borrow_mut();
        if cache.is_none() {
            *cache = Some(self.read_file()?);
        }
        Ok(f(cache.get_or_insert_with(Records::new)))
    }

    /// Read-modify-write against the file on disk, then refresh the cache.
    fn mutate(&self, f: impl FnOnce(&mut Records) -> Result<()>) -> Result<()> {
        let mut records = self.read_file()?;
        f(&mut records)?;
        self.write_file(&records)?;
        *self.records.borrow_mut() = Some(records);
        Ok(())
    }

    /// All records, keyed by package key.
    pub fn records(&self) -> Result<BTreeMap<String, UsageRecord>> {
        self.with_records(|records| records.clone())
    }

    pub fn record(&self, key: &PackageKey) -> Result<Option<UsageRecord>> {
        self.with_records(|records| records.get(key.as_str()).cloned())
    }

    /// Projects using the package, in the order they started using it.
    pub fn get_usage(&self, package: &Package) -> Result<Vec<String>> {
        Ok(self
            .record(&package.key())?
            .map(|record| record.project_usage)
            .unwrap_or_default())
    }

    /// Record that `project` uses `package`.
    #[tracing::instrument(skip(self, package), fields(key = %package.key()))]
    pub fn add_usage(&self, package: &Package, project: &str) -> Result<()> {
        self.mutate(|records| {
            let mut usage = current_usage(records, &package.key());
            if !usage.iter().any(|p| p == project) {
                usage.push(project.to_string());
            }
            self.apply_usage(records, package, usage)
        })
    }

    /// Record that `project` no longer uses `package`. The record disappears
    /// with its last user.
    #[tracing::instrument(skip(self, package), fields(key = %package.key()))]
    pub fn remove_usage(&self, package: &Package, project: &str) -> Result<()> {
        self.mutate(|records| {
            let usage = current_usage(records, &package.key())
                .into_iter()
                .filter(|p| p != project)
                .collect();
            self.apply_usage(records, package, usage)
        })
    }

    /// Replace the usage list of `package`.
    pub fn persist(&self, package: &Package, usage: Vec<String>) -> Result<()> {
        self.mutate(|records| self.apply_usage(records, package, usage))
    }

    fn apply_usage(
        &self,
        records: &mut Records,
        package: &Package,
        usage: Vec<String>,
    ) -> Result<()> {
        let key = package.key();

        if usage.is_empty() {
            if records.remove(key.as_str()).is_some() {
                debug!("Removed usage record {}", key);
            }
            return Ok(());
        }

        if let Some(record) = records.get_mut(key.as_str()) {
            record.project_usage = usage;
            return Ok(());
        }

        let installation_source = match self.policy {
            SourcePolicy::ForceSource => InstallationSource::Source,
            SourcePolicy::Preserve => package.installation_source.ok_or_else(|| {
                SharedPackageError::UnknownInstallationSource {
                    name: package.name.clone(),
                    version: package.version.clone(),
                }
            })?,
        };
        debug!(
            "Creating usage record {} (installation source: {})",
            key, installation_source
        );
        records.insert(
            key.to_string(),
            UsageRecord {
                installation_source: Some(installation_source),
                project_usage: usage,
            },
        );
        Ok(())
    }

    /// Fill in the package's installation source from the ledger when the
    /// package does not know it. Left unset when the ledger does not know either.
    pub fn set_installation_source(&self, package: &mut Package) -> Result<()> {
        if package.installation_source.is_none() {
            package.installation_source = self
                .record(&package.key())?
                .and_then(|record| record.installation_source);
        }
        Ok(())
    }
}

fn current_usage(records: &Records, key: &PackageKey) -> Vec<String> {
    records
        .get(key.as_str())
        .map(|record| record.project_usage.clone())
        .unwrap_or_default()
}
