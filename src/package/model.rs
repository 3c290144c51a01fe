use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Package type marking a package as shared regardless of the configured package list.
pub const SHARED_PACKAGE_TYPE: &str = "shared-package";

/// Package type used when a package does not declare one.
pub const DEFAULT_PACKAGE_TYPE: &str = "library";

fn default_package_type() -> String {
    DEFAULT_PACKAGE_TYPE.to_string()
}

/// How a package's files were obtained.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InstallationSource {
    /// A version-control checkout, with history.
    Source,
    /// A release archive.
    Dist,
}

impl InstallationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallationSource::Source => "source",
            InstallationSource::Dist => "dist",
        }
    }
}

impl fmt::Display for InstallationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger key of one version of one package: `name/version`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageKey(String);

impl PackageKey {
    pub fn new(name: &str, version: &str) -> Self {
        PackageKey(format!("{}/{}", name, version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved package as handed over by the host.
///
/// `name` and `version` are the pretty (human readable) identifiers; together
/// they identify the shared resource. `installation_source` is the only field
/// the installers mutate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: String,
    #[serde(rename = "type", default = "default_package_type")]
    pub package_type: String,
    /// Development (branch) versions as opposed to stable (tag) versions.
    #[serde(default)]
    pub dev: bool,
    /// Sub-path of the source tree holding the usable code.
    #[serde(
        rename = "target-dir",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub target_dir: Option<String>,
    #[serde(
        rename = "installation-source",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub installation_source: Option<InstallationSource>,
    /// Executables, relative to the install path, exposed through the vendor bin dir.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bin: Vec<String>,
    /// Local directory the library installer copies the package from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist: Option<PathBuf>,
}

impl Package {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Package {
            name: name.into(),
            version: version.into(),
            package_type: default_package_type(),
            dev: false,
            target_dir: None,
            installation_source: None,
            bin: Vec::new(),
            dist: None,
        }
    }

    pub fn with_type(mut self, package_type: impl Into<String>) -> Self {
        self.package_type = package_type.into();
        self
    }

    pub fn with_dev(mut self, dev: bool) -> Self {
        self.dev = dev;
        self
    }

    pub fn with_target_dir(mut self, target_dir: impl Into<String>) -> Self {
        self.target_dir = Some(target_dir.into());
        self
    }

    pub fn with_installation_source(mut self, source: InstallationSource) -> Self {
        self.installation_source = Some(source);
        self
    }

    pub fn with_bin(mut self, bin: Vec<String>) -> Self {
        self.bin = bin;
        self
    }

    pub fn with_dist(mut self, dist: impl Into<PathBuf>) -> Self {
        self.dist = Some(dist.into());
        self
    }

    pub fn key(&self) -> PackageKey {
        PackageKey::new(&self.name, &self.version)
    }

    /// Same name and version, the identity used by repositories.
    pub fn same_identity(&self, other: &Package) -> bool {
        self.name == other.name && self.version == other.version
    }

    /// The `target_dir`, ignoring empty values.
    pub fn target_dir(&self) -> Option<&str> {
        self.target_dir.as_deref().filter(|dir| !dir.is_empty())
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.version)
    }
}
