//! Error taxonomy for shared package operations.
//!
//! Everything else in the crate returns `anyhow::Result`; these variants are
//! the failures callers may want to tell apart (`err.downcast_ref::<SharedPackageError>()`).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SharedPackageError {
    /// The project settings are missing a required key or a key has the wrong type.
    #[error("invalid \"shared-package\" configuration: {0}")]
    Config(String),

    /// An update/uninstall targeted a package this project never installed.
    #[error("Package is not installed: {name} ({version})")]
    NotInstalled { name: String, version: String },

    /// A new usage record cannot be created without knowing how the package was fetched.
    #[error("Unknown installation source for package {name} ({version})")]
    UnknownInstallationSource { name: String, version: String },

    /// A cleanup step failed; the ledger and the vendor tree may disagree afterwards.
    #[error("{action}: {}", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl SharedPackageError {
    pub fn config(message: impl Into<String>) -> Self {
        SharedPackageError::Config(message.into())
    }

    pub fn not_installed(name: &str, version: &str) -> Self {
        SharedPackageError::NotInstalled {
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}
