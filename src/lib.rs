pub mod commands;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod installer;
pub mod ledger;
pub mod package;
pub mod runtime;

/// Test utilities for cross-platform path handling.
#[cfg(test)]
pub mod test_utils {
    use crate::config::{SYMLINK_BASE_PATH_ENV, VENDOR_DIR_ENV};
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::path::PathBuf;

    /// Returns the consuming project's root directory based on the platform.
    /// - Unix: `/home/user/projects/app`
    /// - Windows: `C:\Users\user\projects\app`
    pub fn test_project() -> PathBuf {
        #[cfg(not(windows))]
        {
            PathBuf::from("/home/user/projects/app")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\Users\user\projects\app")
        }
    }

    /// Returns the shared storage directory based on the platform.
    /// - Unix: `/home/user/shared`
    /// - Windows: `C:\Users\user\shared`
    pub fn test_shared() -> PathBuf {
        #[cfg(not(windows))]
        {
            PathBuf::from("/home/user/shared")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\Users\user\shared")
        }
    }

    /// Configure the two environment overrides on a mock runtime.
    /// `None` means the variable is not set.
    pub fn configure_mock_env(
        runtime: &mut MockRuntime,
        vendor_dir: Option<&str>,
        symlink_base_path: Option<&str>,
    ) {
        let vendor_dir = vendor_dir.map(str::to_string);
        runtime
            .expect_env_var()
            .with(eq(VENDOR_DIR_ENV))
            .returning(move |_| vendor_dir.clone().ok_or(std::env::VarError::NotPresent));

        let symlink_base_path = symlink_base_path.map(str::to_string);
        runtime
            .expect_env_var()
            .with(eq(SYMLINK_BASE_PATH_ENV))
            .returning(move |_| {
                symlink_base_path
                    .clone()
                    .ok_or(std::env::VarError::NotPresent)
            });
    }
}
