//! Runtime abstraction for system operations.
//!
//! Every filesystem and environment call made by the installers goes through
//! the [`Runtime`] trait so the lifecycle logic can be unit tested against a
//! mock and run for real against [`RealRuntime`].
//!
//! # Structure
//!
//! - `path` - Path utility functions (normalize, resolve_against, relative_symlink_path)
//! - `env` - Environment variables and well-known directories
//! - `fs` - File system operations (read, write, directory)
//! - `symlink` - Symlink operations (create, read, remove)
//! - `user` - User interaction (confirmation prompts)

mod env;
mod fs;
pub mod path;
mod symlink;
mod user;

use anyhow::Result;
use std::env as std_env;
use std::path::{Path, PathBuf};

pub use path::{normalize_path, relative_symlink_path, resolve_against};
pub use user::{Prompt, TerminalPrompt};

#[cfg(test)]
pub use user::MockPrompt;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    // File System
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    fn copy(&self, from: &Path, to: &Path) -> Result<u64>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_dir(&self, path: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;

    /// Whether the path exists and its contents can be read by this process.
    /// Directories must be listable, files must be openable.
    fn is_readable(&self, path: &Path) -> bool;

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    // Symlinks
    fn symlink(&self, original: &Path, link: &Path) -> Result<()>;
    fn remove_symlink(&self, path: &Path) -> Result<()>;

    /// Whether the path itself is a symlink (the target is not followed, so
    /// dangling links count).
    fn is_symlink(&self, path: &Path) -> bool;

    // Directories
    fn current_dir(&self) -> Result<PathBuf>;
    fn config_dir(&self) -> Option<PathBuf>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.rename_impl(from, to)
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<u64> {
        self.copy_impl(from, to)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        self.remove_dir_impl(path)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.remove_dir_all_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.is_file_impl(path)
    }

    fn is_readable(&self, path: &Path) -> bool {
        self.is_readable_impl(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_impl(path)
    }

    fn symlink(&self, original: &Path, link: &Path) -> Result<()> {
        self.symlink_impl(original, link)
    }

    fn remove_symlink(&self, path: &Path) -> Result<()> {
        self.remove_symlink_impl(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        self.is_symlink_impl(path)
    }

    fn current_dir(&self) -> Result<PathBuf> {
        self.current_dir_impl()
    }

    fn config_dir(&self) -> Option<PathBuf> {
        self.config_dir_impl()
    }
}
