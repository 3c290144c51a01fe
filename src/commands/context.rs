use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use crate::config::{ProjectManifest, SharedConfig, load_global_settings};
use crate::runtime::{Runtime, resolve_against};

/// Everything known about the project a command runs in.
#[derive(Debug)]
pub struct ProjectContext {
    pub project_dir: PathBuf,
    pub manifest: ProjectManifest,
    pub config: SharedConfig,
}

impl ProjectContext {
    /// Load the manifest of `project_dir` (default: the current directory),
    /// fill missing settings from the global settings file and resolve the
    /// configuration.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, project_dir: Option<&Path>) -> Result<Self> {
        let current_dir = runtime.current_dir()?;
        let project_dir = match project_dir {
            Some(dir) => resolve_against(&current_dir, dir),
            None => current_dir,
        };
        debug!("Using project directory {:?}", project_dir);

        let mut manifest = ProjectManifest::load(runtime, &project_dir)?;
        if let Some(global) = load_global_settings(runtime)? {
            manifest.merge_global(&global);
        }

        let config = SharedConfig::resolve(
            runtime,
            &project_dir,
            Path::new(&manifest.vendor_dir),
            manifest.settings(),
        )?;

        Ok(Self {
            project_dir,
            manifest,
            config,
        })
    }

    pub fn project_name(&self) -> &str {
        &self.manifest.name
    }
}
