use anyhow::{Result, bail};
use std::path::Path;

use super::{ProjectContext, with_dispatcher};
use crate::installer::PackageInstaller;
use crate::package::InstalledRepository;
use crate::runtime::{Runtime, TerminalPrompt};

/// Remove a package from the project. With `yes`, an unused shared source
/// tree is deleted without asking.
#[tracing::instrument(skip(runtime))]
pub fn uninstall<R: Runtime>(
    runtime: R,
    project: Option<&Path>,
    name: &str,
    yes: bool,
) -> Result<()> {
    let ctx = ProjectContext::load(&runtime, project)?;
    let prompt = TerminalPrompt::new(yes);

    with_dispatcher(&runtime, &ctx, &prompt, |dispatcher, repo| {
        let Some(package) = repo.find_package(name) else {
            bail!("Package {} is not installed", name);
        };
        dispatcher.uninstall(repo, &package)?;
        println!("Removed package {}", package);
        Ok(())
    })
}
