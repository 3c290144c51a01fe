use anyhow::Result;

use crate::installer::{InstallerDispatcher, LibraryInstaller, SharedInstaller, SharedPackageSolver};
use crate::package::JsonInstalledRepository;
use crate::runtime::{Prompt, Runtime};

mod context;
mod install;
mod report;
mod uninstall;

pub use context::ProjectContext;
pub use install::{PackageArgs, install, update};
pub use report::{show_config, usage};
pub use uninstall::uninstall;

type Dispatcher<'a, R> = InstallerDispatcher<
    'a,
    SharedInstaller<'a, R, LibraryInstaller<'a, R>>,
    LibraryInstaller<'a, R>,
>;

/// Wire the installers of a project together and run `action` with the
/// dispatcher and the project's installed repository. The repository is
/// saved when `action` succeeds.
fn with_dispatcher<R, T, F>(
    runtime: &R,
    ctx: &ProjectContext,
    prompt: &dyn Prompt,
    action: F,
) -> Result<T>
where
    R: Runtime,
    F: FnOnce(&Dispatcher<'_, R>, &mut JsonInstalledRepository<'_, R>) -> Result<T>,
{
    let solver = SharedPackageSolver::new(ctx.config.package_list())?;
    let library = LibraryInstaller::new(runtime, ctx.config.original_vendor_dir());
    let shared = SharedInstaller::new(runtime, &ctx.config, &library, prompt, ctx.project_name());
    let dispatcher = InstallerDispatcher::new(&solver, &shared, &library);

    let mut repo = JsonInstalledRepository::load(runtime, ctx.config.original_vendor_dir())?;
    let result = action(&dispatcher, &mut repo)?;
    repo.write()?;
    Ok(result)
}
