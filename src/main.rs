use anyhow::Result;
use clap::Parser;
use shared_package::commands::{self, PackageArgs};
use std::path::PathBuf;

/// shared-package - share dependencies between projects
///
/// Packages marked as shared are installed once per version into a shared
/// directory and linked into each project's vendor-shared directory. A usage
/// ledger keeps track of the projects using each version.
///
/// The project is described by its shared-package.json manifest.
///
/// Examples:
///   shared-package install acme/lib 1.0.0 --from ../dist/acme-lib
///   shared-package uninstall acme/lib
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project directory (defaults to the current directory)
    #[arg(
        long = "project",
        short = 'p',
        env = "SHARED_PACKAGE_PROJECT",
        value_name = "DIR",
        global = true
    )]
    project: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Install a package into the project
    Install(InstallArgs),

    /// Update an installed package to another version
    Update(UpdateArgs),

    /// Remove a package from the project
    Uninstall(UninstallArgs),

    /// Show which projects use the shared packages
    Usage(UsageArgs),

    /// Show the resolved configuration
    Config,
}

#[derive(clap::Args, Debug)]
struct InstallArgs {
    /// Package name, e.g. "acme/lib"
    #[arg(value_name = "NAME")]
    name: String,

    /// Package version, e.g. "1.0.0" or "dev-master"
    #[arg(value_name = "VERSION")]
    version: String,

    /// Directory holding the package files
    #[arg(long, value_name = "DIR")]
    from: PathBuf,

    /// Package type ("shared-package" always installs into the shared directory)
    #[arg(long = "type", value_name = "TYPE")]
    package_type: Option<String>,

    /// Development version (branch) rather than a tagged release
    #[arg(long)]
    dev: bool,

    /// Sub-directory of the package holding the usable code
    #[arg(long, value_name = "DIR")]
    target_dir: Option<String>,

    /// Executable to link into the vendor bin directory (repeatable)
    #[arg(long = "bin", value_name = "PATH")]
    bin: Vec<String>,
}

impl From<InstallArgs> for PackageArgs {
    fn from(args: InstallArgs) -> Self {
        PackageArgs {
            name: args.name,
            version: args.version,
            from: args.from,
            package_type: args.package_type,
            dev: args.dev,
            target_dir: args.target_dir,
            bin: args.bin,
        }
    }
}

#[derive(clap::Args, Debug)]
struct UpdateArgs {
    #[arg(value_name = "NAME")]
    name: String,

    #[arg(value_name = "VERSION")]
    version: String,

    /// Directory holding the new package files
    #[arg(long, value_name = "DIR")]
    from: PathBuf,

    /// Development version (branch) rather than a tagged release
    #[arg(long)]
    dev: bool,
}

impl From<UpdateArgs> for PackageArgs {
    fn from(args: UpdateArgs) -> Self {
        PackageArgs {
            name: args.name,
            version: args.version,
            from: args.from,
            dev: args.dev,
            ..Default::default()
        }
    }
}

#[derive(clap::Args, Debug)]
struct UninstallArgs {
    #[arg(value_name = "NAME")]
    name: String,

    /// Delete an unused shared source directory without asking
    #[arg(long, short = 'y')]
    yes: bool,
}

#[derive(clap::Args, Debug)]
struct UsageArgs {
    /// Only show this package key ("name/version")
    #[arg(value_name = "KEY")]
    key: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = shared_package::runtime::RealRuntime;
    let project = cli.project.as_deref();

    match cli.command {
        Commands::Install(args) => commands::install(runtime, project, &args.into())?,
        Commands::Update(args) => commands::update(runtime, project, &args.into())?,
        Commands::Uninstall(args) => commands::uninstall(runtime, project, &args.name, args.yes)?,
        Commands::Usage(args) => commands::usage(runtime, project, args.key.as_deref())?,
        Commands::Config => commands::show_config(runtime, project)?,
    }
    Ok(())
}
