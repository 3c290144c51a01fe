use anyhow::Result;
use std::path::Path;

use super::ProjectContext;
use crate::config::{SharedConfig, SourcePolicy};
use crate::ledger::{UsageLedger, UsageRecord};
use crate::runtime::Runtime;

/// Print the usage ledger of the project's shared store, or one record of it.
#[tracing::instrument(skip(runtime))]
pub fn usage<R: Runtime>(runtime: R, project: Option<&Path>, key: Option<&str>) -> Result<()> {
    let ctx = ProjectContext::load(&runtime, project)?;
    let ledger = UsageLedger::new(
        &runtime,
        ctx.config.shared_storage_dir(),
        ctx.config.source_policy(),
    );
    let records = ledger.records()?;

    println!("Ledger: {}", ledger.path().display());
    let selected: Vec<_> = records
        .iter()
        .filter(|(record_key, _)| key.is_none_or(|wanted| wanted == record_key.as_str()))
        .collect();

    if selected.is_empty() {
        match key {
            Some(key) => println!("No usage recorded for {}", key),
            None => println!("No shared package in use"),
        }
        return Ok(());
    }

    for (record_key, record) in selected {
        println!();
        print!("{}", format_record(record_key, record));
    }
    Ok(())
}

fn format_record(key: &str, record: &UsageRecord) -> String {
    let source = record
        .installation_source
        .map(|source| source.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let mut out = format!("{} (installation source: {})\n", key, source);
    for project in &record.project_usage {
        out.push_str(&format!("  {}\n", project));
    }
    out
}

/// Print the resolved configuration of the project.
#[tracing::instrument(skip(runtime))]
pub fn show_config<R: Runtime>(runtime: R, project: Option<&Path>) -> Result<()> {
    let ctx = ProjectContext::load(&runtime, project)?;
    println!("Project: {}", ctx.project_name());
    print!("{}", format_config(&ctx.config));
    Ok(())
}

fn format_config(config: &SharedConfig) -> String {
    let base_path = config
        .symlink_base_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    let package_list = if config.package_list().is_empty() {
        "(none)".to_string()
    } else {
        config.package_list().join(", ")
    };
    let policy = match config.source_policy() {
        SourcePolicy::Preserve => "preserve",
        SourcePolicy::ForceSource => "force source",
    };

    [
        format!("Base directory: {}", config.base_dir().display()),
        format!("Vendor directory: {}", config.original_vendor_dir().display()),
        format!("Shared directory: {}", config.shared_storage_dir().display()),
        format!("Symlink directory: {}", config.symlink_dir().display()),
        format!("Symlink base path: {}", base_path),
        format!(
            "Symlinks enabled: {}",
            if config.is_symlink_enabled() { "yes" } else { "no" }
        ),
        format!("Shared packages: {}", package_list),
        format!("Installation source: {}", policy),
    ]
    .iter()
    .map(|line| format!("{}\n", line))
    .collect()
}
