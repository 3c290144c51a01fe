//! Decides which packages go to the shared store.

use anyhow::{Context, Result};
use log::debug;
use regex::Regex;

use crate::package::{Package, SHARED_PACKAGE_TYPE};

/// Name of this tool's own package. It is never shared, so a project that
/// pins it keeps a private copy.
pub const PLUGIN_PACKAGE_NAME: &str = "shared-package/plugin";

/// Characters a `*` in a package-list pattern stands for (one or more).
const WILDCARD_CLASS: &str = "[A-Za-z0-9_-]+";

#[derive(Debug)]
enum Matcher {
    Exact(String),
    Pattern(Regex),
}

impl Matcher {
    fn parse(entry: &str) -> Result<Self> {
        if !entry.contains('*') {
            return Ok(Matcher::Exact(entry.to_string()));
        }

        let body = entry
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(WILDCARD_CLASS);
        let regex = Regex::new(&format!("^{}$", body))
            .with_context(|| format!("Invalid package-list pattern '{}'", entry))?;
        Ok(Matcher::Pattern(regex))
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            Matcher::Exact(expected) => expected == name,
            Matcher::Pattern(regex) => regex.is_match(name),
        }
    }
}

/// Classifier built once from the configured package list.
#[derive(Debug)]
pub struct SharedPackageSolver {
    all_shared: bool,
    matchers: Vec<Matcher>,
}

impl SharedPackageSolver {
    pub fn new(package_list: &[String]) -> Result<Self> {
        let all_shared = package_list
            .iter()
            .any(|entry| entry == "*" || entry == "all");

        let matchers = if all_shared {
            Vec::new()
        } else {
            package_list
                .iter()
                .map(|entry| Matcher::parse(entry))
                .collect::<Result<_>>()?
        };

        Ok(Self {
            all_shared,
            matchers,
        })
    }

    pub fn is_shared_package(&self, package: &Package) -> bool {
        if package.name == PLUGIN_PACKAGE_NAME {
            return false;
        }

        if self.all_shared || package.package_type == SHARED_PACKAGE_TYPE {
            return true;
        }

        let shared = self
            .matchers
            .iter()
            .any(|matcher| matcher.matches(&package.name));
        if shared {
            debug!("{} matches the shared package list", package.name);
        }
        shared
    }
}
